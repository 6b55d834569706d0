use super::{Executor, RequestError, RequestResult};
use crate::{request::RequestSpec, util::elapsed_ms};
use metrics::{counter, gauge, histogram};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::error::Error as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client shared by the health probe and every worker. Cloning it shares
/// the connection pool.
pub fn build_client(pool_capacity: usize, socket_timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .pool_max_idle_per_host(pool_capacity)
        .connect_timeout(socket_timeout)
        .timeout(socket_timeout)
        .build()
}

#[derive(Clone)]
pub struct HttpExecutor {
    client: Client,
    spec: Arc<RequestSpec>,
    request_timeout: Duration,
    max_retries: u32,
}

impl HttpExecutor {
    pub fn new(
        client: Client,
        spec: Arc<RequestSpec>,
        request_timeout: Duration,
        max_retries: u32,
    ) -> Self {
        Self { client, spec, request_timeout, max_retries }
    }

    async fn send(&self) -> reqwest::Result<Response> {
        self.client
            .post(self.spec.generate_url.clone())
            .headers(self.spec.headers.clone())
            .json(&self.spec.payload)
            .send()
            .await
    }

    /// Connect failures are retried in place; anything past the connect
    /// phase is final.
    async fn call(&self, ordinal: usize, attempts: &mut u32) -> Result<String, RequestError> {
        loop {
            *attempts += 1;
            match self.send().await {
                Ok(resp) => return classify(resp).await,
                Err(e) if e.is_connect() && *attempts <= self.max_retries => {
                    debug!(
                        request = ordinal + 1,
                        attempt = *attempts,
                        error = %error_chain(&e),
                        "connect failed, retrying"
                    );
                }
                Err(e) => return Err(RequestError::Transport(error_chain(&e))),
            }
        }
    }
}

#[async_trait::async_trait]
impl Executor for HttpExecutor {
    async fn execute(&self, ordinal: usize) -> RequestResult {
        let mut attempts = 0;
        gauge!("inferload_in_flight").increment(1.0);

        let start = Instant::now();
        let call = self.call(ordinal, &mut attempts);
        let outcome = match tokio::time::timeout(self.request_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(RequestError::Timeout(self.request_timeout)),
        };
        let latency_ms = elapsed_ms(start);

        gauge!("inferload_in_flight").decrement(1.0);
        histogram!("inferload_request_latency_ms").record(latency_ms);
        let label = match &outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        counter!("inferload_requests_total", "outcome" => label).increment(1);

        match &outcome {
            Err(RequestError::Http { .. }) | Ok(_) => {}
            Err(e) => error!(request = ordinal + 1, attempts, latency_ms, error = %e, "request failed"),
        }

        RequestResult { ordinal, latency_ms, attempts, outcome }
    }
}

async fn classify(resp: Response) -> Result<String, RequestError> {
    let status = resp.status();
    if status != StatusCode::OK {
        return Err(RequestError::Http { status: status.as_u16() });
    }
    let body: Value = resp.json().await.map_err(|e| {
        if e.is_decode() {
            RequestError::Decode(error_chain(&e))
        } else {
            RequestError::Transport(error_chain(&e))
        }
    })?;
    let object = body
        .as_object()
        .ok_or_else(|| RequestError::Decode(format!("expected a JSON object, got {body}")))?;
    Ok(object.get("response").and_then(Value::as_str).unwrap_or_default().to_string())
}

// reqwest's top-level message hides the cause (refused, reset, dns).
fn error_chain(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
