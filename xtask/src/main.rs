use std::time::Duration;
use axum::{http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use rand::{thread_rng, Rng};
use serde::Deserialize;
use serde_json::json;


#[derive(Deserialize)]
struct GenerateReq {
    model: String,
    prompt: String,
}

/// Local stand-in for an inference endpoint:
/// `cargo run -p xtask -- [addr] [latency_ms] [failure_rate]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:11434".to_string());
    let latency_ms: u64 = std::env::args().nth(2).map(|s| s.parse::<u64>()).transpose()?.unwrap_or(50);
    let failure_rate: f64 = std::env::args().nth(3).map(|s| s.parse::<f64>()).transpose()?.unwrap_or(0.0);

    let app = Router::new()
        .route("/healthz", get(|| async { StatusCode::OK }))
        .route("/api/generate", post(move |Json(req): Json<GenerateReq>| async move {
            // jitter +/-50% around the base latency
            let (delay, fail) = {
                let mut rng = thread_rng();
                let delay = latency_ms / 2 + rng.gen_range(0..=latency_ms);
                (delay, rng.gen_bool(failure_rate.clamp(0.0, 1.0)))
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if fail {
                return (StatusCode::INTERNAL_SERVER_ERROR, "injected failure").into_response();
            }
            Json(json!({
                "model": req.model,
                "response": format!("echo: {}", req.prompt),
                "done": true,
            }))
            .into_response()
        }));

    println!("mock target on http://{addr} (latency ~{latency_ms}ms, failure rate {failure_rate})");
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
