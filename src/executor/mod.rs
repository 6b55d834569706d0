use std::time::Duration;
use thiserror::Error;

/// Why a single request did not succeed. `Display` is the error description
/// carried by the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("HTTP {status}")]
    Http { status: u16 },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Transport(String),
    #[error("decode response body: {0}")]
    Decode(String),
}

impl RequestError {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Http { .. } => "http_error",
            RequestError::Timeout(_) => "timeout",
            RequestError::Transport(_) => "transport_error",
            RequestError::Decode(_) => "decode_error",
        }
    }
}

/// Outcome of one request. `outcome` holds the extracted `response` text on
/// success.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestResult {
    pub ordinal: usize,
    pub latency_ms: f64,
    /// Transport attempts spent inside this single latency sample.
    pub attempts: u32,
    pub outcome: Result<String, RequestError>,
}

impl RequestResult {
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.outcome.as_ref().err()
    }
}

#[async_trait::async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Run request `ordinal` to completion. Failures are reported in the
    /// returned value, never raised.
    async fn execute(&self, ordinal: usize) -> RequestResult;
}

pub mod http;
