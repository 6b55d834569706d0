use clap::Parser;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("url {0:?} cannot be used as a base")]
    NotABase(String),
    #[error("malformed header {0:?}, expected NAME:VALUE")]
    MalformedHeader(String),
    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },
    #[error("build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("metrics exporter: {0}")]
    Metrics(String),
}

/// Fire a fixed batch of generate requests at an inference endpoint and
/// report success rate and latency percentiles.
#[derive(Parser, Debug, Clone)]
#[command(name = "inferload", version)]
pub struct Config {
    #[arg(long, env, default_value = "http://127.0.0.1:11434")]
    pub base_url: String,
    #[arg(long, env, default_value = "/api/generate")]
    pub endpoint: String,
    #[arg(long, env, default_value = "llama3.1:8b")]
    pub model: String,
    #[arg(long, env, default_value = "Explain quantum computing in one sentence.")]
    pub prompt: String,
    #[arg(long, env, default_value_t = 100)]
    pub num_requests: usize,
    #[arg(long, env, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency: u32,
    /// Extra request header as `NAME:VALUE`; repeatable. `HEADERS` holds one
    /// header per line, since a line break can never occur inside a header value.
    #[arg(long = "header", env = "HEADERS", value_delimiter = '\n')]
    pub headers: Vec<String>,
    #[arg(long, env, default_value_t = 20)]
    pub pool_size: usize,
    /// Connect-phase retries per request; all attempts share one latency sample.
    #[arg(long, env, default_value_t = 3)]
    pub max_retries: u32,
    #[arg(long, env, default_value_t = 30)]
    pub request_timeout_secs: u64,
    #[arg(long, env, default_value_t = 5)]
    pub health_timeout_secs: u64,
    /// Connect/read backstop applied by the client to every socket.
    #[arg(long, env, default_value_t = 120)]
    pub socket_timeout_secs: u64,
    /// Expose Prometheus metrics on this address while the run is in progress.
    #[arg(long, env)]
    pub metrics_bind: Option<String>,
    /// Print the summary as JSON instead of the text block.
    #[arg(long = "json", env = "JSON_OUTPUT")]
    pub json: bool,
}

impl Config {
    pub fn concurrency(&self) -> usize {
        self.concurrency as usize
    }

    /// Idle pool capacity per host; never smaller than the concurrency level.
    pub fn pool_capacity(&self) -> usize {
        self.pool_size.max(self.concurrency())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_secs(self.socket_timeout_secs)
    }
}
