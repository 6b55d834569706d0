use crate::{
    config::{Config, ConfigError},
    executor::http::{build_client, HttpExecutor},
    health::check_health,
    pool::{PoolError, WorkerPool},
    report,
    request::RequestSpec,
    stats::{summarize, StatsError, SummaryStats},
};
use metrics_exporter_prometheus::PrometheusBuilder;
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("target is not healthy ({0})")]
    Unhealthy(Url),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

impl RunError {
    /// Process exit status for each fatal outcome; configuration errors use 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Unhealthy(_) => 2,
            RunError::Stats(_) => 3,
            RunError::Pool(_) => 4,
        }
    }
}

/// One configured run: shared client, immutable request spec, and the
/// knobs for probe, pool and executor.
pub struct LoadTest {
    config: Config,
    client: Client,
    spec: Arc<RequestSpec>,
}

impl LoadTest {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let spec = RequestSpec::from_config(&config)?;
        let client = build_client(config.pool_capacity(), config.socket_timeout())?;
        Ok(Self { config, client, spec: Arc::new(spec) })
    }

    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    /// Probe, dispatch every request, then reduce. Per-request lines are
    /// printed in submission order while the run progresses.
    pub async fn run(&self) -> Result<SummaryStats, RunError> {
        let cfg = &self.config;
        info!(
            url = %self.spec.generate_url,
            model = %self.spec.payload.model,
            requests = cfg.num_requests,
            concurrency = cfg.concurrency(),
            "starting load test"
        );

        if !check_health(&self.client, &self.spec.health_url, cfg.health_timeout()).await {
            return Err(RunError::Unhealthy(self.spec.health_url.clone()));
        }

        let executor = Arc::new(HttpExecutor::new(
            self.client.clone(),
            self.spec.clone(),
            cfg.request_timeout(),
            cfg.max_retries,
        ));
        let total = cfg.num_requests;
        let results = WorkerPool::new(cfg.concurrency())
            .run(executor, total, |r| report::print_request(r, total))
            .await?;

        let stats = summarize(&results)?;
        info!(successes = stats.successes, failures = stats.failures, "load test finished");
        Ok(stats)
    }
}

pub fn install_metrics_exporter(bind: &str) -> Result<(), ConfigError> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| ConfigError::Metrics(format!("invalid bind address {bind:?}: {e}")))?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ConfigError::Metrics(e.to_string()))?;
    metrics::describe_counter!("inferload_requests_total", "Requests completed, by outcome");
    metrics::describe_histogram!("inferload_request_latency_ms", "Request latency in milliseconds");
    metrics::describe_gauge!("inferload_in_flight", "Requests currently executing");
    info!(%addr, "metrics exporter listening");
    Ok(())
}
