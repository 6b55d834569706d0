use clap::Parser;
use dotenvy::dotenv;
use inferload::config::Config;
use inferload::report;
use inferload::runner::{install_metrics_exporter, LoadTest, RunError};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();
    let cfg = Config::parse();

    // logs
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Some(bind) = &cfg.metrics_bind {
        install_metrics_exporter(bind)?;
    }

    let json = cfg.json;
    let test = LoadTest::new(cfg)?;
    match test.run().await {
        Ok(stats) => {
            report::print_summary(&stats, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if let RunError::Unhealthy(_) = e {
                println!("❌ Service is not healthy");
            }
            tracing::error!(error = %e, "run aborted");
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
