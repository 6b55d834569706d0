#![allow(dead_code)]

use axum::Router;
use inferload::executor::http::{build_client, HttpExecutor};
use inferload::request::RequestSpec;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral port and return its base url.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base url of a port nothing listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn client() -> reqwest::Client {
    build_client(8, Duration::from_secs(10)).unwrap()
}

pub fn spec(base_url: &str) -> Arc<RequestSpec> {
    Arc::new(
        RequestSpec::new(
            base_url,
            "/api/generate",
            "llama3.1:8b",
            "Explain quantum computing in one sentence.",
            &["X-Model: llama3.1:8b".to_string()],
        )
        .unwrap(),
    )
}

pub fn executor(base_url: &str, timeout: Duration, max_retries: u32) -> HttpExecutor {
    HttpExecutor::new(client(), spec(base_url), timeout, max_retries)
}
