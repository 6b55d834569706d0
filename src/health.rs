use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Pre-flight liveness check. Healthy only on an exact 200; every other
/// outcome, including transport errors and timeouts, is unhealthy.
pub async fn check_health(client: &Client, url: &Url, timeout: Duration) -> bool {
    match client.get(url.clone()).timeout(timeout).send().await {
        Ok(resp) if resp.status() == StatusCode::OK => {
            tracing::debug!(%url, "target healthy");
            true
        }
        Ok(resp) => {
            tracing::warn!(%url, status = resp.status().as_u16(), "health check returned non-200");
            false
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "health check failed");
            false
        }
    }
}
