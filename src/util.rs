use crate::config::ConfigError;
use std::time::Instant;
use url::Url;

/// `{base}{path}` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> Result<Url, ConfigError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    let url = Url::parse(&raw).map_err(|source| ConfigError::Url { url: raw.clone(), source })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABase(raw));
    }
    Ok(url)
}

pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
