use crate::{
    config::{Config, ConfigError},
    util::join_url,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

pub const HEALTH_PATH: &str = "/healthz";

/// Body of every generate call. Streaming is always off.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GeneratePayload {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// Immutable description of the request every worker sends.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub generate_url: Url,
    pub health_url: Url,
    pub headers: HeaderMap,
    pub payload: GeneratePayload,
}

impl RequestSpec {
    pub fn new(
        base_url: &str,
        endpoint: &str,
        model: impl Into<String>,
        prompt: impl Into<String>,
        extra_headers: &[String],
    ) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for raw in extra_headers.iter().filter(|raw| !raw.trim().is_empty()) {
            let (name, value) = parse_header(raw)?;
            headers.insert(name, value);
        }

        Ok(Self {
            generate_url: join_url(base_url, endpoint)?,
            health_url: join_url(base_url, HEALTH_PATH)?,
            headers,
            payload: GeneratePayload { model: model.into(), prompt: prompt.into(), stream: false },
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Self::new(&cfg.base_url, &cfg.endpoint, cfg.model.clone(), cfg.prompt.clone(), &cfg.headers)
    }
}

/// Parse `NAME:VALUE`, trimming whitespace around both halves.
pub fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError::MalformedHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::MalformedHeader(raw.to_string()));
    }
    let invalid = || ConfigError::InvalidHeader { name: name.to_string() };
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
    let header_value = HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((header_name, header_value))
}
