use anyhow::{Context, Result};
use reqwest::Url;
use std::env;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/rag";
pub const ENDPOINT_VAR: &str = "RAG_ENDPOINT";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub endpoint: Url,
}

impl ChatConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_endpoint(env::var(ENDPOINT_VAR).ok().as_deref())
    }

    pub fn from_endpoint(endpoint: Option<&str>) -> Result<Self> {
        let raw = endpoint
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT);

        let endpoint = Url::parse(raw)
            .with_context(|| format!("{} is not a valid URL: {}", ENDPOINT_VAR, raw))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "{} must use http or https, got {}",
                ENDPOINT_VAR,
                endpoint.scheme()
            ));
        }

        Ok(Self { endpoint })
    }
}
