use std::env;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gateway_url: String,
    pub gateway_timeout_secs: u64,
    pub api_key: String,
    pub default_model: String,
    pub user: String,
}

impl AppConfig {
    /// Reads the configuration from `TRACE_ASSIST_*` environment
    /// variables. Only the gateway URL is required.
    pub fn from_env() -> Result<Self> {
        let gateway_url = env::var("TRACE_ASSIST_GATEWAY_URL").unwrap_or_default();
        Self::from_env_with_gateway(&gateway_url)
    }

    /// Same as `from_env` but the gateway URL is supplied by the
    /// caller, e.g. from a command line flag.
    pub fn from_env_with_gateway(gateway_url: &str) -> Result<Self> {
        let gateway_url = normalize_gateway_url(gateway_url)?;
        let gateway_timeout_secs = match env::var("TRACE_ASSIST_GATEWAY_TIMEOUT") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid TRACE_ASSIST_GATEWAY_TIMEOUT: {}", raw))?,
            _ => DEFAULT_TIMEOUT_SECS,
        };
        let api_key = env::var("TRACE_ASSIST_API_KEY").unwrap_or_default();
        let default_model =
            env::var("TRACE_ASSIST_DEFAULT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let user = env::var("TRACE_ASSIST_USER").unwrap_or_else(|_| "Guest".to_string());

        Ok(Self {
            gateway_url,
            gateway_timeout_secs,
            api_key,
            default_model,
            user,
        })
    }
}

/// Validates the configured gateway URL and returns it without a
/// trailing slash. Older deployments pointed the URL at the
/// `/suggest` endpoint itself so that suffix is dropped to get back
/// to the base.
pub fn normalize_gateway_url(raw: &str) -> Result<String> {
    let configured = raw.trim();
    if configured.is_empty() {
        bail!("AI gateway URL is not configured");
    }

    let mut url = Url::parse(configured).map_err(|_| anyhow!("AI gateway URL is invalid"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("AI gateway URL is invalid");
    }

    let mut path = url.path().trim_end_matches('/').to_string();
    if let Some(stripped) = path.strip_suffix("/suggest") {
        path = stripped.to_string();
    }
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}
