//! Run configuration resolved from command-line flags and the environment.

use crate::error::{ExtractorError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT: &str = "merchant_data.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the merchant API.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Base URL of the API; the scheme may be omitted.
    pub base_url: String,
    /// Opaque credential sent as `Authorization: Basic <api_key>`.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Base URL with trailing slashes removed and `https://` added when no
    /// scheme is present.
    pub fn normalized_base_url(&self) -> String {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.starts_with("http") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        }
    }
}

/// Where merchant data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewaySource {
    Http(GatewayConfig),
    Replay(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub source: GatewaySource,
    pub output: PathBuf,
}

impl ExtractorConfig {
    /// Builds a configuration from raw flag values.
    ///
    /// A replay file takes precedence over the base URL. Empty strings count as
    /// missing values.
    pub fn resolve(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: u64,
        replay: Option<PathBuf>,
        output: PathBuf,
    ) -> Result<Self> {
        let source = match (replay, non_empty(base_url)) {
            (Some(path), _) => GatewaySource::Replay(path),
            (None, Some(base_url)) => GatewaySource::Http(GatewayConfig {
                base_url,
                api_key: non_empty(api_key),
                timeout: Duration::from_secs(timeout_secs),
            }),
            (None, None) => {
                return Err(ExtractorError::Config(
                    "PAYENGINE_BASE_URL environment variable is required".to_string(),
                ));
            }
        };

        Ok(Self { source, output })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
