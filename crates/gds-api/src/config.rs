//! Client configuration, loadable from YAML.

use std::collections::BTreeMap;
use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid endpoint '{endpoint}': {reason}")]
    Endpoint { endpoint: String, reason: String },
}

/// Connection settings for one service.
///
/// ```yaml
/// endpoint: https://search.example.gov.uk
/// timeout_secs: 10
/// page_size: 50
/// headers:
///   User-Agent: my-app/1.0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the service
    pub endpoint: String,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default page size for paginated searches
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Headers sent with every request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    4
}

fn default_page_size() -> usize {
    100
}

impl ClientConfig {
    /// Config for `endpoint` with default timeout, page size and no extra headers.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            headers: BTreeMap::new(),
        }
    }

    /// Load and validate a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML config document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url().map(|_| ())
    }

    pub(crate) fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::Endpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Endpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}
