//! Connection settings for the execution service.

use std::time::Duration;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const BASE_URL_ENV: &str = "WORKFLOW_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Where the execution service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme, host and port, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Defaults, with the base URL taken from `WORKFLOW_API_URL` when set.
    pub fn from_env() -> Self {
        Self::from_base_url_var(std::env::var(BASE_URL_ENV).ok())
    }

    /// Blank values count as unset.
    fn from_base_url_var(value: Option<String>) -> Self {
        match value {
            Some(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn execute_url(&self) -> String {
        format!("{}/api/workflow/execute", self.base_url)
    }

    pub fn validate_url(&self) -> String {
        format!("{}/validate", self.base_url)
    }
}
