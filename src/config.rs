// src/config.rs
// =============================================================================
// Settings for talking to the GitHub API.
//
// Everything the fetcher needs (API base URL, access token, timeouts, how many
// requests may run at once) lives in one plain struct that is handed to
// GitHubClient::new. Nothing is read from global state, so tests can point the
// client at a mock server with fake credentials, or none at all.
//
// Where the values come from:
// - CLI flags (see cli.rs)
// - environment variables, through clap's `env` support
// - a .env file in the working directory, loaded at start-up in main.rs
// =============================================================================

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Public GitHub REST API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default number of listing requests allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Problems with a FetchConfig that make it impossible to build a client
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API base URL is not an absolute http(s) URL: {0}")]
    InvalidApiBase(String),

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("request timeout must be longer than zero")]
    ZeroTimeout,
}

// Configuration for GitHubClient
//
// `token` is optional: without it requests are anonymous and subject to the
// host's anonymous rate limit.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("repo-scout/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Sets the access token. Blank tokens (e.g. `GITHUB_TOKEN=` in a .env
    /// file) count as no token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    // Checks the config and returns the parsed API base URL
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        let url = Url::parse(&self.api_base)
            .map_err(|_| ConfigError::InvalidApiBase(self.api_base.clone()))?;

        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ConfigError::InvalidApiBase(self.api_base.clone()));
        }

        Ok(url)
    }
}
