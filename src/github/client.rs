// src/github/client.rs
// =============================================================================
// A thin wrapper around reqwest for the GitHub REST API.
//
// Every request:
// - asks for the v3 JSON media type
// - sends a User-Agent (GitHub rejects requests without one)
// - sends `Authorization: Bearer <token>` only when a token is configured
// - waits for a permit from a shared semaphore, so no matter how wide the
//   repository tree is, at most `concurrency` requests are in flight
//
// Failures come back as ApiError so callers can decide what to do with them.
// The tree fetcher turns them into empty branches; `info` shows N/A instead.
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

use super::models::ContentEntry;
use super::reference::RepoRef;
use crate::config::FetchConfig;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

// Why a single API call failed
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot build an API path under {0}")]
    BadBase(String),
}

/// GitHub REST client shared by the tree fetcher and the metadata lookups.
///
/// Cloning is cheap: the reqwest client and the semaphore are both shared.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    permits: Arc<Semaphore>,
}

impl GitHubClient {
    // Builds a client from an explicit config
    //
    // Fails if the config is invalid or the token can't be used as a header
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let api_base = config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GitHub token contains characters not allowed in a header")?;
            // Keeps the token out of Debug output
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_base,
            permits: Arc::new(Semaphore::new(config.concurrency)),
        })
    }

    // Builds {api_base}/repos/{owner}/{repo}/{tail...}
    //
    // Each segment is percent-encoded on its own, so names with spaces or
    // '#' in them don't break the URL. Empty segments are skipped, which
    // means an empty path lists the repository root.
    pub(super) fn repo_endpoint(&self, repo: &RepoRef, tail: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::BadBase(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str()])
            .extend(tail.iter().filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    // Lists the immediate children of `path` ("" = repository root)
    pub async fn list_directory(
        &self,
        repo: &RepoRef,
        path: &str,
    ) -> Result<Vec<ContentEntry>, ApiError> {
        let mut tail = vec!["contents"];
        tail.extend(path.split('/'));
        let url = self.repo_endpoint(repo, &tail)?;
        self.get_json(url).await
    }

    // GETs a URL and decodes the JSON body
    //
    // Any non-2xx status is an error; we never try to decode error bodies.
    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        // The semaphore is never closed, so acquire() can't actually fail
        let _permit = self.permits.acquire().await.ok();

        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json::<T>().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
