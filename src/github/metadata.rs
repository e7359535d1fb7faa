// src/github/metadata.rs
// =============================================================================
// Small lookups that describe a repository beyond its file tree:
// - the repository summary (stars, forks, language, creation date...)
// - the top contributors
//
// Both are "nice to have". A missing summary is reported to the caller as an
// error so it can print N/A; a failed contributors request just yields an
// empty list.
// =============================================================================

use tracing::warn;

use super::client::{ApiError, GitHubClient};
use super::models::{Contributor, RepoMetadata};
use super::reference::RepoRef;

/// How many contributors `info` shows unless told otherwise.
pub const DEFAULT_CONTRIBUTOR_LIMIT: usize = 5;

// GitHub won't return more than this per page
const MAX_PER_PAGE: usize = 100;

impl GitHubClient {
    // GET /repos/{owner}/{repo}
    pub async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, ApiError> {
        let url = self.repo_endpoint(repo, &[])?;
        self.get_json(url).await
    }

    // GET /repos/{owner}/{repo}/contributors, most active first
    //
    // Never fails: errors are logged and an empty list comes back.
    pub async fn top_contributors(&self, repo: &RepoRef, limit: usize) -> Vec<Contributor> {
        if limit == 0 {
            return Vec::new();
        }

        let mut url = match self.repo_endpoint(repo, &["contributors"]) {
            Ok(url) => url,
            Err(e) => {
                warn!(repo = %repo, error = %e, "cannot build contributors URL");
                return Vec::new();
            }
        };
        url.query_pairs_mut()
            .append_pair("per_page", &limit.min(MAX_PER_PAGE).to_string());

        match self.get_json::<Vec<Contributor>>(url).await {
            Ok(mut contributors) => {
                contributors.truncate(limit);
                contributors
            }
            Err(e) => {
                warn!(repo = %repo, error = %e, "could not fetch contributors");
                Vec::new()
            }
        }
    }
}
