// src/github/reference.rs
// =============================================================================
// Parses repository references like "https://github.com/rust-lang/rust".
//
// Rules:
// - Trailing slashes are ignored
// - The LAST two path segments are the owner and the repository name, so
//   "https://github.com/owner/repo", "github.com/owner/repo" and "owner/repo"
//   all point at the same repository
// - A trailing ".git" on the repository name is dropped
// - Anything with fewer than two segments is rejected
//
// The host is not checked. GitHub Enterprise and mirrors work as long as the
// owner/repo pair is at the end of the path.
// =============================================================================

use std::fmt;

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

// Input-validation failures for repository references
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoRefError {
    #[error("repository reference is empty")]
    Empty,

    #[error("expected at least two path segments (owner/repo) in '{0}'")]
    TooFewSegments(String),
}

/// An owner/name pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    // Parses a URL-like string into an owner/repo pair
    //
    // Example:
    //   "https://github.com/rust-lang/rust/" -> RepoRef { owner: "rust-lang", repo: "rust" }
    pub fn parse(input: &str) -> Result<Self, RepoRefError> {
        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(RepoRefError::Empty);
        }

        // Full URLs: only look at the path, so the host never counts as a
        // segment. Url hands back percent-encoded segments; decode them so
        // the client doesn't encode them a second time. Everything else
        // ("github.com/a/b", "a/b") is split as-is.
        let segments: Vec<String> = match Url::parse(trimmed) {
            Ok(url) if url.has_host() => url
                .path_segments()
                .map(|segments| {
                    segments
                        .filter(|s| !s.is_empty())
                        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default(),
            _ => trimmed
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        };

        let [.., owner, repo] = segments.as_slice() else {
            return Err(RepoRefError::TooFewSegments(input.to_string()));
        };

        let repo = repo.strip_suffix(".git").unwrap_or(repo.as_str());
        if repo.is_empty() {
            return Err(RepoRefError::TooFewSegments(input.to_string()));
        }

        Ok(Self::new(owner.as_str(), repo))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
