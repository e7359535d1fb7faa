// src/github/models.rs
// =============================================================================
// The parts of GitHub API responses we care about.
//
// GitHub sends back far more fields than these. serde ignores unknown fields
// by default, so each struct only names what the rest of the app reads.
// Optional fields use #[serde(default)] so a sparse or odd response still
// deserializes instead of failing the whole request.
// =============================================================================

use serde::{Deserialize, Serialize};

// What kind of thing a directory listing entry is
//
// Only files and directories end up in the tree. Symlinks, submodules and
// anything GitHub adds in the future fall into `Other` and are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One item of a contents-listing response
/// (`GET /repos/{owner}/{repo}/contents/{path}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// Repository summary from `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub open_issues_count: Option<u64>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RepoMetadata {
    /// Year the repository was created, e.g. "2019" (GitHub timestamps are
    /// ISO 8601, so the first four characters are the year).
    pub fn created_year(&self) -> Option<&str> {
        self.created_at.as_deref().and_then(|ts| ts.get(..4))
    }
}

/// One entry of `GET /repos/{owner}/{repo}/contributors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub contributions: u64,
}
