// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Submodules:
// - reference: parsing "https://github.com/owner/repo" into owner + repo
// - client: the shared HTTP client (auth header, rate limiting, errors)
// - models: the response fields we deserialize
// - tree: recursive listing of a repository's files and directories
// - metadata: repository summary and top contributors
// =============================================================================

mod client;
mod metadata;
mod models;
mod reference;
mod tree;

pub use client::GitHubClient;
pub use metadata::DEFAULT_CONTRIBUTOR_LIMIT;
pub use models::{Contributor, RepoMetadata};
pub use reference::RepoRef;
pub use tree::{RepositoryNode, TreeFetcher};
