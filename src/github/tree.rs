// src/github/tree.rs
// =============================================================================
// Builds an in-memory tree of every file and directory in a repository.
//
// How it works:
// 1. List the repository root through the contents API
// 2. Record every file entry in the current node
// 3. For every directory entry, list that directory the same way
// 4. Put each finished child into its parent, then return the parent
//
// Best effort: when a single listing fails (bad status, network error,
// garbage body) that directory becomes an empty node marked FetchFailed and
// the rest of the tree is still built. Nothing is retried.
//
// Sibling directories are fetched concurrently. Each child subtree is built by
// its own future and handed back whole, and only the parent inserts it into
// its map, so no node is ever touched by two tasks. The finished tree does not
// depend on which request happened to finish first.
//
// Rust concepts:
// - BoxFuture: async functions can't call themselves directly, because the
//   future would have infinite size. Boxing the recursive call fixes that.
// - BTreeSet / BTreeMap: sorted collections, so output is always in the
//   same order no matter how the API orders its entries
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::client::GitHubClient;
use super::models::EntryKind;
use super::reference::{RepoRef, RepoRefError};

// Whether a node's listing was actually fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Populated,
    FetchFailed,
}

impl NodeStatus {
    pub fn is_populated(&self) -> bool {
        matches!(self, NodeStatus::Populated)
    }
}

/// One directory level of a repository.
///
/// Serializes as `{"files": [...], "directories": {name: node}}`. Nodes whose
/// listing failed also carry `"status": "fetch_failed"`, which tells them
/// apart from directories that really are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryNode {
    pub files: BTreeSet<String>,
    pub directories: BTreeMap<String, RepositoryNode>,
    #[serde(default, skip_serializing_if = "NodeStatus::is_populated")]
    pub status: NodeStatus,
}

impl RepositoryNode {
    /// An empty node standing in for a directory we couldn't list.
    pub fn failed() -> Self {
        Self {
            status: NodeStatus::FetchFailed,
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == NodeStatus::FetchFailed
    }

    /// Files in this node and every node below it.
    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .directories
                .values()
                .map(RepositoryNode::file_count)
                .sum::<usize>()
    }

    /// Directories below this node (not counting the node itself).
    pub fn directory_count(&self) -> usize {
        self.directories.len()
            + self
                .directories
                .values()
                .map(RepositoryNode::directory_count)
                .sum::<usize>()
    }

    /// Levels of nesting below this node: 0 when there are no
    /// subdirectories, 1 when every subdirectory is a leaf, and so on.
    pub fn depth(&self) -> usize {
        self.directories
            .values()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Slash-joined paths of every branch whose listing failed. The root
    /// itself is reported as "".
    pub fn failed_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_failed("", &mut out);
        out
    }

    fn collect_failed(&self, path: &str, out: &mut Vec<String>) {
        if self.is_failed() {
            out.push(path.to_string());
        }
        for (name, child) in &self.directories {
            child.collect_failed(&join_path(path, name), out);
        }
    }
}

// Joins a parent path and a child name the way the contents API expects
//   join_path("", "src")    -> "src"
//   join_path("src", "bin") -> "src/bin"
fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Recursively lists a repository through the GitHub contents API.
#[derive(Debug, Clone)]
pub struct TreeFetcher {
    client: GitHubClient,
    fan_out: usize,
}

impl TreeFetcher {
    // `fan_out` caps how many sibling directories are fetched at once.
    // The client's own semaphore still caps the total across the whole tree.
    pub fn new(client: GitHubClient, fan_out: usize) -> Self {
        Self {
            client,
            fan_out: fan_out.max(1),
        }
    }

    // Parses a repository URL and fetches its full tree
    //
    // Returns: (tree, owner, repo name)
    //
    // Only a malformed URL is an error. Failed listings show up as
    // FetchFailed nodes inside the returned tree.
    pub async fn fetch_structure(
        &self,
        repo_url: &str,
    ) -> Result<(RepositoryNode, String, String), RepoRefError> {
        let repo = RepoRef::parse(repo_url)?;
        let tree = self.fetch_tree(&repo).await;
        Ok((tree, repo.owner, repo.repo))
    }

    /// Fetches the full tree of an already-parsed repository reference.
    pub async fn fetch_tree(&self, repo: &RepoRef) -> RepositoryNode {
        info!(repo = %repo, "fetching repository structure");

        let tree = self.fetch_node(repo, String::new()).await;

        info!(
            repo = %repo,
            files = tree.file_count(),
            directories = tree.directory_count(),
            failed = tree.failed_paths().len(),
            "repository structure fetched"
        );
        tree
    }

    fn fetch_node<'a>(&'a self, repo: &'a RepoRef, path: String) -> BoxFuture<'a, RepositoryNode> {
        async move {
            let entries = match self.client.list_directory(repo, &path).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(repo = %repo, path = %path, error = %e, "listing failed, leaving branch empty");
                    return RepositoryNode::failed();
                }
            };

            let mut node = RepositoryNode::default();
            let mut subdirs = Vec::new();

            for entry in entries {
                match entry.kind {
                    EntryKind::File => {
                        node.files.insert(entry.name);
                    }
                    EntryKind::Dir => {
                        let child_path = join_path(&path, &entry.name);
                        subdirs.push((entry.name, child_path));
                    }
                    EntryKind::Other => {
                        debug!(path = %join_path(&path, &entry.name), "skipping non-file entry");
                    }
                }
            }

            // Each child future owns its subtree until it's done
            let children: Vec<(String, RepositoryNode)> =
                stream::iter(subdirs.into_iter().map(|(name, child_path)| {
                    let child = self.fetch_node(repo, child_path);
                    async move { (name, child.await) }
                }))
                .buffer_unordered(self.fan_out)
                .collect()
                .await;

            node.directories.extend(children);
            node
        }
        .boxed()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why no cycle detection?
//    - The contents API mirrors a git tree, which can't contain cycles
//    - Symlinks come back as type "symlink" and are never followed
//
// 2. Why two concurrency limits?
//    - buffer_unordered(fan_out) limits one directory's children
//    - Nested levels multiply that number, so the client also holds a
//      semaphore that limits requests across the whole traversal
//
// 3. Why isn't a failed listing an error?
//    - Callers want as much of the tree as possible
//    - The failed node is marked, so `failed_paths()` lists what's missing
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use mockito::{Mock, ServerGuard};

    const FILE_A: &str = r#"{"name": "a.txt", "path": "a.txt", "type": "file"}"#;

    fn fetcher_for(server: &ServerGuard) -> TreeFetcher {
        let config = FetchConfig {
            api_base: server.url(),
            ..FetchConfig::default()
        };
        TreeFetcher::new(GitHubClient::new(&config).unwrap(), 4)
    }

    async fn listing(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    fn node(files: &[&str], directories: Vec<(&str, RepositoryNode)>) -> RepositoryNode {
        RepositoryNode {
            files: files.iter().map(|f| f.to_string()).collect(),
            directories: directories
                .into_iter()
                .map(|(name, child)| (name.to_string(), child))
                .collect(),
            status: NodeStatus::Populated,
        }
    }

    #[tokio::test]
    async fn test_reproduces_fixed_tree() {
        let mut server = mockito::Server::new_async().await;
        let root_body = format!(
            "[{}, {}]",
            FILE_A, r#"{"name": "src", "path": "src", "type": "dir"}"#
        );
        let _root = listing(&mut server, "/repos/owner/repo/contents", &root_body).await;
        let _src = listing(
            &mut server,
            "/repos/owner/repo/contents/src",
            r#"[{"name": "main.py", "path": "src/main.py", "type": "file"}]"#,
        )
        .await;

        let fetcher = fetcher_for(&server);
        let (tree, owner, repo) = fetcher
            .fetch_structure("https://github.com/owner/repo")
            .await
            .unwrap();

        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
        assert_eq!(
            tree,
            node(&["a.txt"], vec![("src", node(&["main.py"], vec![]))])
        );
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            serde_json::json!({
                "files": ["a.txt"],
                "directories": {
                    "src": {"files": ["main.py"], "directories": {}}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_failed_branch_is_empty_and_siblings_survive() {
        let mut server = mockito::Server::new_async().await;
        let _root = listing(
            &mut server,
            "/repos/owner/repo/contents",
            r#"[
                {"name": "docs", "path": "docs", "type": "dir"},
                {"name": "src", "path": "src", "type": "dir"},
                {"name": "README.md", "path": "README.md", "type": "file"}
            ]"#,
        )
        .await;
        let _docs = server
            .mock("GET", "/repos/owner/repo/contents/docs")
            .with_status(500)
            .create_async()
            .await;
        let _src = listing(
            &mut server,
            "/repos/owner/repo/contents/src",
            r#"[{"name": "lib.rs", "path": "src/lib.rs", "type": "file"}]"#,
        )
        .await;

        let (tree, _, _) = fetcher_for(&server)
            .fetch_structure("https://github.com/owner/repo")
            .await
            .unwrap();

        let docs = &tree.directories["docs"];
        assert!(docs.is_failed());
        assert!(docs.files.is_empty());
        assert!(docs.directories.is_empty());

        assert_eq!(tree.directories["src"], node(&["lib.rs"], vec![]));
        assert!(tree.files.contains("README.md"));
        assert_eq!(tree.failed_paths(), vec!["docs".to_string()]);
    }

    #[tokio::test]
    async fn test_undecodable_branch_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _root = listing(
            &mut server,
            "/repos/owner/repo/contents",
            r#"[
                {"name": "src", "path": "src", "type": "dir"},
                {"name": "docs", "path": "docs", "type": "dir"}
            ]"#,
        )
        .await;
        let _docs = listing(&mut server, "/repos/owner/repo/contents/docs", "not json").await;
        let _src = listing(
            &mut server,
            "/repos/owner/repo/contents/src",
            r#"[{"name": "main.py", "path": "src/main.py", "type": "file"}]"#,
        )
        .await;

        let (tree, _, _) = fetcher_for(&server)
            .fetch_structure("owner/repo")
            .await
            .unwrap();

        assert_eq!(tree.directories["docs"], RepositoryNode::failed());
        assert_eq!(tree.directories["src"], node(&["main.py"], vec![]));
        assert_eq!(tree.failed_paths(), vec!["docs".to_string()]);
    }

    #[tokio::test]
    async fn test_unreachable_host_gives_failed_root() {
        // Nothing listens on port 1, so the connection is refused
        let config = FetchConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            ..FetchConfig::default()
        };
        let fetcher = TreeFetcher::new(GitHubClient::new(&config).unwrap(), 4);

        let (tree, owner, repo) = fetcher.fetch_structure("owner/repo").await.unwrap();

        assert!(tree.is_failed());
        assert!(tree.files.is_empty());
        assert!(tree.directories.is_empty());
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[tokio::test]
    async fn test_failed_root_returns_failed_node() {
        let mut server = mockito::Server::new_async().await;
        let _root = server
            .mock("GET", "/repos/owner/missing/contents")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let (tree, _, repo) = fetcher_for(&server)
            .fetch_structure("owner/missing")
            .await
            .unwrap();

        assert_eq!(repo, "missing");
        assert_eq!(tree, RepositoryNode::failed());
        assert_eq!(tree.failed_paths(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_resolves_three_levels() {
        let mut server = mockito::Server::new_async().await;
        let _root = listing(
            &mut server,
            "/repos/owner/repo/contents",
            r#"[{"name": "pkg", "path": "pkg", "type": "dir"}]"#,
        )
        .await;
        let _pkg = listing(
            &mut server,
            "/repos/owner/repo/contents/pkg",
            r#"[{"name": "inner", "path": "pkg/inner", "type": "dir"}]"#,
        )
        .await;
        let _inner = listing(
            &mut server,
            "/repos/owner/repo/contents/pkg/inner",
            r#"[{"name": "deep.rs", "path": "pkg/inner/deep.rs", "type": "file"}]"#,
        )
        .await;

        let (tree, _, _) = fetcher_for(&server)
            .fetch_structure("https://github.com/owner/repo/")
            .await
            .unwrap();

        assert!(tree.directories["pkg"].directories["inner"]
            .files
            .contains("deep.rs"));
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.file_count(), 1);
        assert_eq!(tree.directory_count(), 2);
    }

    #[tokio::test]
    async fn test_refetch_is_idempotent() {
        let mut server = mockito::Server::new_async().await;
        let root = server
            .mock("GET", "/repos/owner/repo/contents")
            .with_status(200)
            .with_body(format!(
                "[{}, {}]",
                FILE_A, r#"{"name": "src", "path": "src", "type": "dir"}"#
            ))
            .expect(2)
            .create_async()
            .await;
        let src = server
            .mock("GET", "/repos/owner/repo/contents/src")
            .with_status(200)
            .with_body(r#"[{"name": "main.py", "path": "src/main.py", "type": "file"}]"#)
            .expect(2)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let first = fetcher.fetch_structure("owner/repo").await.unwrap();
        let second = fetcher.fetch_structure("owner/repo").await.unwrap();

        assert_eq!(first, second);
        root.assert_async().await;
        src.assert_async().await;
    }

    #[tokio::test]
    async fn test_skips_symlinks_and_submodules() {
        let mut server = mockito::Server::new_async().await;
        let _root = listing(
            &mut server,
            "/repos/owner/repo/contents",
            r#"[
                {"name": "a.txt", "path": "a.txt", "type": "file"},
                {"name": "vendor", "path": "vendor", "type": "submodule"},
                {"name": "latest", "path": "latest", "type": "symlink"}
            ]"#,
        )
        .await;

        let (tree, _, _) = fetcher_for(&server)
            .fetch_structure("owner/repo")
            .await
            .unwrap();

        assert_eq!(tree, node(&["a.txt"], vec![]));
    }

    #[tokio::test]
    async fn test_rejects_bad_reference_without_requests() {
        let server = mockito::Server::new_async().await;
        let result = fetcher_for(&server)
            .fetch_structure("https://github.com/only-owner")
            .await;
        assert!(matches!(result, Err(RepoRefError::TooFewSegments(_))));
    }

    #[test]
    fn test_failed_status_round_trips_through_json() {
        let tree = node(&[], vec![("broken", RepositoryNode::failed())]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "files": [],
                "directories": {
                    "broken": {"files": [], "directories": {}, "status": "fetch_failed"}
                }
            })
        );

        let back: RepositoryNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "src"), "src");
        assert_eq!(join_path("src", "bin"), "src/bin");
    }
}
