// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Global flags (work before or after the subcommand):
//   --token      GitHub access token (or GITHUB_TOKEN)
//   --api-base   API root, for GitHub Enterprise or tests (or GITHUB_API_BASE_URL)
//   --timeout    per-request timeout in seconds
//   -v           more logging; repeat for debug output
//
// Subcommands:
//   tree  <repo>   fetch and print the full file tree
//   info  <repo>   print repository metadata and top contributors
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{DEFAULT_API_BASE, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use crate::github::DEFAULT_CONTRIBUTOR_LIMIT;

#[derive(Parser, Debug)]
#[command(
    name = "repo-scout",
    version,
    about = "Map the file tree and metadata of a GitHub repository",
    long_about = "repo-scout walks a GitHub repository through the REST contents API and prints \
                  its full file tree, as text or as JSON ready to feed into other tools."
)]
pub struct Cli {
    /// GitHub access token, sent as a bearer token for higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Root of the GitHub REST API
    #[arg(long, env = "GITHUB_API_BASE_URL", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the full file and directory tree of a repository
    ///
    /// Example: repo-scout tree https://github.com/rust-lang/rustlings --json
    Tree {
        /// Repository URL (e.g., https://github.com/user/repo) or owner/repo
        repo_url: String,

        /// Print the tree as JSON instead of an indented listing
        #[arg(long)]
        json: bool,

        /// Also save the tree as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of directory listings in flight at once
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },

    /// Show repository metadata and top contributors
    ///
    /// Example: repo-scout info https://github.com/rust-lang/rust
    Info {
        /// Repository URL (e.g., https://github.com/user/repo) or owner/repo
        repo_url: String,

        /// Output in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// How many contributors to list
        #[arg(long, default_value_t = DEFAULT_CONTRIBUTOR_LIMIT)]
        contributors: usize,
    },
}
