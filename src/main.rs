// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load a .env file if there is one (GITHUB_TOKEN etc.)
// 2. Parse command-line arguments using clap
// 3. Set up logging
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = complete, 1 = some branches failed, 2 = error)
// =============================================================================

mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - explicit client settings
mod github;        // src/github/ - GitHub API access and tree fetching
mod output;        // src/output.rs - printing and saving results

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::FetchConfig;
use github::{GitHubClient, RepoRef, RepositoryNode, TreeFetcher};

const EXIT_OK: i32 = 0;
const EXIT_PARTIAL: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout stays clean for JSON output
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = everything fetched
//   Ok(1) = tree printed, but some branches could not be listed
//   Err   = bad input or an unexpected error (exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    let base_config = FetchConfig {
        api_base: cli.api_base,
        timeout: Duration::from_secs(cli.timeout),
        ..FetchConfig::default()
    }
    .with_token(cli.token);

    match cli.command {
        Commands::Tree {
            repo_url,
            json,
            output,
            concurrency,
        } => {
            let config = FetchConfig {
                concurrency,
                ..base_config
            };
            handle_tree(&config, &repo_url, json, output.as_deref()).await
        }
        Commands::Info {
            repo_url,
            json,
            contributors,
        } => handle_info(&base_config, &repo_url, json, contributors).await,
    }
}

// Handles the 'tree' subcommand
async fn handle_tree(
    config: &FetchConfig,
    repo_url: &str,
    json: bool,
    output_path: Option<&Path>,
) -> Result<i32> {
    if config.token.is_none() {
        info!("no GitHub token configured, requests are anonymous and rate limited");
    }

    let client = GitHubClient::new(config)?;
    let fetcher = TreeFetcher::new(client, config.concurrency);

    let (tree, owner, repo_name) = fetcher.fetch_structure(repo_url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", output::render_tree(&format!("{}/{}", owner, repo_name), &tree));
        output::print_summary(&tree);
    }

    if let Some(path) = output_path {
        output::write_json(path, &tree)?;
        info!(path = %path.display(), "repository structure saved");
    }

    Ok(tree_exit_code(&tree))
}

// 0 when every directory was listed, 1 when some branches came back empty
fn tree_exit_code(tree: &RepositoryNode) -> i32 {
    let failed = tree.failed_paths();
    if failed.is_empty() {
        EXIT_OK
    } else {
        warn!(count = failed.len(), "some directories could not be listed");
        EXIT_PARTIAL
    }
}

// Handles the 'info' subcommand
async fn handle_info(
    config: &FetchConfig,
    repo_url: &str,
    json: bool,
    contributor_limit: usize,
) -> Result<i32> {
    let repo = RepoRef::parse(repo_url)?;
    let client = GitHubClient::new(config)?;

    let metadata = match client.repo_metadata(&repo).await {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            warn!(repo = %repo, error = %e, "repository metadata unavailable");
            None
        }
    };
    let contributors = client.top_contributors(&repo, contributor_limit).await;

    output::print_info(&repo, metadata.as_ref(), &contributors, json)?;
    Ok(EXIT_OK)
}
