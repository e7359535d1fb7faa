// src/output.rs
// =============================================================================
// Everything the CLI prints or saves.
//
// - render_tree: indented text listing of a RepositoryNode
// - print_summary: counts plus the list of branches that failed to load
// - write_json: pretty JSON of the tree, to a file
// - print_info: repository metadata table and contributors list
//
// Human-readable text goes to stdout. Progress and warnings go through
// tracing (stderr), so `--json` output can be piped straight into jq.
// =============================================================================

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::github::{Contributor, RepoMetadata, RepoRef, RepositoryNode};

// Renders a tree like:
//
//   owner/repo
//     src/
//       main.rs
//     Cargo.toml
//
// Directories come first, then files, each group sorted by name.
pub fn render_tree(title: &str, tree: &RepositoryNode) -> String {
    let mut out = String::new();
    out.push_str(title);
    if tree.is_failed() {
        out.push_str(" (fetch failed)");
    }
    out.push('\n');
    render_children(tree, 1, &mut out);
    out
}

fn render_children(node: &RepositoryNode, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);

    for (name, child) in &node.directories {
        out.push_str(&indent);
        out.push_str(name);
        out.push('/');
        if child.is_failed() {
            out.push_str(" (fetch failed)");
        }
        out.push('\n');
        render_children(child, level + 1, out);
    }

    for file in &node.files {
        out.push_str(&indent);
        out.push_str(file);
        out.push('\n');
    }
}

// Prints totals after the tree
pub fn print_summary(tree: &RepositoryNode) {
    let failed = tree.failed_paths();

    println!();
    println!("📊 Summary:");
    println!("   📄 Files: {}", tree.file_count());
    println!("   📁 Directories: {}", tree.directory_count());
    println!("   📐 Depth: {}", tree.depth());
    println!("   ❌ Failed branches: {}", failed.len());

    for path in &failed {
        let shown = if path.is_empty() { "(root)" } else { path.as_str() };
        println!("      - {}", shown);
    }
}

// Saves the tree as pretty-printed JSON
pub fn write_json(path: &Path, tree: &RepositoryNode) -> Result<()> {
    let json = serde_json::to_string_pretty(tree)?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// Shape of `info --json`
#[derive(Serialize)]
struct InfoReport<'a> {
    owner: &'a str,
    repo: &'a str,
    metadata: Option<&'a RepoMetadata>,
    contributors: &'a [Contributor],
}

// Prints repository metadata and contributors, as a table or as JSON
pub fn print_info(
    repo: &RepoRef,
    metadata: Option<&RepoMetadata>,
    contributors: &[Contributor],
    json: bool,
) -> Result<()> {
    if json {
        let report = InfoReport {
            owner: &repo.owner,
            repo: &repo.repo,
            metadata,
            contributors,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_info(repo, metadata, contributors));
    }
    Ok(())
}

fn render_info(repo: &RepoRef, metadata: Option<&RepoMetadata>, contributors: &[Contributor]) -> String {
    let empty = RepoMetadata::default();
    let m = metadata.unwrap_or(&empty);

    let rows = [
        ("Repository", m.full_name.clone().unwrap_or_else(|| repo.to_string())),
        ("Description", or_na(m.description.clone())),
        ("URL", or_na(m.html_url.clone())),
        ("Primary Language", or_na(m.language.clone())),
        ("Stars", or_na(m.stargazers_count)),
        ("Forks", or_na(m.forks_count)),
        ("Open Issues", or_na(m.open_issues_count)),
        ("Default Branch", or_na(m.default_branch.clone())),
        ("Created", or_na(m.created_year())),
    ];

    let mut out = String::new();
    out.push_str(&format!("{:<20} {}\n", "FIELD", "VALUE"));
    out.push_str(&format!("{}\n", "=".repeat(60)));
    for (field, value) in rows {
        out.push_str(&format!("{:<20} {}\n", field, value));
    }

    out.push('\n');
    if contributors.is_empty() {
        out.push_str("No contributors found\n");
    } else {
        out.push_str("Contributors:\n");
        for c in contributors {
            out.push_str(&format!(
                "- {} ({}) - {} contributions\n",
                c.login, c.html_url, c.contributions
            ));
        }
    }
    out
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> RepositoryNode {
        let mut src = RepositoryNode::default();
        src.files.insert("main.rs".to_string());
        src.files.insert("lib.rs".to_string());

        let mut root = RepositoryNode::default();
        root.files.insert("README.md".to_string());
        root.files.insert("Cargo.toml".to_string());
        root.directories.insert("src".to_string(), src);
        root.directories
            .insert("docs".to_string(), RepositoryNode::failed());
        root
    }

    #[test]
    fn test_render_tree_orders_dirs_then_files() {
        let text = render_tree("owner/repo", &sample_tree());
        let expected = "\
owner/repo
  docs/ (fetch failed)
  src/
    lib.rs
    main.rs
  Cargo.toml
  README.md
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_failed_root() {
        let text = render_tree("owner/repo", &RepositoryNode::failed());
        assert_eq!(text, "owner/repo (fetch failed)\n");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo_structure.json");

        write_json(&path, &sample_tree()).unwrap();

        let saved: RepositoryNode =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, sample_tree());
    }

    #[test]
    fn test_write_json_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(write_json(&path, &sample_tree()).is_err());
    }

    #[test]
    fn test_render_info_without_metadata() {
        let text = render_info(&RepoRef::new("owner", "repo"), None, &[]);
        assert!(text.contains("owner/repo"));
        assert!(text.contains("N/A"));
        assert!(text.contains("No contributors found"));
    }

    #[test]
    fn test_render_info_with_contributors() {
        let metadata = RepoMetadata {
            stargazers_count: Some(42),
            language: Some("Rust".to_string()),
            ..RepoMetadata::default()
        };
        let contributors = vec![Contributor {
            login: "alice".to_string(),
            html_url: "https://github.com/alice".to_string(),
            contributions: 7,
        }];

        let text = render_info(&RepoRef::new("owner", "repo"), Some(&metadata), &contributors);
        assert!(text.contains("42"));
        assert!(text.contains("Rust"));
        assert!(text.contains("- alice (https://github.com/alice) - 7 contributions"));
    }
}
