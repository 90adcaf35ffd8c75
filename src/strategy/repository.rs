use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::app::{GleanerError, Result};
use crate::domain::{Document, RepositoryDocument, SourceUrl};
use crate::strategy::DocumentStrategy;

pub const DEFAULT_IGNORED_SUFFIXES: [&str; 5] = [".git", ".toml", ".lock", ".png", ".jpg"];

/// Clones a git repository and captures its text files.
pub struct RepositoryStrategy {
    ignored_suffixes: Vec<String>,
}

impl Default for RepositoryStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED_SUFFIXES.iter().map(|s| s.to_string()).collect())
    }
}

impl RepositoryStrategy {
    pub fn new(ignored_suffixes: Vec<String>) -> Self {
        Self { ignored_suffixes }
    }

    async fn clone_into(&self, url: &SourceUrl, target: &Path) -> Result<()> {
        let output = Command::new("git")
            .arg("clone")
            .arg("--depth")
            .arg("1")
            .arg("--quiet")
            .arg(url.as_str())
            .arg(target)
            .output()
            .await
            .map_err(|e| GleanerError::Git(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(GleanerError::Git(format!(
                "git clone {} failed: {}",
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Last path segment of the repository URL without a `.git` suffix.
pub fn repository_name(url: &SourceUrl) -> String {
    let path = url.as_str().trim_end_matches('/');
    let last = path.rsplit('/').next().unwrap_or(path);
    last.trim_end_matches(".git").to_string()
}

fn is_ignored(relative: &str, suffixes: &[String]) -> bool {
    relative
        .split('/')
        .any(|component| suffixes.iter().any(|s| component.ends_with(s.as_str())))
}

/// Reads every non-ignored file below `root`, keyed by `/`-separated
/// relative path. Files that are not valid UTF-8 are skipped.
pub fn collect_files(root: &Path, ignored_suffixes: &[String]) -> Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if is_ignored(&relative, ignored_suffixes) {
                continue;
            }

            if entry.file_type()?.is_dir() {
                pending.push(path);
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(content) => {
                    files.insert(relative, content);
                }
                Err(e) => warn!(path = %relative, error = %e, "Can't read repository file"),
            }
        }
    }

    Ok(files)
}

#[async_trait]
impl DocumentStrategy for RepositoryStrategy {
    fn name(&self) -> &'static str {
        "repository"
    }

    async fn extract_one(&self, url: &SourceUrl) -> Result<Document> {
        let workdir = tempfile::tempdir()?;
        let repo_name = repository_name(url);
        let checkout = workdir.path().join(if repo_name.is_empty() {
            "repository"
        } else {
            repo_name.as_str()
        });

        info!(url = %url, "Cloning repository");
        self.clone_into(url, &checkout).await?;

        let ignored = self.ignored_suffixes.clone();
        let root = checkout.clone();
        let files = tokio::task::spawn_blocking(move || collect_files(&root, &ignored))
            .await
            .map_err(|e| GleanerError::Other(format!("Repository walk panicked: {}", e)))??;

        debug!(url = %url, files = files.len(), "Collected repository files");

        // `workdir` is removed when it goes out of scope, on every path.
        Ok(RepositoryDocument {
            repo_url: url.clone(),
            repo_name,
            files,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> Vec<String> {
        DEFAULT_IGNORED_SUFFIXES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_repository_name() {
        let url = SourceUrl::parse("https://github.com/owner/project.git").unwrap();
        assert_eq!(repository_name(&url), "project");
        let url = SourceUrl::parse("https://github.com/owner/project/").unwrap();
        assert_eq!(repository_name(&url), "project");
    }

    #[test]
    fn test_is_ignored_checks_every_component() {
        let ignored = suffixes();
        assert!(is_ignored(".git/HEAD", &ignored));
        assert!(is_ignored("Cargo.toml", &ignored));
        assert!(is_ignored("assets/logo.png", &ignored));
        assert!(is_ignored("weird.lock/inner.rs", &ignored));
        assert!(!is_ignored("src/main.rs", &ignored));
    }

    #[test]
    fn test_collect_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("README.md"), "hello").unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn a() {}").unwrap();
        fs::write(root.join("src/nested/mod.rs"), "mod b;").unwrap();
        fs::write(root.join("Cargo.toml"), "[package]").unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::write(root.join("src/blob.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let files = collect_files(root, &suffixes()).unwrap();
        let paths: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["README.md", "src/lib.rs", "src/nested/mod.rs"]);
        assert_eq!(files["src/lib.rs"], "pub fn a() {}");
    }
}
