//! Subtitle file discovery for callers that take directories.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

/// Recursive walker that collects `.ass` files.
///
/// Explicit file arguments pass through untouched so callers can mix files
/// and directories; a missing root is an error (unlike the enumeration
/// boundary, this is caller input, not host state).
#[derive(Debug, Clone)]
pub struct SubtitleDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl SubtitleDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                return Err(anyhow!("path does not exist: {}", root.display()));
            }
            if root.is_file() {
                found.push(root.clone());
                continue;
            }

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = entry?;
                if entry.file_type().is_file() && is_subtitle(entry.path()) {
                    found.push(entry.path().to_path_buf());
                }
            }
        }

        Ok(found)
    }
}

fn is_subtitle(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case("ass"),
        None => false,
    }
}
