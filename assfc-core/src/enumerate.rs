//! Installed-font enumeration backends.
//!
//! The host's font inventory is an external collaborator: anything that can
//! answer "which family names are installed, and in which files?". Backends
//! implement [`FontEnumeration`] and report failure as a plain error, which
//! [`crate::index::FontIndex::build`] downgrades to an empty, degraded
//! index rather than a crash.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

/// One installed font file and the family aliases it answers to.
///
/// A single file may declare several names (localized spellings, short
/// names); each alias maps independently to the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFont {
    pub families: Vec<String>,
    pub path: PathBuf,
}

/// Source of the host's installed-font inventory.
pub trait FontEnumeration {
    fn enumerate(&self) -> Result<Vec<InstalledFont>>;
}

/// fontconfig-backed enumeration via the `fc-list` command line tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FcListEnumeration;

impl FontEnumeration for FcListEnumeration {
    fn enumerate(&self) -> Result<Vec<InstalledFont>> {
        let output = Command::new("fc-list")
            .arg("--format=%{family}|%{file}\\n")
            .output()
            .context("spawning fc-list")?;

        if !output.status.success() {
            return Err(anyhow!("fc-list exited with {}", output.status));
        }

        Ok(parse_fc_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `fc-list --format=%{family}|%{file}\n` output.
///
/// The family half may carry comma-separated aliases. Blank lines and lines
/// without the `|` separator are skipped.
pub fn parse_fc_list(out: &str) -> Vec<InstalledFont> {
    let mut fonts = Vec::new();

    for line in out.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((families, file)) = line.split_once('|') else {
            continue;
        };

        let families: Vec<String> = families
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if families.is_empty() {
            continue;
        }

        fonts.push(InstalledFont {
            families,
            path: PathBuf::from(file.trim()),
        });
    }

    fonts
}

#[cfg(feature = "fontations")]
pub use font_dirs::FontDirEnumeration;

#[cfg(feature = "fontations")]
mod font_dirs {
    use std::env;
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{anyhow, Result};
    use rayon::prelude::*;
    use read_fonts::tables::name::NameId;
    use read_fonts::{FontRef, TableProvider};
    use tracing::debug;
    use walkdir::WalkDir;

    use super::{FontEnumeration, InstalledFont};

    /// Filesystem enumeration: walk font directories and read family names
    /// out of each font's name table. No fontconfig required.
    #[derive(Debug, Clone)]
    pub struct FontDirEnumeration {
        roots: Vec<PathBuf>,
        follow_symlinks: bool,
    }

    impl FontDirEnumeration {
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

        /// Enumerate the platform's system font directories, honoring the
        /// `ASSFC_FONT_DIRS` override.
        pub fn system() -> Result<Self> {
            Ok(Self::new(system_font_roots()?))
        }

        pub fn follow_symlinks(mut self, follow: bool) -> Self {
            self.follow_symlinks = follow;
            self
        }
    }

    impl FontEnumeration for FontDirEnumeration {
        fn enumerate(&self) -> Result<Vec<InstalledFont>> {
            let mut candidates = Vec::new();

            for root in &self.roots {
                if !root.exists() {
                    return Err(anyhow!("font root does not exist: {}", root.display()));
                }

                for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                    let entry = entry?;
                    if entry.file_type().is_file() && is_font(entry.path()) {
                        candidates.push(entry.path().to_path_buf());
                    }
                }
            }

            Ok(candidates
                .par_iter()
                .filter_map(|path| match family_names(path) {
                    Ok(families) if !families.is_empty() => Some(InstalledFont {
                        families,
                        path: path.clone(),
                    }),
                    Ok(_) => None,
                    Err(err) => {
                        debug!(path = %path.display(), %err, "skipping unreadable font file");
                        None
                    }
                })
                .collect())
        }
    }

    fn is_font(path: &Path) -> bool {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => return false,
        };

        matches!(ext.as_str(), "ttf" | "otf" | "ttc" | "otc")
    }

    /// Family and typographic-family entries from every face in the file.
    fn family_names(path: &Path) -> Result<Vec<String>> {
        let data = fs::read(path)?;
        let mut names = Vec::new();

        for font in FontRef::fonts(&data) {
            let font = font?;
            let Ok(name_table) = font.name() else {
                continue;
            };
            let strings = name_table.string_data();

            for record in name_table.name_record() {
                if !record.is_unicode() {
                    continue;
                }
                let id = record.name_id();
                if id != NameId::FAMILY_NAME && id != NameId::TYPOGRAPHIC_FAMILY_NAME {
                    continue;
                }
                if let Ok(entry) = record.string(strings) {
                    let rendered = entry.to_string();
                    let trimmed = rendered.trim();
                    if !trimmed.is_empty() {
                        names.push(trimmed.to_string());
                    }
                }
            }
        }

        names.sort_unstable();
        names.dedup();
        Ok(names)
    }

    fn system_font_roots() -> Result<Vec<PathBuf>> {
        if let Ok(raw) = env::var("ASSFC_FONT_DIRS") {
            let mut overrides: Vec<PathBuf> = raw
                .split([':', ';'])
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .filter(|p| p.exists())
                .collect();

            overrides.sort();
            overrides.dedup();

            return if overrides.is_empty() {
                Err(anyhow!("ASSFC_FONT_DIRS is set but no paths exist"))
            } else {
                Ok(overrides)
            };
        }

        let mut candidates: Vec<PathBuf> = Vec::new();

        #[cfg(target_os = "macos")]
        {
            candidates.push(PathBuf::from("/System/Library/Fonts"));
            candidates.push(PathBuf::from("/Library/Fonts"));
            if let Some(home) = env::var_os("HOME") {
                candidates.push(PathBuf::from(home).join("Library/Fonts"));
            }
        }

        #[cfg(target_os = "linux")]
        {
            candidates.push(PathBuf::from("/usr/share/fonts"));
            candidates.push(PathBuf::from("/usr/local/share/fonts"));
            if let Some(home) = env::var_os("HOME") {
                candidates.push(PathBuf::from(home).join(".local/share/fonts"));
            }
        }

        #[cfg(target_os = "windows")]
        {
            if let Some(system_root) = env::var_os("SYSTEMROOT") {
                candidates.push(PathBuf::from(system_root).join("Fonts"));
            }
            if let Some(local_appdata) = env::var_os("LOCALAPPDATA") {
                candidates.push(PathBuf::from(local_appdata).join("Microsoft/Windows/Fonts"));
            }
        }

        candidates.retain(|p| p.exists());
        candidates.sort();
        candidates.dedup();

        if candidates.is_empty() {
            return Err(anyhow!(
                "no system font directories found for this platform"
            ));
        }

        Ok(candidates)
    }
}
