//! Scan orchestration and the derived dependency views.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enumerate::FontEnumeration;
use crate::extract::extract_fonts;
use crate::facade::QueryFacade;
use crate::index::FontIndex;

/// Installed-or-missing verdict for one family. Recomputed on demand from
/// the owned [`FontIndex`], so an index rebuild shows up without rescanning
/// subtitle files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStatus {
    Installed,
    Missing,
}

/// One file's scan result. `readable` distinguishes "no fonts referenced"
/// from "the file could not be read".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub fonts: BTreeSet<String>,
    pub readable: bool,
}

/// Tracks subtitle files and owns the derived state of the latest scan.
///
/// Fonts are keyed by their literal extracted spelling in both derived
/// views; normalization happens only when checking a family against the
/// installed-font index. Writers (`scan`, `rebuild_font_index`) take `&mut
/// self` and readers take `&self`, so the single-writer/multi-reader rule
/// for the shared maps is enforced statically.
#[derive(Debug)]
pub struct DependencyRegistry {
    files: Vec<PathBuf>,
    per_file: HashMap<PathBuf, ScanEntry>,
    font_to_files: HashMap<String, BTreeSet<String>>,
    index: FontIndex,
}

impl DependencyRegistry {
    pub fn new(index: FontIndex) -> Self {
        Self {
            files: Vec::new(),
            per_file: HashMap::new(),
            font_to_files: HashMap::new(),
            index,
        }
    }

    /// Track a subtitle file. Duplicates are ignored; insertion order is
    /// kept. Returns whether the file was newly added.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.files.contains(&path) {
            return false;
        }
        self.files.push(path);
        true
    }

    pub fn add_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.add_file(path);
        }
    }

    /// Stop tracking a file. The derived views keep their previous contents
    /// until the next [`scan`](Self::scan).
    pub fn remove_file(&mut self, path: &Path) -> bool {
        let before = self.files.len();
        self.files.retain(|p| p != path);
        self.files.len() != before
    }

    /// Drop every tracked file and both derived views.
    pub fn clear(&mut self) {
        self.files.clear();
        self.per_file.clear();
        self.font_to_files.clear();
    }

    /// Tracked files, in insertion order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Re-derive both views from the current file set and current file
    /// contents.
    ///
    /// Each file is read and extracted independently on the rayon pool; the
    /// merge into the shared maps is a single serial fold, so the file→fonts
    /// and font→files views always agree. An unreadable file gets an empty,
    /// `readable: false` entry and the rest of the scan continues. Previous
    /// contents are replaced wholesale, making repeated scans idempotent.
    pub fn scan(&mut self) {
        let results: Vec<(PathBuf, ScanEntry)> = self
            .files
            .par_iter()
            .map(|path| (path.clone(), scan_file(path)))
            .collect();

        self.per_file.clear();
        self.font_to_files.clear();
        for (path, entry) in results {
            for font in &entry.fonts {
                self.font_to_files
                    .entry(font.clone())
                    .or_default()
                    .insert(display_name(&path));
            }
            self.per_file.insert(path, entry);
        }
    }

    /// Replace the owned font index from a fresh enumeration. Subsequent
    /// [`status_of`](Self::status_of) calls reflect the change immediately;
    /// no rescan of subtitle files is needed.
    pub fn rebuild_font_index(&mut self, source: &dyn FontEnumeration) {
        self.index = FontIndex::build(source);
    }

    pub fn status_of(&self, font: &str) -> FontStatus {
        if self.index.is_installed(font) {
            FontStatus::Installed
        } else {
            FontStatus::Missing
        }
    }

    pub fn font_index(&self) -> &FontIndex {
        &self.index
    }

    /// Latest scan results, keyed by tracked file path.
    pub fn per_file(&self) -> &HashMap<PathBuf, ScanEntry> {
        &self.per_file
    }

    /// Inverted view: literal family name → base names of files using it.
    pub fn font_to_files(&self) -> &HashMap<String, BTreeSet<String>> {
        &self.font_to_files
    }

    /// Read-only accessors for the presentation layer.
    pub fn queries(&self) -> QueryFacade<'_> {
        QueryFacade::new(self)
    }
}

fn scan_file(path: &Path) -> ScanEntry {
    match fs::read(path) {
        Ok(bytes) => ScanEntry {
            fonts: extract_fonts(&String::from_utf8_lossy(&bytes)),
            readable: true,
        },
        Err(err) => {
            debug!(path = %path.display(), %err, "subtitle file unreadable, recording empty font set");
            ScanEntry {
                fonts: BTreeSet::new(),
                readable: false,
            }
        }
    }
}

/// Files are shown by base name in the font→files view.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
