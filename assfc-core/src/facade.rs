//! Read-only accessors over the latest scan, for presentation layers.

use std::path::Path;

use crate::registry::{DependencyRegistry, FontStatus};

/// Sorted, total views of the registry state.
///
/// Every accessor is a pure read of the latest scan; unknown keys yield
/// empty sequences rather than errors.
#[derive(Debug, Clone, Copy)]
pub struct QueryFacade<'a> {
    registry: &'a DependencyRegistry,
}

impl<'a> QueryFacade<'a> {
    pub(crate) fn new(registry: &'a DependencyRegistry) -> Self {
        Self { registry }
    }

    /// Every referenced family with its installed/missing status, sorted
    /// case-insensitively by name.
    pub fn list_fonts(&self) -> Vec<(String, FontStatus)> {
        let mut fonts: Vec<(String, FontStatus)> = self
            .registry
            .font_to_files()
            .keys()
            .map(|font| (font.clone(), self.registry.status_of(font)))
            .collect();
        fonts.sort_by_key(|(font, _)| font.to_lowercase());
        fonts
    }

    /// Base names of the files that use `font`, sorted lexicographically.
    pub fn files_for(&self, font: &str) -> Vec<String> {
        self.registry
            .font_to_files()
            .get(font)
            .map(|files| files.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Families referenced by `file`, sorted case-insensitively.
    pub fn fonts_for(&self, file: &Path) -> Vec<String> {
        let mut fonts: Vec<String> = self
            .registry
            .per_file()
            .get(file)
            .map(|entry| entry.fonts.iter().cloned().collect())
            .unwrap_or_default();
        fonts.sort_by_key(|font| font.to_lowercase());
        fonts
    }
}
