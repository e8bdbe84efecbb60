//! Normalized family-name index over the host's installed fonts.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use tracing::warn;

use crate::enumerate::FontEnumeration;
use crate::normalize::normalize_family;

/// Mapping from normalized family name to the font files that provide it.
///
/// Built once from an enumeration backend and immutable until rebuilt; a
/// rebuild replaces the contents wholesale so uninstalled fonts cannot
/// linger. Enumeration failure is not an error here: the index comes back
/// empty and flagged [`FontIndex::is_degraded`], and every lookup then
/// answers "not installed".
#[derive(Debug, Default)]
pub struct FontIndex {
    families: HashMap<String, BTreeSet<PathBuf>>,
    degraded: bool,
}

impl FontIndex {
    /// Index the backend's inventory; never fails.
    pub fn build(source: &dyn FontEnumeration) -> Self {
        match source.enumerate() {
            Ok(fonts) => {
                let mut families: HashMap<String, BTreeSet<PathBuf>> = HashMap::new();
                for font in fonts {
                    for alias in &font.families {
                        let key = normalize_family(alias);
                        if key.is_empty() {
                            continue;
                        }
                        families.entry(key).or_default().insert(font.path.clone());
                    }
                }
                Self {
                    families,
                    degraded: false,
                }
            }
            Err(err) => {
                warn!(%err, "font enumeration unavailable, every font will report missing");
                Self {
                    families: HashMap::new(),
                    degraded: true,
                }
            }
        }
    }

    /// An index with no fonts at all (distinct from a degraded one).
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when some installed alias normalizes equal to `family`.
    pub fn is_installed(&self, family: &str) -> bool {
        self.families.contains_key(&normalize_family(family))
    }

    /// Files providing the family; empty when it is not installed.
    pub fn locations_of(&self, family: &str) -> BTreeSet<PathBuf> {
        self.families
            .get(&normalize_family(family))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of distinct normalized families.
    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// True when the last build could not reach the enumeration backend.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}
