use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tempfile::tempdir;

use assfc_core::enumerate::{FontEnumeration, InstalledFont};
use assfc_core::index::FontIndex;
use assfc_core::registry::{DependencyRegistry, FontStatus};

struct FixedEnumeration(Vec<InstalledFont>);

impl FontEnumeration for FixedEnumeration {
    fn enumerate(&self) -> Result<Vec<InstalledFont>> {
        Ok(self.0.clone())
    }
}

struct FailingEnumeration;

impl FontEnumeration for FailingEnumeration {
    fn enumerate(&self) -> Result<Vec<InstalledFont>> {
        Err(anyhow!("enumeration tool unavailable"))
    }
}

fn write_subtitle(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write subtitle");
    path
}

fn styles_doc(font: &str) -> String {
    format!("[V4+ Styles]\nFormat: Name, Fontname, Fontsize\nStyle: Default,{font},20\n")
}

/// The file→fonts and font→files views must agree in both directions.
fn assert_views_consistent(registry: &DependencyRegistry) {
    for (file, entry) in registry.per_file() {
        let base = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        for font in &entry.fonts {
            let files = registry
                .font_to_files()
                .get(font)
                .unwrap_or_else(|| panic!("font {font:?} missing from inverted view"));
            assert!(files.contains(&base), "{base} missing under {font:?}");
        }
    }

    for (font, files) in registry.font_to_files() {
        for base in files {
            let found = registry.per_file().iter().any(|(file, entry)| {
                file.file_name().map(|n| n.to_string_lossy() == base.as_str()).unwrap_or(false)
                    && entry.fonts.contains(font)
            });
            assert!(found, "no scanned file {base} references {font:?}");
        }
    }
}

#[test]
fn scan_builds_both_views_consistently() {
    let tmp = tempdir().expect("tempdir");
    let a = write_subtitle(tmp.path(), "a.ass", &styles_doc("Arial"));
    let b = write_subtitle(
        tmp.path(),
        "b.ass",
        "[V4+ Styles]\nFormat: Name, Fontname\nStyle: X,Arial\nStyle: Y,Lato\n",
    );

    let mut registry = DependencyRegistry::new(FontIndex::empty());
    registry.add_files([&a, &b]);
    registry.scan();

    assert_views_consistent(&registry);
    assert_eq!(registry.per_file().len(), 2);

    let arial_users = &registry.font_to_files()["Arial"];
    assert!(arial_users.contains("a.ass"));
    assert!(arial_users.contains("b.ass"));
    assert_eq!(registry.font_to_files()["Lato"].len(), 1);
}

#[test]
fn unreadable_file_gets_empty_entry_and_scan_continues() {
    let tmp = tempdir().expect("tempdir");
    let good = write_subtitle(tmp.path(), "good.ass", &styles_doc("Verdana"));
    let missing = tmp.path().join("missing.ass");

    let mut registry = DependencyRegistry::new(FontIndex::empty());
    registry.add_files([&good, &missing]);
    registry.scan();

    let entry = &registry.per_file()[&missing];
    assert!(!entry.readable);
    assert!(entry.fonts.is_empty());

    let good_entry = &registry.per_file()[&good];
    assert!(good_entry.readable);
    assert!(good_entry.fonts.contains("Verdana"));
    assert_views_consistent(&registry);
}

#[test]
fn invalid_utf8_is_replaced_not_fatal() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("latin2.ass");
    let mut bytes = b"[V4+ Styles]\nFormat: Name, Fontname\nStyle: Default,Impact\nStyle: X,\xb3Broken".to_vec();
    bytes.extend_from_slice(b"\n");
    fs::write(&path, bytes).expect("write subtitle");

    let mut registry = DependencyRegistry::new(FontIndex::empty());
    registry.add_file(&path);
    registry.scan();

    let entry = &registry.per_file()[&path];
    assert!(entry.readable);
    assert!(entry.fonts.contains("Impact"));
}

#[test]
fn add_then_remove_then_scan_leaves_no_trace() {
    let tmp = tempdir().expect("tempdir");
    let keep = write_subtitle(tmp.path(), "keep.ass", &styles_doc("Lato"));
    let dropped = write_subtitle(tmp.path(), "drop.ass", &styles_doc("Impact"));

    let mut registry = DependencyRegistry::new(FontIndex::empty());
    registry.add_files([&keep, &dropped]);
    assert!(registry.remove_file(&dropped));
    registry.scan();

    assert!(!registry.per_file().contains_key(&dropped));
    assert!(!registry.font_to_files().contains_key("Impact"));
    assert!(registry.font_to_files().contains_key("Lato"));
    assert_views_consistent(&registry);
}

#[test]
fn duplicate_adds_are_ignored() {
    let mut registry = DependencyRegistry::new(FontIndex::empty());
    assert!(registry.add_file("/subs/ep.ass"));
    assert!(!registry.add_file("/subs/ep.ass"));
    assert_eq!(registry.files().len(), 1);
}

#[test]
fn clear_drops_files_and_views() {
    let tmp = tempdir().expect("tempdir");
    let path = write_subtitle(tmp.path(), "ep.ass", &styles_doc("Arial"));

    let mut registry = DependencyRegistry::new(FontIndex::empty());
    registry.add_file(&path);
    registry.scan();
    registry.clear();

    assert!(registry.files().is_empty());
    assert!(registry.per_file().is_empty());
    assert!(registry.font_to_files().is_empty());
}

#[test]
fn rescan_reflects_file_edits() {
    let tmp = tempdir().expect("tempdir");
    let path = write_subtitle(tmp.path(), "ep.ass", &styles_doc("Old Font"));

    let mut registry = DependencyRegistry::new(FontIndex::empty());
    registry.add_file(&path);
    registry.scan();
    assert!(registry.font_to_files().contains_key("Old Font"));

    write_subtitle(tmp.path(), "ep.ass", &styles_doc("New Font"));
    registry.scan();

    assert!(!registry.font_to_files().contains_key("Old Font"));
    assert!(registry.font_to_files().contains_key("New Font"));
    assert_views_consistent(&registry);
}

#[test]
fn scan_of_empty_file_set_is_fine() {
    let mut registry = DependencyRegistry::new(FontIndex::empty());
    registry.scan();

    assert!(registry.per_file().is_empty());
    assert!(registry.font_to_files().is_empty());
}

#[test]
fn index_rebuild_updates_status_without_rescan() {
    let tmp = tempdir().expect("tempdir");
    let path = write_subtitle(tmp.path(), "ep.ass", &styles_doc("Fira Sans"));

    let mut registry = DependencyRegistry::new(FontIndex::build(&FailingEnumeration));
    registry.add_file(&path);
    registry.scan();

    assert!(registry.font_index().is_degraded());
    assert_eq!(registry.status_of("Fira Sans"), FontStatus::Missing);

    registry.rebuild_font_index(&FixedEnumeration(vec![InstalledFont {
        families: vec!["Fira Sans".to_string()],
        path: PathBuf::from("/fonts/FiraSans.ttf"),
    }]));

    assert_eq!(registry.status_of("Fira Sans"), FontStatus::Installed);
    assert_eq!(registry.status_of("fira  sans"), FontStatus::Installed);
    assert_eq!(registry.status_of("Fira Sans Condensed"), FontStatus::Missing);
}
