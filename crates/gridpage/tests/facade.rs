//! Facade setup helpers end to end.

use std::io::Write;

use gridpage::prelude::*;
use gridpage::{FilePageStore, MemoryPageStore, load_rules, open_editor};
use pretty_assertions::assert_eq;

#[test]
fn rules_from_files_override_the_builtin_table() {
    let mut grid = tempfile::NamedTempFile::new().unwrap();
    writeln!(grid, "{}", GridConfig::default().to_toml_string().unwrap()).unwrap();
    let mut defaults = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        defaults,
        "[text]\ndesktop = {{ width = 8, height = 3 }}\nmobile = {{ width = 6, height = 3 }}"
    )
    .unwrap();

    let rules = load_rules(Some(grid.path()), Some(defaults.path())).unwrap();
    assert_eq!(rules.grid, GridConfig::default());
    assert_eq!(
        rules.defaults.extent(ItemType::Text, ViewContext::Desktop),
        Some(gridpage::CellExtent::new(8, 3))
    );
}

#[test]
fn missing_config_file_is_a_config_error() {
    let err = load_rules(Some(std::path::Path::new("/nonexistent/grid.toml")), None).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn empty_store_opens_a_fresh_page() {
    let (editor, repairs) = open_editor(LayoutRules::default(), &MemoryPageStore::new()).unwrap();
    assert_eq!(repairs, None);
    assert_eq!(editor.tree().sections().len(), 1);
}

#[test]
fn saved_page_reopens_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FilePageStore::new(dir.path().join("page.json"));

    let mut editor = Editor::default();
    editor.on_viewport_width(1280.0);
    editor.on_cell_measured(Some(40.0));
    editor.palette_click(ItemType::Box);
    editor.save_to(&mut store).unwrap();

    let (reopened, repairs) = open_editor(LayoutRules::default(), &store).unwrap();
    assert_eq!(repairs, Some(Vec::new()));
    assert_eq!(reopened.tree().page(), editor.tree().page());
}

#[test]
fn corrupt_document_is_a_store_error() {
    let err = open_editor(LayoutRules::default(), &MemoryPageStore::with_raw("{ nope")).unwrap_err();
    assert!(matches!(err, Error::Store(gridpage::StoreError::Document(_))));
    assert!(err.to_string().contains("document"));
}
