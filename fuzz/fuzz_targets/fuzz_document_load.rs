#![no_main]

use std::sync::Arc;

use gridpage_layout::{LayoutRules, PageTree};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let rules = Arc::new(LayoutRules::default());
    let Ok((tree, _repairs)) = PageTree::load_json(text, Arc::clone(&rules)) else {
        return;
    };

    // A loaded page always has a section, no short sections, and survives a
    // save/load cycle without further repair.
    assert!(!tree.sections().is_empty());
    for section in tree.sections() {
        assert!(section.height >= rules.grid.min_section_rows);
    }
    let json = tree.page().to_json_string().expect("loaded page must encode");
    let (reloaded, repairs) = PageTree::load_json(&json, rules).expect("encoded page must load");
    assert!(repairs.is_empty(), "second load repaired again: {repairs:?}");
    assert_eq!(reloaded.page(), tree.page());
});
