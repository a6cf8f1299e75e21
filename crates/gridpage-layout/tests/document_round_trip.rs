//! Load → mutate → save must reproduce every field that was not
//! intentionally changed.

use std::sync::Arc;

use gridpage_core::{CellExtent, CellPoint, ViewContext};
use gridpage_layout::{
    FilePageStore, GridContext, ItemId, LayoutRules, Page, PageStore, PageTree, SectionId,
    Timestamp,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const FIXTURE: &str = include_str!("fixtures/page.json");
const DESKTOP: GridContext = GridContext::new(ViewContext::Desktop, 24);
const MOBILE: GridContext = GridContext::new(ViewContext::Mobile, 12);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn fixture_value() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

fn load() -> PageTree {
    let (tree, repairs) = PageTree::load_json(FIXTURE, Arc::new(LayoutRules::default())).unwrap();
    assert!(repairs.is_empty());
    tree
}

fn to_value(page: &Page) -> Value {
    serde_json::from_str(&page.to_json_string().unwrap()).unwrap()
}

#[test]
fn unchanged_page_round_trips_exactly() {
    init_tracing();
    let tree = load();
    assert_eq!(to_value(tree.page()), fixture_value());
}

#[test]
fn pretty_output_decodes_to_the_same_page() {
    let tree = load();
    let pretty = tree.page().to_json_string_pretty().unwrap();
    assert_eq!(&Page::from_json_str(&pretty).unwrap(), tree.page());
}

#[test]
fn placement_change_touches_only_that_position() {
    init_tracing();
    let tree = load();
    let hero = SectionId::new("hero");
    let cta = ItemId::new("cta");

    let moved = tree.update_item_placement(&hero, &cta, CellPoint::new(12, 9), DESKTOP);

    let mut expected = fixture_value();
    expected["sections"][0]["items"][1]["style"]["desktop"]["position"] = json!({ "x": 12, "y": 9 });
    assert_eq!(to_value(moved.page()), expected);
}

#[test]
fn extent_change_keeps_visual_props_and_mobile_style() {
    let tree = load();
    let hero = SectionId::new("hero");
    let hero_box = ItemId::new("hero-box");

    let resized = tree.update_item_extent(
        &hero,
        &hero_box,
        CellPoint::new(20, 1),
        CellExtent::new(10, 6),
        DESKTOP,
    );

    let mut expected = fixture_value();
    let desktop = &mut expected["sections"][0]["items"][0]["style"]["desktop"];
    desktop["position"] = json!({ "x": 20, "y": 1 });
    desktop["width"] = json!(4);
    assert_eq!(to_value(resized.page()), expected);
}

#[test]
fn mobile_edit_leaves_desktop_alone() {
    let tree = load();
    let footer = SectionId::new("footer");
    let legal = ItemId::new("legal");

    let moved = tree.update_item_placement(&footer, &legal, CellPoint::new(11, 11), MOBILE);

    let mut expected = fixture_value();
    expected["sections"][1]["items"][0]["style"]["mobile"]["position"] = json!({ "x": 10, "y": 11 });
    assert_eq!(to_value(moved.page()), expected);
}

#[test]
fn save_stamps_updated_at_only() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut store = FilePageStore::new(dir.path().join("gridPage.json"));
    let tree = load();

    let stamp = Timestamp::new_unchecked("2024-06-01T00:00:00.000Z");
    store.save(&tree.saved_at(stamp)).unwrap();

    let reloaded = store.load().unwrap().unwrap();
    let mut expected = fixture_value();
    expected["updatedAt"] = json!("2024-06-01T00:00:00.000Z");
    assert_eq!(to_value(&reloaded), expected);
}

#[test]
fn new_items_get_ids_that_do_not_collide_with_loaded_ones() {
    let tree = load();
    let hero = SectionId::new("hero");
    let next = tree
        .add_item(&hero, gridpage_layout::ItemType::Text, CellPoint::new(0, 20), DESKTOP)
        .add_section();
    next.page().validate().unwrap();
    assert_eq!(next.sections().len(), 3);
    assert_eq!(next.sections()[0].items.len(), 3);
}
