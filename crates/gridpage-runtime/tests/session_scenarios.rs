//! End-to-end editor scenarios and session invariants.

use gridpage_core::{GridRect, PixelPoint, ViewContext};
use gridpage_layout::ItemType;
use gridpage_runtime::{
    Editor, ItemGestureEffect, ItemGestureEvent, NoopReason, PaletteDragEffect, PaletteDragEvent,
    ResizeHandle, SectionResizeEffect, SectionResizeEvent,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// 24 columns, 40 x 25 cells, 8px gap.
fn desktop_editor() -> Editor {
    let mut editor = Editor::default();
    editor.on_viewport_width(1280.0);
    editor.on_cell_measured(Some(40.0));
    editor
}

#[test]
fn scenario_a_drop_box_at_cell_5_3() {
    init_tracing();
    let mut editor = desktop_editor();
    let section = editor.tree().sections()[0].id.clone();
    // Inside cell (5, 3): 5 * 48 + 10, 3 * 33 + 5
    let position = PixelPoint::new(250.0, 104.0);

    editor.apply_palette_event(&PaletteDragEvent::Start {
        item_type: ItemType::Box,
    });
    let over = editor.apply_palette_event(&PaletteDragEvent::Over {
        section: section.clone(),
        position,
    });
    assert!(matches!(
        over.effect,
        PaletteDragEffect::PreviewUpdated { preview, .. } if preview == GridRect::new(5, 3, 2, 2)
    ));
    let drop = editor.apply_palette_event(&PaletteDragEvent::Drop {
        section: section.clone(),
        position,
    });
    assert!(matches!(drop.effect, PaletteDragEffect::Committed { .. }));

    let item = &editor.tree().sections()[0].items[0];
    assert_eq!(item.item_type, Some(ItemType::Box));
    assert_eq!(item.style.desktop.rect(), GridRect::new(5, 3, 2, 2));
    assert_eq!(item.style.mobile.rect(), GridRect::new(5, 3, 2, 2));
    assert_eq!(item.children.as_deref(), Some(&[][..]));
}

#[test]
fn drag_crossing_one_section_drops_into_the_next() {
    init_tracing();
    let mut editor = desktop_editor();
    editor.edit(|tree| tree.add_section());
    let a = editor.tree().sections()[0].id.clone();
    let b = editor.tree().sections()[1].id.clone();
    let position = PixelPoint::new(250.0, 104.0);

    editor.apply_palette_event(&PaletteDragEvent::Start {
        item_type: ItemType::Box,
    });
    editor.apply_palette_event(&PaletteDragEvent::Over {
        section: a.clone(),
        position,
    });
    let leave = editor.apply_palette_event(&PaletteDragEvent::Leave { section: a.clone() });
    assert_eq!(leave.effect, PaletteDragEffect::PreviewCleared { section: a });
    assert_eq!(editor.visibility().visible_section(), None);

    let over = editor.apply_palette_event(&PaletteDragEvent::Over {
        section: b.clone(),
        position,
    });
    assert!(matches!(over.effect, PaletteDragEffect::PreviewUpdated { .. }));
    assert_eq!(editor.visibility().visible_section(), Some(&b));
    let drop = editor.apply_palette_event(&PaletteDragEvent::Drop {
        section: b.clone(),
        position,
    });
    assert!(matches!(drop.effect, PaletteDragEffect::Committed { .. }));

    assert!(editor.tree().sections()[0].items.is_empty());
    let items = &editor.tree().sections()[1].items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].style.desktop.rect(), GridRect::new(5, 3, 2, 2));
    assert!(!editor.palette().is_active());
}

#[test]
fn scenario_c_section_resize_floor() {
    let mut editor = desktop_editor();
    let section = editor.tree().sections()[0].id.clone();
    assert_eq!(editor.tree().section(&section).unwrap().height, 24);
    editor.apply_section_resize_event(&SectionResizeEvent::Start {
        section: section.clone(),
        pointer_y: 600.0,
    });
    let t = editor.apply_section_resize_event(&SectionResizeEvent::Move {
        pointer_y: 600.0 - 15.0 * 33.0,
    });
    assert_eq!(
        t.effect,
        SectionResizeEffect::HeightCommitted {
            section: section.clone(),
            height: 12
        }
    );
    assert_eq!(editor.tree().section(&section).unwrap().height, 12);
}

#[test]
fn nothing_happens_before_the_grid_is_measured() {
    let mut editor = Editor::default();
    let section = editor.tree().sections()[0].id.clone();
    editor.apply_palette_event(&PaletteDragEvent::Start {
        item_type: ItemType::Box,
    });
    let t = editor.apply_palette_event(&PaletteDragEvent::Over {
        section: section.clone(),
        position: PixelPoint::new(10.0, 10.0),
    });
    assert_eq!(
        t.effect,
        PaletteDragEffect::Noop {
            reason: NoopReason::MetricsNotReady
        }
    );
    assert_eq!(editor.visibility().visible_section(), None);
    let t = editor.apply_section_resize_event(&SectionResizeEvent::Start {
        section,
        pointer_y: 0.0,
    });
    assert_eq!(
        t.effect,
        SectionResizeEffect::Noop {
            reason: NoopReason::MetricsNotReady
        }
    );
}

#[test]
fn resizing_another_section_while_dragging_touches_disjoint_subtrees() {
    let mut editor = desktop_editor();
    editor.edit(|t| t.add_section());
    let a = editor.tree().sections()[0].id.clone();
    let b = editor.tree().sections()[1].id.clone();

    editor.apply_palette_event(&PaletteDragEvent::Start {
        item_type: ItemType::Text,
    });
    editor.apply_palette_event(&PaletteDragEvent::Over {
        section: b.clone(),
        position: PixelPoint::new(0.0, 0.0),
    });
    editor.apply_section_resize_event(&SectionResizeEvent::Start {
        section: a.clone(),
        pointer_y: 0.0,
    });
    editor.apply_section_resize_event(&SectionResizeEvent::Move { pointer_y: 330.0 });
    editor.apply_palette_event(&PaletteDragEvent::Drop {
        section: b.clone(),
        position: PixelPoint::new(0.0, 0.0),
    });
    editor.apply_section_resize_event(&SectionResizeEvent::End);

    assert_eq!(editor.tree().section(&a).unwrap().height, 34);
    assert!(editor.tree().section(&a).unwrap().items.is_empty());
    assert_eq!(editor.tree().section(&b).unwrap().items.len(), 1);
}

#[test]
fn transitions_serialize_with_tagged_effects() {
    let mut editor = desktop_editor();
    let t = editor.apply_palette_event(&PaletteDragEvent::Start {
        item_type: ItemType::InputField,
    });
    let value = serde_json::to_value(&t).unwrap();
    assert_eq!(value["effect"]["effect"], "started");
    assert_eq!(value["effect"]["item_type"], "input_field");
    assert_eq!(value["to"]["state"], "dragging");
}

fn arb_event() -> impl Strategy<Value = ItemGestureEvent> {
    let position = (-2000.0f64..4000.0, -2000.0f64..4000.0).prop_map(|(x, y)| PixelPoint::new(x, y));
    prop_oneof![
        position.clone().prop_map(|position| ItemGestureEvent::PointerMove { position }),
        position.prop_map(|position| ItemGestureEvent::PointerUp { position }),
        Just(ItemGestureEvent::PointerCancel),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gesture_previews_and_commits_always_fit(
        handle in proptest::option::of(proptest::sample::select(ResizeHandle::ALL.to_vec())),
        start_col in 0i64..24,
        start_row in 0i64..24,
        down in (0.0f64..1200.0, 0.0f64..800.0),
        events in proptest::collection::vec(arb_event(), 1..20),
    ) {
        let mut editor = desktop_editor();
        let section = editor.tree().sections()[0].id.clone();
        let grid = editor.grid().grid_context();
        editor.edit(|t| t.add_item(&section, ItemType::Button, gridpage_core::CellPoint::new(start_col, start_row), grid));
        let item = editor.tree().sections()[0].items[0].id.clone();

        editor.apply_item_gesture_event(&ItemGestureEvent::PointerDown {
            section: section.clone(),
            item: item.clone(),
            handle,
            position: PixelPoint::new(down.0, down.1),
        });
        for event in &events {
            let t = editor.apply_item_gesture_event(event);
            if let ItemGestureEffect::PreviewUpdated { preview, .. } = t.effect {
                prop_assert!(preview.fits(24, 24));
            }
            let stored = editor.tree().item(&section, &item).unwrap();
            prop_assert!(stored.style.get(ViewContext::Desktop).rect().fits(24, 24));
            prop_assert!(stored.style.get(ViewContext::Mobile).rect().fits(12, 24));
        }
    }

    #[test]
    fn section_height_never_below_floor(
        start_rows in 12u32..60,
        moves in proptest::collection::vec(-5000.0f64..5000.0, 1..12),
    ) {
        let mut editor = desktop_editor();
        let section = editor.tree().sections()[0].id.clone();
        editor.edit(|t| t.set_section_height(&section, start_rows));
        editor.apply_section_resize_event(&SectionResizeEvent::Start {
            section: section.clone(),
            pointer_y: 0.0,
        });
        for y in moves {
            editor.apply_section_resize_event(&SectionResizeEvent::Move { pointer_y: y });
            prop_assert!(editor.tree().section(&section).unwrap().height >= 12);
        }
    }
}

#[test]
fn floor_holds_for_minus_fifty_rows_from_twelve() {
    let mut editor = desktop_editor();
    let section = editor.tree().sections()[0].id.clone();
    editor.edit(|t| t.set_section_height(&section, 12));
    editor.apply_section_resize_event(&SectionResizeEvent::Start {
        section: section.clone(),
        pointer_y: 0.0,
    });
    editor.apply_section_resize_event(&SectionResizeEvent::Move {
        pointer_y: -50.0 * 33.0,
    });
    assert_eq!(editor.tree().section(&section).unwrap().height, 12);
}
