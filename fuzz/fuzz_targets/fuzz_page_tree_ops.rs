#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use gridpage_core::{CellExtent, CellPoint, ViewContext};
use gridpage_layout::{GridContext, ItemType, LayoutRules, PageTree};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    AddSection,
    DeleteSection { section: u8 },
    SetHeight { section: u8, rows: u16 },
    AddItem { section: u8, kind: u8, col: i16, row: i16, mobile: bool },
    Move { section: u8, item: u8, col: i16, row: i16, mobile: bool },
    Resize { section: u8, item: u8, col: i16, row: i16, width: i16, height: i16, mobile: bool },
    Delete { section: u8, item: u8 },
}

fn grid(rules: &LayoutRules, mobile: bool) -> GridContext {
    let context = if mobile { ViewContext::Mobile } else { ViewContext::Desktop };
    GridContext::new(context, rules.grid.columns_for(context))
}

fuzz_target!(|ops: Vec<Op>| {
    let rules = Arc::new(LayoutRules::default());
    let mut tree = PageTree::new(Arc::clone(&rules));

    for op in ops.into_iter().take(64) {
        let sections = tree.sections().to_vec();
        let pick = |i: u8| sections.get(usize::from(i) % sections.len().max(1)).cloned();
        match op {
            Op::AddSection => tree = tree.add_section(),
            Op::DeleteSection { section } => {
                if let Some(s) = pick(section) {
                    tree = tree.delete_section(&s.id);
                }
            }
            Op::SetHeight { section, rows } => {
                if let Some(s) = pick(section) {
                    tree = tree.set_section_height(&s.id, u32::from(rows));
                    let height = tree.section(&s.id).expect("section kept").height;
                    assert!(height >= rules.grid.min_section_rows);
                }
            }
            Op::AddItem { section, kind, col, row, mobile } => {
                if let Some(s) = pick(section) {
                    let item_type = ItemType::ALL[usize::from(kind) % ItemType::ALL.len()];
                    let cell = CellPoint::new(i64::from(col), i64::from(row));
                    tree = tree.add_item(&s.id, item_type, cell, grid(&rules, mobile));
                }
            }
            Op::Move { section, item, col, row, mobile } => {
                if let Some(s) = pick(section) {
                    let Some(i) = s.items.get(usize::from(item) % s.items.len().max(1)) else {
                        continue;
                    };
                    let g = grid(&rules, mobile);
                    let cell = CellPoint::new(i64::from(col), i64::from(row));
                    tree = tree.update_item_placement(&s.id, &i.id, cell, g);
                    let stored = tree.item(&s.id, &i.id).expect("item kept");
                    assert!(stored.style.get(g.context).rect().fits(g.columns, s.height));
                }
            }
            Op::Resize { section, item, col, row, width, height, mobile } => {
                if let Some(s) = pick(section) {
                    let Some(i) = s.items.get(usize::from(item) % s.items.len().max(1)) else {
                        continue;
                    };
                    let g = grid(&rules, mobile);
                    let cell = CellPoint::new(i64::from(col), i64::from(row));
                    let extent = CellExtent::new(i64::from(width), i64::from(height));
                    tree = tree.update_item_extent(&s.id, &i.id, cell, extent, g);
                    let stored = tree.item(&s.id, &i.id).expect("item kept");
                    assert!(stored.style.get(g.context).rect().fits(g.columns, s.height));
                }
            }
            Op::Delete { section, item } => {
                if let Some(s) = pick(section) {
                    if let Some(i) = s.items.get(usize::from(item) % s.items.len().max(1)) {
                        tree = tree.delete_item(&s.id, &i.id);
                    }
                }
            }
        }
        tree.page().validate().expect("ids stay unique");
    }
});
