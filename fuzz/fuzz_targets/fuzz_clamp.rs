#![no_main]

use gridpage_core::{CellExtent, CellPoint, clamp_placement, clamp_to_grid};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (i64, i64, i64, i64, u8, u8)| {
    let (col, row, width, height, cols, rows) = input;
    // 1..=256 columns and rows.
    let cols = u32::from(cols) + 1;
    let rows = u32::from(rows) + 1;
    let origin = CellPoint::new(col, row);
    let extent = CellExtent::new(width, height);

    let rect = clamp_to_grid(origin, extent, cols, rows);
    assert!(rect.fits(cols, rows), "clamp_to_grid escaped the grid: {rect:?}");
    assert!(rect.width >= 1 && rect.height >= 1, "empty extent: {rect:?}");
    assert_eq!(
        clamp_to_grid(rect.origin(), rect.extent(), cols, rows),
        rect,
        "clamp_to_grid is not idempotent"
    );

    let placed = clamp_placement(origin, extent, cols, rows);
    assert!(placed.fits(cols, rows), "clamp_placement escaped the grid: {placed:?}");
    if (1..=i64::from(cols)).contains(&width) && (1..=i64::from(rows)).contains(&height) {
        assert_eq!(placed.extent(), extent, "fitting extent was changed");
    }
});
