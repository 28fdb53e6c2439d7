//! Summary strategy: precomputed one-row-per-affiliate totals
//!
//! This sheet is generated by a formula block at fixed positions, so it is
//! addressed by column constants through [`Sheet::cell`] instead of the
//! header resolver. That direct access is the one sanctioned exception to
//! synonym-based column mapping.

use crate::reader::Sheet;
use crate::record::{CouponRecord, CylinderCounts, MONTHLY_COUPON_CAP};
use crate::rut;

// Columns C..N of the precomputed sheet
const RUT_COL: u32 = 2;
const NOMBRES_COL: u32 = 3;
const APELLIDOS_COL: u32 = 4;
const LIPIGAS_COLS: [u32; 4] = [5, 6, 7, 8];
const ABASTIBLE_COLS: [u32; 4] = [9, 10, 11, 12];
const USADO_COL: u32 = 13;

pub(super) fn search(sheet: &Sheet, rut: &str) -> Option<CouponRecord> {
    // One row per affiliate: the first match is the only match
    let row = (0..sheet.row_count()).find(|&row| {
        sheet
            .cell(row, RUT_COL)
            .is_some_and(|cell| rut::normalize(cell.as_text().trim()) == rut)
    })?;

    let usado = cell_number(sheet, row, USADO_COL);

    Some(CouponRecord {
        rut: rut.to_string(),
        nombres: cell_text(sheet, row, NOMBRES_COL),
        apellidos: cell_text(sheet, row, APELLIDOS_COL),
        establecimiento: String::new(),
        lipigas: counts(sheet, row, LIPIGAS_COLS),
        abastible: counts(sheet, row, ABASTIBLE_COLS),
        compras: Default::default(),
        usado_en_el_mes: usado,
        // This sheet encodes the fixed cap rather than an explicit cell
        disponible: (MONTHLY_COUPON_CAP - usado).max(0.0),
    })
}

fn counts(sheet: &Sheet, row: u32, cols: [u32; 4]) -> CylinderCounts {
    CylinderCounts {
        kg5: cell_number(sheet, row, cols[0]),
        kg11: cell_number(sheet, row, cols[1]),
        kg15: cell_number(sheet, row, cols[2]),
        kg45: cell_number(sheet, row, cols[3]),
    }
}

fn cell_number(sheet: &Sheet, row: u32, col: u32) -> f64 {
    sheet
        .cell(row, col)
        .map_or(0.0, crate::reader::CellValue::as_number)
}

fn cell_text(sheet: &Sheet, row: u32, col: u32) -> String {
    sheet
        .cell(row, col)
        .map(crate::reader::CellValue::as_text)
        .unwrap_or_default()
}
