//! Record location and aggregation across workbook sheets
//!
//! Strategies are tried in a fixed priority order: the transactional ledger
//! first, then the precomputed summary, then the affiliate registry. The
//! first sheet that yields a match wins; a sheet whose expected structure is
//! missing simply yields no match. When every strategy comes up empty the
//! identifier is reported as not found, which is indistinguishable from
//! being genuinely absent.

mod ledger;
mod registry;
mod summary;

use crate::reader::{CellValue, Sheet, Workbook};
use crate::record::CouponRecord;
use tracing::debug;

/// Transactional sheet: one row per coupon redemption event
pub const LEDGER_SHEET: &str = "GENERAL";
/// Precomputed totals: one row per affiliate
pub const SUMMARY_SHEET: &str = "CUPONES DISPONIBLES";
/// Affiliate roster without usage history
pub const REGISTRY_SHEET: &str = "BASE DE DATOS";

/// Look up the coupon record for a normalized identifier
pub fn find_coupons(workbook: &Workbook, rut: &str) -> Option<CouponRecord> {
    if let Some(sheet) = workbook.sheet(LEDGER_SHEET) {
        if let Some(record) = ledger::search(sheet, rut) {
            debug!(sheet = LEDGER_SHEET, "match found");
            return Some(record);
        }
    }

    if let Some(sheet) = workbook.sheet(SUMMARY_SHEET) {
        if let Some(record) = summary::search(sheet, rut) {
            debug!(sheet = SUMMARY_SHEET, "match found");
            return Some(record);
        }
    }

    if let Some(sheet) = workbook.sheet(REGISTRY_SHEET) {
        if let Some(record) = registry::search(sheet, rut) {
            debug!(sheet = REGISTRY_SHEET, "match found");
            return Some(record);
        }
    }

    debug!("no sheet matched the identifier");
    None
}

fn number_at(sheet: &Sheet, row: u32, col: Option<u32>) -> f64 {
    col.and_then(|col| sheet.cell(row, col))
        .map_or(0.0, CellValue::as_number)
}

fn text_at(sheet: &Sheet, row: u32, col: Option<u32>) -> String {
    col.and_then(|col| sheet.cell(row, col))
        .map(CellValue::as_text)
        .unwrap_or_default()
}
