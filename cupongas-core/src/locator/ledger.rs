//! Ledger strategy: aggregate redemption rows for one affiliate
//!
//! The ledger records one row per redemption, so a single identifier can
//! appear many times in a period. Every matching row contributes to the
//! quantity sums; only the first matching row supplies the scalar fields
//! (names, site, used/available counters).

use super::{number_at, text_at};
use crate::header::{self, ColumnMap, FieldSpec, HEADER_SCAN_LIMIT};
use crate::reader::Sheet;
use crate::record::{CouponRecord, MONTHLY_COUPON_CAP};
use crate::rut;

const HEADER_MARKERS: &[&str] = &["RUT AFILIADO"];

const F_RUT: &str = "rut";
const F_NOMBRES: &str = "nombres";
const F_APELLIDOS: &str = "apellidos";
const F_ESTABLECIMIENTO: &str = "establecimiento";
const F_LIPIGAS_5: &str = "lipigas5";
const F_LIPIGAS_11: &str = "lipigas11";
const F_LIPIGAS_15: &str = "lipigas15";
const F_LIPIGAS_45: &str = "lipigas45";
const F_ABASTIBLE_5: &str = "abastible5";
const F_ABASTIBLE_11: &str = "abastible11";
const F_ABASTIBLE_15: &str = "abastible15";
const F_ABASTIBLE_45: &str = "abastible45";
const F_CINE: &str = "cine";
const F_ENERGY: &str = "energy";
const F_JUMPER: &str = "jumper";
const F_USADO: &str = "usado";
const F_DISPONIBLE: &str = "disponible";

// The vendor quantity columns share their kilo labels; the second vendor's
// block carries a ".1" suffix in exports, falling back to the shared label
// when the suffix is absent.
const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: F_RUT, synonyms: &["RUT AFILIADO"] },
    FieldSpec { name: F_NOMBRES, synonyms: &["NOMBRES", "NOMBRE"] },
    FieldSpec { name: F_APELLIDOS, synonyms: &["APELLIDOS", "APELLIDO"] },
    FieldSpec { name: F_ESTABLECIMIENTO, synonyms: &["ESTABLECIMIENTO", "CENTRO"] },
    FieldSpec { name: F_LIPIGAS_5, synonyms: &["05 KILOS"] },
    FieldSpec { name: F_LIPIGAS_11, synonyms: &["11 KILOS"] },
    FieldSpec { name: F_LIPIGAS_15, synonyms: &["15 KILOS"] },
    FieldSpec { name: F_LIPIGAS_45, synonyms: &["45 KILOS"] },
    FieldSpec { name: F_ABASTIBLE_5, synonyms: &["05 KILOS.1", "05 KILOS"] },
    FieldSpec { name: F_ABASTIBLE_11, synonyms: &["11 KILOS.1", "11 KILOS"] },
    FieldSpec { name: F_ABASTIBLE_15, synonyms: &["15 KILOS.1", "15 KILOS"] },
    FieldSpec { name: F_ABASTIBLE_45, synonyms: &["45 KILOS.1", "45 KILOS"] },
    FieldSpec { name: F_CINE, synonyms: &["CINE"] },
    FieldSpec { name: F_ENERGY, synonyms: &["ENERGY"] },
    FieldSpec { name: F_JUMPER, synonyms: &["JUMPER"] },
    FieldSpec { name: F_USADO, synonyms: &["USADO"] },
    FieldSpec { name: F_DISPONIBLE, synonyms: &["DISPONIBLE"] },
];

pub(super) fn search(sheet: &Sheet, rut: &str) -> Option<CouponRecord> {
    let header_row = header::find_header_row(sheet, HEADER_MARKERS, HEADER_SCAN_LIMIT)?;
    let columns = ColumnMap::resolve(sheet, header_row, FIELDS);
    let rut_col = columns.get(F_RUT)?;

    let mut record = CouponRecord {
        rut: rut.to_string(),
        ..CouponRecord::default()
    };
    let mut matched = false;

    for row in header_row + 1..sheet.row_count() {
        let Some(cell) = sheet.cell(row, rut_col) else {
            continue;
        };
        if rut::normalize(cell.as_text().trim()) != rut {
            continue;
        }

        if !matched {
            matched = true;
            record.nombres = text_at(sheet, row, columns.get(F_NOMBRES));
            record.apellidos = text_at(sheet, row, columns.get(F_APELLIDOS));
            record.establecimiento = text_at(sheet, row, columns.get(F_ESTABLECIMIENTO));
            record.usado_en_el_mes = scalar_at(sheet, row, columns.get(F_USADO), 0.0);
            record.disponible =
                scalar_at(sheet, row, columns.get(F_DISPONIBLE), MONTHLY_COUPON_CAP);
        }

        record.lipigas.kg5 += number_at(sheet, row, columns.get(F_LIPIGAS_5));
        record.lipigas.kg11 += number_at(sheet, row, columns.get(F_LIPIGAS_11));
        record.lipigas.kg15 += number_at(sheet, row, columns.get(F_LIPIGAS_15));
        record.lipigas.kg45 += number_at(sheet, row, columns.get(F_LIPIGAS_45));

        record.abastible.kg5 += number_at(sheet, row, columns.get(F_ABASTIBLE_5));
        record.abastible.kg11 += number_at(sheet, row, columns.get(F_ABASTIBLE_11));
        record.abastible.kg15 += number_at(sheet, row, columns.get(F_ABASTIBLE_15));
        record.abastible.kg45 += number_at(sheet, row, columns.get(F_ABASTIBLE_45));

        record.compras.cine += number_at(sheet, row, columns.get(F_CINE));
        record.compras.energy += number_at(sheet, row, columns.get(F_ENERGY));
        record.compras.jumper += number_at(sheet, row, columns.get(F_JUMPER));
    }

    matched.then_some(record)
}

/// Precomputed counter cell: the resolved column's value when finite,
/// otherwise the given default (also used when the column is missing)
fn scalar_at(sheet: &Sheet, row: u32, col: Option<u32>, default: f64) -> f64 {
    let Some(col) = col else {
        return default;
    };
    let value = sheet
        .cell(row, col)
        .map_or(0.0, crate::reader::CellValue::as_number);
    if value.is_finite() { value } else { default }
}
