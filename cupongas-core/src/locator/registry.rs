//! Registry strategy: affiliate roster without usage history
//!
//! Matching here means "known affiliate, no usage yet": all quantities are
//! zero and the full monthly allotment is available.

use super::text_at;
use crate::header::{self, ColumnMap, FieldSpec, HEADER_SCAN_LIMIT};
use crate::reader::Sheet;
use crate::record::CouponRecord;
use crate::rut;

const HEADER_MARKERS: &[&str] = &["RUT"];

const F_RUT: &str = "rut";
const F_NOMBRES: &str = "nombres";
const F_APELLIDOS: &str = "apellidos";
const F_ESTABLECIMIENTO: &str = "establecimiento";

const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: F_RUT, synonyms: &["RUT"] },
    FieldSpec { name: F_NOMBRES, synonyms: &["NOMBRES", "NOMBRE"] },
    FieldSpec { name: F_APELLIDOS, synonyms: &["APELLIDOS", "APELLIDO"] },
    FieldSpec { name: F_ESTABLECIMIENTO, synonyms: &["ESTABLECIMIENTO", "CENTRO"] },
];

pub(super) fn search(sheet: &Sheet, rut: &str) -> Option<CouponRecord> {
    let header_row = header::find_header_row(sheet, HEADER_MARKERS, HEADER_SCAN_LIMIT)?;
    let columns = ColumnMap::resolve(sheet, header_row, FIELDS);
    let rut_col = columns.get(F_RUT)?;

    for row in header_row + 1..sheet.row_count() {
        let Some(cell) = sheet.cell(row, rut_col) else {
            continue;
        };
        if rut::normalize(cell.as_text().trim()) != rut {
            continue;
        }

        return Some(CouponRecord {
            rut: rut.to_string(),
            nombres: text_at(sheet, row, columns.get(F_NOMBRES)),
            apellidos: text_at(sheet, row, columns.get(F_APELLIDOS)),
            establecimiento: text_at(sheet, row, columns.get(F_ESTABLECIMIENTO)),
            ..CouponRecord::default()
        });
    }

    None
}
