//! Header-row discovery and synonym-based column mapping
//!
//! Spreadsheet releases rename columns and move the header row around, so
//! columns are located by case-insensitive substring matching instead of
//! fixed offsets. A field that resolves to no column contributes zero
//! downstream; it is never an error.

use crate::reader::{CellValue, Sheet};
use std::collections::HashMap;

/// Leading rows scanned when looking for a header marker
pub const HEADER_SCAN_LIMIT: u32 = 10;

/// A logical field and the header synonyms tried for it, in order
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub synonyms: &'static [&'static str],
}

/// Find the first leading row where any cell contains any marker substring
pub fn find_header_row(sheet: &Sheet, markers: &[&str], scan_limit: u32) -> Option<u32> {
    sheet
        .rows()
        .take(scan_limit as usize)
        .position(|row| {
            row.iter().any(|cell| {
                cell.is_some_and(|value| {
                    let text = value.as_text().to_uppercase();
                    markers.iter().any(|marker| text.contains(&marker.to_uppercase()))
                })
            })
        })
        .map(|row| row as u32)
}

/// Mapping from logical field names to column indices
#[derive(Debug, Default)]
pub struct ColumnMap {
    columns: HashMap<&'static str, u32>,
}

impl ColumnMap {
    /// Resolve each field against the header row, first synonym wins, then
    /// first matching column wins. Unmatched fields are simply absent.
    pub fn resolve(sheet: &Sheet, header_row: u32, fields: &[FieldSpec]) -> Self {
        let headers: Vec<String> = sheet
            .row(header_row)
            .iter()
            .map(|cell| cell.map(CellValue::as_text).unwrap_or_default().to_uppercase())
            .collect();

        let mut columns = HashMap::new();
        for field in fields {
            if let Some(col) = find_column(&headers, field.synonyms) {
                columns.insert(field.name, col);
            }
        }

        ColumnMap { columns }
    }

    pub fn get(&self, field: &str) -> Option<u32> {
        self.columns.get(field).copied()
    }
}

fn find_column(headers: &[String], synonyms: &[&str]) -> Option<u32> {
    for synonym in synonyms {
        let needle = synonym.to_uppercase();
        if let Some(col) = headers.iter().position(|h| h.contains(&needle)) {
            return Some(col as u32);
        }
    }
    None
}
