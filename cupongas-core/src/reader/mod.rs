//! Workbook ingestion using calamine

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

pub mod workbook;

pub use workbook::{parse_number, CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut excel: Sheets<_> = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    Ok(convert_sheets(&mut excel, path.display().to_string()))
}

/// Read a workbook from an in-memory payload (upload or download path)
pub fn read_workbook_bytes(bytes: &[u8], source: impl Into<String>) -> Result<Workbook> {
    let source = source.into();
    let cursor = Cursor::new(bytes.to_vec());
    let mut excel = open_workbook_auto_from_rs(cursor)
        .with_context(|| format!("Failed to parse workbook payload from {source}"))?;
    Ok(convert_sheets(&mut excel, source))
}

fn convert_sheets<RS>(excel: &mut Sheets<RS>, source: String) -> Workbook
where
    RS: std::io::Read + std::io::Seek,
{
    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::new();

    for sheet_name in &sheet_names {
        let range = excel.worksheet_range(sheet_name).ok();
        sheets.push(parse_sheet(sheet_name, range.as_ref()));
    }

    Workbook { sheets, source }
}

fn parse_sheet(name: &str, range: Option<&Range<Data>>) -> Sheet {
    let mut cells = HashMap::new();
    let mut used_range = None;

    if let Some(r) = range {
        if let (Some(start), Some(end)) = (r.start(), r.end()) {
            let (nrows, ncols) = r.get_size();
            for rel_row in 0..nrows {
                for rel_col in 0..ncols {
                    if let Some(data) = r.get((rel_row, rel_col)) {
                        let value = parse_cell_value(data);
                        if !value.is_empty() {
                            cells.insert(
                                (start.0 + rel_row as u32, start.1 + rel_col as u32),
                                value,
                            );
                        }
                    }
                }
            }
            used_range = Some((end.0 + 1, end.1 + 1));
        }
    }

    Sheet {
        name: name.to_string(),
        cells,
        used_range,
    }
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // Error cells coerce to zero downstream, same as any other artifact
        Data::Error(_) => CellValue::Empty,
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
