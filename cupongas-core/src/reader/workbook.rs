//! Workbook data structures and the tabular access layer

use std::collections::HashMap;

/// Represents a complete workbook
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Where the payload came from (file path, URL, or upload tag)
    pub source: String,
}

impl Workbook {
    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), CellValue>,
    pub used_range: Option<(u32, u32)>, // (rows, cols)
}

impl Sheet {
    /// Build a sheet from dense row-major data. Empty values are not stored.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut cells = HashMap::new();
        let nrows = rows.len() as u32;
        let mut ncols = 0u32;

        for (row, values) in rows.into_iter().enumerate() {
            ncols = ncols.max(values.len() as u32);
            for (col, value) in values.into_iter().enumerate() {
                if !value.is_empty() {
                    cells.insert((row as u32, col as u32), value);
                }
            }
        }

        Sheet {
            name: name.into(),
            cells,
            used_range: (nrows > 0).then_some((nrows, ncols)),
        }
    }

    /// Get the cell at the given position, or `None` when absent or out of
    /// range. Direct addressed access is reserved for fixed-layout sheets;
    /// everything else goes through the header resolver.
    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Number of rows in the used range
    pub fn row_count(&self) -> u32 {
        self.used_range.map_or(0, |(rows, _)| rows)
    }

    /// Number of columns in the used range
    pub fn col_count(&self) -> u32 {
        self.used_range.map_or(0, |(_, cols)| cols)
    }

    /// A single row as a dense sequence aligned by column index
    pub fn row(&self, row: u32) -> Vec<Option<&CellValue>> {
        (0..self.col_count()).map(|col| self.cell(row, col)).collect()
    }

    /// All rows in stored order, missing cells represented as `None`
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&CellValue>>> + '_ {
        (0..self.row_count()).map(|row| self.row(row))
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Coerce to text. Whole numbers render without a decimal point so that
    /// identifiers stored as numeric cells compare equal to their text form.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    /// Coerce to a number, treating anything unparseable as zero
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Empty => 0.0,
            CellValue::Number(n) => *n,
            CellValue::Text(s) => parse_number(s),
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Parse a quantity out of free-form cell text.
///
/// A comma counts as a decimal separator, every character other than digits,
/// `.` and `-` is stripped, and anything that still fails to parse is zero.
/// Spreadsheets carry stray formatting artifacts; this never errors.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_robustness() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("3,5kg"), 3.5);
        assert_eq!(parse_number("2"), 2.0);
        assert_eq!(parse_number(" 4 "), 4.0);
        assert_eq!(parse_number("-1.5"), -1.5);
        assert_eq!(parse_number("1.2.3"), 0.0);
    }

    #[test]
    fn test_cell_coercions() {
        assert_eq!(CellValue::Empty.as_number(), 0.0);
        assert_eq!(CellValue::Number(2.0).as_number(), 2.0);
        assert_eq!(CellValue::Text("abc".to_string()).as_number(), 0.0);
        assert_eq!(CellValue::Text("3,5kg".to_string()).as_number(), 3.5);

        assert_eq!(CellValue::Number(12345678.0).as_text(), "12345678");
        assert_eq!(CellValue::Number(3.5).as_text(), "3.5");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_sheet_access_out_of_range() {
        let sheet = Sheet::from_rows(
            "DATA",
            vec![vec![
                CellValue::Text("RUT".to_string()),
                CellValue::Number(1.0),
            ]],
        );

        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.col_count(), 2);
        assert!(sheet.cell(5, 5).is_none());
        assert!(sheet.cell(0, 0).is_some());

        let rows: Vec<_> = sheet.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn test_unknown_sheet_is_absent() {
        let workbook = Workbook {
            sheets: vec![Sheet::from_rows("GENERAL", Vec::new())],
            source: "test".to_string(),
        };
        assert!(workbook.sheet("GENERAL").is_some());
        assert!(workbook.sheet("NO SUCH SHEET").is_none());
    }
}
