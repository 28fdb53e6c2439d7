//! Workbook acquisition interface
//!
//! Transport variability (file on disk, uploaded buffer, HTTP download)
//! stays behind this seam; the search core only ever sees a parsed
//! [`Workbook`]. Implementations report failure per attempt and never
//! panic.

use crate::error::SourceError;
use crate::reader::{self, Workbook};
use std::path::PathBuf;

/// A successfully acquired workbook plus the raw payload when one exists
pub struct Acquired {
    pub workbook: Workbook,
    pub bytes: Option<Vec<u8>>,
    pub source: String,
}

/// Supplies a parsed workbook from wherever the bytes happen to live
pub trait WorkbookSource {
    /// Human-readable tag for logs and cache entries
    fn describe(&self) -> String;

    fn acquire(&self) -> Result<Acquired, SourceError>;
}

/// Parse a payload and reject degenerate workbooks
pub(crate) fn ingest(bytes: &[u8], source: String) -> Result<Workbook, SourceError> {
    let workbook = reader::read_workbook_bytes(bytes, source)?;
    if workbook.sheets.is_empty() {
        return Err(SourceError::NoSheets);
    }
    Ok(workbook)
}

/// Workbook file on local disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl WorkbookSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn acquire(&self) -> Result<Acquired, SourceError> {
        let bytes = std::fs::read(&self.path)?;
        let workbook = ingest(&bytes, self.describe())?;
        Ok(Acquired {
            workbook,
            bytes: Some(bytes),
            source: self.describe(),
        })
    }
}

/// An already-resident payload (the administrator upload path)
pub struct BytesSource {
    bytes: Vec<u8>,
    tag: String,
}

impl BytesSource {
    pub fn new(bytes: Vec<u8>, tag: impl Into<String>) -> Self {
        BytesSource {
            bytes,
            tag: tag.into(),
        }
    }
}

impl WorkbookSource for BytesSource {
    fn describe(&self) -> String {
        self.tag.clone()
    }

    fn acquire(&self) -> Result<Acquired, SourceError> {
        let workbook = ingest(&self.bytes, self.tag.clone())?;
        Ok(Acquired {
            workbook,
            bytes: Some(self.bytes.clone()),
            source: self.tag.clone(),
        })
    }
}
