//! Error taxonomy for the lookup service
//!
//! Only two things are errors at the API boundary: invalid input and having
//! no data at all. A schema mismatch makes a strategy yield no match, and an
//! unparseable cell coerces to zero; neither ever surfaces as an error.

use thiserror::Error;

/// Errors surfaced to the caller of the lookup service
#[derive(Debug, Error)]
pub enum CouponError {
    /// The identifier failed check-digit validation; the caller must correct
    /// the input, there is nothing to retry.
    #[error("invalid RUT '{0}'")]
    InvalidRut(String),

    /// Every configured source failed and no cached snapshot exists. The
    /// user can retry later.
    #[error("no workbook data available")]
    NoData(#[source] SourceError),
}

/// A single acquisition attempt gone wrong
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no workbook source configured")]
    NoSourceConfigured,

    #[error("failed to read workbook source")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Ingest(#[from] anyhow::Error),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} returned unusable content: {reason}")]
    InvalidContent { url: String, reason: String },

    #[cfg(feature = "remote-source")]
    #[error("failed to build http client: {0}")]
    HttpClient(String),

    #[error("all {0} configured sources failed")]
    Exhausted(usize),
}
