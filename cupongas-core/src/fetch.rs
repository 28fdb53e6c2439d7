//! Remote workbook acquisition over HTTP
//!
//! The administrator publishes the workbook behind one or more download
//! URLs (mirrors of the same document). Each URL is tried in order; an
//! attempt fails independently on transport errors, non-success status,
//! wrong content type, or a payload too small to be a workbook. Only after
//! every alternative fails does acquisition report exhaustion — the caller
//! then falls back to whatever cache it holds.

use crate::error::SourceError;
use crate::source::{ingest, Acquired, WorkbookSource};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything smaller is an error page, not a workbook
const MIN_PAYLOAD_BYTES: usize = 512;

/// Downloads the workbook from an ordered list of alternative URLs
pub struct HttpSource {
    client: Client,
    urls: Vec<String>,
}

impl HttpSource {
    pub fn new(urls: Vec<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|err| SourceError::HttpClient(err.to_string()))?;
        Ok(HttpSource { client, urls })
    }

    fn try_url(&self, url: &str) -> Result<Acquired, SourceError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, XLSX_MIME)
            .send()
            .map_err(|err| SourceError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Transport {
                url: url.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_spreadsheet_content(&content_type) {
            return Err(SourceError::InvalidContent {
                url: url.to_string(),
                reason: format!("content type '{content_type}'"),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|err| SourceError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            })?
            .to_vec();
        if bytes.len() < MIN_PAYLOAD_BYTES {
            return Err(SourceError::InvalidContent {
                url: url.to_string(),
                reason: format!("payload too small ({} bytes)", bytes.len()),
            });
        }

        let workbook = ingest(&bytes, url.to_string())?;
        debug!(%url, bytes = bytes.len(), "workbook downloaded");
        Ok(Acquired {
            workbook,
            bytes: Some(bytes),
            source: url.to_string(),
        })
    }
}

impl WorkbookSource for HttpSource {
    fn describe(&self) -> String {
        match self.urls.first() {
            Some(url) => url.clone(),
            None => "http:<unconfigured>".to_string(),
        }
    }

    fn acquire(&self) -> Result<Acquired, SourceError> {
        if self.urls.is_empty() {
            return Err(SourceError::NoSourceConfigured);
        }

        for url in &self.urls {
            match self.try_url(url) {
                Ok(acquired) => return Ok(acquired),
                Err(err) => warn!(%url, %err, "source attempt failed"),
            }
        }

        Err(SourceError::Exhausted(self.urls.len()))
    }
}

fn is_spreadsheet_content(content_type: &str) -> bool {
    content_type.contains(XLSX_MIME) || content_type.contains(XLS_MIME)
}
