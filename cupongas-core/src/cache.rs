//! Single-slot workbook cache with a parameterized staleness contract
//!
//! Caching is an optimization, never a correctness requirement: persistence
//! failures are logged and swallowed, and a stale entry remains usable as a
//! last-resort fallback when every source fails.

use crate::reader::{self, Workbook};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A parsed workbook snapshot plus its provenance
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub workbook: Workbook,
    /// Raw payload, kept so the snapshot can be persisted to disk
    pub bytes: Option<Vec<u8>>,
    pub fetched_at: DateTime<Utc>,
    pub source: String,
}

impl CacheEntry {
    pub fn new(workbook: Workbook, bytes: Option<Vec<u8>>, source: impl Into<String>) -> Self {
        CacheEntry {
            workbook,
            bytes,
            fetched_at: Utc::now(),
            source: source.into(),
        }
    }

    /// Fresh iff the entry is younger than the given threshold. Call sites
    /// pick their own threshold (short before a search, longer for explicit
    /// refreshes).
    pub fn is_fresh(&self, threshold_minutes: i64) -> bool {
        Utc::now() - self.fetched_at < Duration::minutes(threshold_minutes)
    }
}

/// The single cache slot, optionally mirrored to a file on disk
pub struct WorkbookCache {
    entry: Option<CacheEntry>,
    persist_path: Option<PathBuf>,
}

impl WorkbookCache {
    /// Create the cache, reloading a persisted snapshot when one exists
    pub fn new(persist_path: Option<PathBuf>) -> Self {
        let entry = persist_path.as_ref().and_then(|path| {
            let bytes = fs::read(path).ok()?;
            let workbook =
                match reader::read_workbook_bytes(&bytes, format!("cache:{}", path.display())) {
                    Ok(workbook) => workbook,
                    Err(err) => {
                        warn!(path = %path.display(), %err, "ignoring unreadable cache snapshot");
                        return None;
                    }
                };
            let fetched_at = fs::metadata(path)
                .and_then(|meta| meta.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            debug!(path = %path.display(), "reloaded persisted workbook snapshot");
            Some(CacheEntry {
                workbook,
                bytes: Some(bytes),
                fetched_at,
                source: format!("cache:{}", path.display()),
            })
        });

        WorkbookCache { entry, persist_path }
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// Replace the slot, overwriting whatever was stored before. Persisting
    /// to disk is best-effort.
    pub fn store(&mut self, entry: CacheEntry) {
        if let (Some(path), Some(bytes)) = (&self.persist_path, &entry.bytes) {
            if let Err(err) = fs::write(path, bytes) {
                warn!(path = %path.display(), %err, "failed to persist workbook snapshot");
            }
        }
        self.entry = Some(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_workbook() -> Workbook {
        Workbook {
            sheets: Vec::new(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_freshness_thresholds() {
        let mut entry = CacheEntry::new(empty_workbook(), None, "test");
        assert!(entry.is_fresh(5));

        entry.fetched_at = Utc::now() - Duration::minutes(7);
        assert!(!entry.is_fresh(5));
        assert!(entry.is_fresh(10));
    }

    #[test]
    fn test_store_overwrites() {
        let mut cache = WorkbookCache::new(None);
        assert!(cache.entry().is_none());

        cache.store(CacheEntry::new(empty_workbook(), None, "first"));
        cache.store(CacheEntry::new(empty_workbook(), None, "second"));
        assert_eq!(cache.entry().unwrap().source, "second");
    }

    #[test]
    fn test_persist_failure_is_swallowed() {
        let path = PathBuf::from("/nonexistent-dir/snapshot.xlsx");
        let mut cache = WorkbookCache::new(Some(path));
        cache.store(CacheEntry::new(
            empty_workbook(),
            Some(vec![1, 2, 3]),
            "upload",
        ));
        // The entry is stored even though the disk write failed
        assert!(cache.entry().is_some());
    }

    #[test]
    fn test_unreadable_snapshot_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.xlsx");
        fs::write(&path, b"not a workbook").unwrap();

        let cache = WorkbookCache::new(Some(path));
        assert!(cache.entry().is_none());
    }
}
