//! cupongas-core: spreadsheet-backed gas-cylinder coupon lookup
//!
//! An administrator maintains a workbook of coupon redemptions (a
//! transactional ledger, a precomputed summary, and an affiliate registry).
//! This library ingests that workbook from wherever the bytes happen to
//! live, locates an affiliate by national identifier (RUT), and aggregates
//! their per-vendor, per-cylinder-size coupon usage for the period.

pub mod cache;
pub mod config;
pub mod error;
#[cfg(feature = "remote-source")]
pub mod fetch;
pub mod header;
pub mod locator;
pub mod reader;
pub mod record;
pub mod rut;
pub mod source;

use cache::{CacheEntry, WorkbookCache};
use reader::Workbook;
use source::WorkbookSource;
use tracing::{debug, warn};

pub use config::ServiceConfig;
pub use error::{CouponError, SourceError};
pub use record::{CouponRecord, CylinderCounts, PurchaseCounts, MONTHLY_COUPON_CAP};

/// Coupon lookup service.
///
/// One explicitly-constructed instance owns the configuration, the
/// acquisition source, and the single-slot workbook cache; the host
/// application decides its lifetime. Searches are read-only over the cached
/// snapshot, so the only mutation is the cache slot itself.
pub struct CouponService {
    config: ServiceConfig,
    source: Option<Box<dyn WorkbookSource>>,
    cache: WorkbookCache,
}

impl CouponService {
    /// Create a service with default configuration
    pub fn new(source: Option<Box<dyn WorkbookSource>>) -> Self {
        Self::with_config(ServiceConfig::default(), source)
    }

    /// Create a service with custom configuration, reloading any persisted
    /// cache snapshot
    pub fn with_config(config: ServiceConfig, source: Option<Box<dyn WorkbookSource>>) -> Self {
        let cache = WorkbookCache::new(config.cache.path.clone());
        CouponService {
            config,
            source,
            cache,
        }
    }

    /// Look up the coupon record for a raw identifier string.
    ///
    /// `Ok(None)` means the identifier validated but matched no sheet, which
    /// is indistinguishable from being genuinely absent.
    pub fn search(&mut self, raw_rut: &str) -> Result<Option<CouponRecord>, CouponError> {
        if !rut::validate(raw_rut) {
            return Err(CouponError::InvalidRut(raw_rut.trim().to_string()));
        }
        let normalized = rut::normalize(raw_rut.trim());

        let refresh_minutes = self.config.cache.refresh_minutes;
        let workbook = self.ensure_workbook(refresh_minutes)?;
        Ok(locator::find_coupons(workbook, &normalized))
    }

    /// Refresh the cached workbook unless it is younger than the short
    /// freshness threshold
    pub fn refresh(&mut self) -> Result<(), CouponError> {
        let fresh_minutes = self.config.cache.fresh_minutes;
        self.ensure_workbook(fresh_minutes).map(|_| ())
    }

    /// Load an already-resident payload (the administrator upload path),
    /// replacing the cached snapshot
    pub fn load_bytes(
        &mut self,
        bytes: Vec<u8>,
        source_tag: impl Into<String>,
    ) -> Result<(), SourceError> {
        let tag = source_tag.into();
        let workbook = source::ingest(&bytes, tag.clone())?;
        self.cache.store(CacheEntry::new(workbook, Some(bytes), tag));
        Ok(())
    }

    /// When the cached snapshot was fetched, if one exists
    pub fn cached_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.cache.entry().map(|entry| entry.fetched_at)
    }

    /// Make sure a workbook is resident, refetching when the cache is older
    /// than the threshold. Acquisition failure with a populated cache serves
    /// the stale entry: availability over freshness.
    fn ensure_workbook(&mut self, threshold_minutes: i64) -> Result<&Workbook, CouponError> {
        let fresh = self
            .cache
            .entry()
            .is_some_and(|entry| entry.is_fresh(threshold_minutes));

        if !fresh {
            match self.source.as_ref().map(|source| source.acquire()) {
                Some(Ok(acquired)) => {
                    debug!(source = %acquired.source, "workbook refreshed");
                    self.cache.store(CacheEntry::new(
                        acquired.workbook,
                        acquired.bytes,
                        acquired.source,
                    ));
                }
                Some(Err(err)) => {
                    if self.cache.entry().is_some() {
                        warn!(%err, "acquisition failed, serving the stale snapshot");
                    } else {
                        return Err(CouponError::NoData(err));
                    }
                }
                None => {
                    if self.cache.entry().is_none() {
                        return Err(CouponError::NoData(SourceError::NoSourceConfigured));
                    }
                }
            }
        }

        match self.cache.entry() {
            Some(entry) => Ok(&entry.workbook),
            None => Err(CouponError::NoData(SourceError::NoSourceConfigured)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{CellValue, Sheet};
    use crate::source::Acquired;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn ledger_workbook() -> Workbook {
        let sheet = Sheet::from_rows(
            locator::LEDGER_SHEET,
            vec![
                vec![text("RUT AFILIADO"), text("NOMBRES"), text("05 KILOS")],
                vec![text("12345678-5"), text("ANA"), CellValue::Number(2.0)],
            ],
        );
        Workbook {
            sheets: vec![sheet],
            source: "stub".to_string(),
        }
    }

    struct StubSource(Workbook);

    impl WorkbookSource for StubSource {
        fn describe(&self) -> String {
            "stub".to_string()
        }

        fn acquire(&self) -> Result<Acquired, SourceError> {
            Ok(Acquired {
                workbook: self.0.clone(),
                bytes: None,
                source: "stub".to_string(),
            })
        }
    }

    struct FailingSource;

    impl WorkbookSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        fn acquire(&self) -> Result<Acquired, SourceError> {
            Err(SourceError::Exhausted(1))
        }
    }

    #[test]
    fn test_invalid_rut_is_rejected_before_any_fetch() {
        let mut service = CouponService::new(None);
        assert!(matches!(
            service.search("12345678-9"),
            Err(CouponError::InvalidRut(_))
        ));
    }

    #[test]
    fn test_search_through_stub_source() {
        let mut service = CouponService::new(Some(Box::new(StubSource(ledger_workbook()))));

        let record = service.search("12.345.678-5").unwrap().unwrap();
        assert_eq!(record.rut, "12345678-5");
        assert_eq!(record.nombres, "ANA");
        assert_eq!(record.lipigas.kg5, 2.0);

        assert!(service.search("19919092-K").unwrap().is_none());
    }

    #[test]
    fn test_no_source_no_cache_is_no_data() {
        let mut service = CouponService::new(None);
        assert!(matches!(
            service.search("12345678-5"),
            Err(CouponError::NoData(_))
        ));
    }

    #[test]
    fn test_failing_source_without_cache_is_no_data() {
        let mut service = CouponService::new(Some(Box::new(FailingSource)));
        assert!(matches!(
            service.search("12345678-5"),
            Err(CouponError::NoData(_))
        ));
    }

    #[test]
    fn test_refresh_populates_the_cache() {
        let mut service = CouponService::new(Some(Box::new(StubSource(ledger_workbook()))));
        assert!(service.cached_at().is_none());

        service.refresh().unwrap();
        assert!(service.cached_at().is_some());
    }

    #[test]
    fn test_stale_cache_survives_source_failure() {
        // Zero threshold: the cache is always considered stale, so every
        // search attempts a refetch
        let mut config = ServiceConfig::default();
        config.cache.refresh_minutes = 0;

        let mut service = CouponService::with_config(config, Some(Box::new(FailingSource)));
        let workbook = ledger_workbook();
        service
            .cache
            .store(CacheEntry::new(workbook, None, "preloaded"));

        let record = service.search("12345678-5").unwrap().unwrap();
        assert_eq!(record.nombres, "ANA");
    }
}
