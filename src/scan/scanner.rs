//! Caller-facing scan API

use std::sync::Arc;

use super::cursor::ScanCursor;
use super::errors::ScanResult;
use super::stream::RowStream;
use crate::config::ScanConfig;
use crate::filter::{Filter, FilterSpec};
use crate::model::{ColumnSelector, KeyRange, Row};
use crate::observability::{Event, Logger, MetricsRegistry, MetricsSnapshot};
use crate::storage::{CellSource, ScanRequest};

/// Opens filtered scans against a cell source.
///
/// Every scan gets its own cursor and its own filter instance; the scanner
/// itself only holds configuration and shared counters.
pub struct Scanner<'a, S: CellSource> {
    source: &'a S,
    config: ScanConfig,
    registry: Arc<MetricsRegistry>,
}

impl<'a, S: CellSource> Scanner<'a, S> {
    /// Scanner with the default configuration
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            config: ScanConfig::default(),
            registry: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Scanner with a validated configuration
    pub fn with_config(source: &'a S, config: ScanConfig) -> ScanResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            registry: Arc::new(MetricsRegistry::new()),
        })
    }

    /// Shares a counter registry with other scanners
    pub fn with_registry(mut self, registry: Arc<MetricsRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the active configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Returns the counters of every scan opened so far
    pub fn metrics(&self) -> MetricsSnapshot {
        self.registry.snapshot()
    }

    /// Opens a scan. No cell is read until the stream is polled.
    pub fn scan(
        &self,
        table: &str,
        range: KeyRange,
        filter: Option<Filter>,
        columns: ColumnSelector,
    ) -> ScanResult<RowStream<S::Iter>> {
        let request = ScanRequest {
            table: table.to_string(),
            range,
            columns,
            max_versions: self.config.max_versions,
        };

        let iter = match self.source.open_scan(&request) {
            Ok(iter) => iter,
            Err(err) => {
                self.registry.increment_scans_failed();
                if self.config.log_scans {
                    let reason = err.to_string();
                    Logger::event(
                        Event::ScanFailed,
                        &[("reason", reason.as_str()), ("table", table)],
                    );
                }
                return Err(err.into());
            }
        };
        self.registry.increment_scans_opened();

        let mut cursor = ScanCursor::new(iter, filter)
            .with_row_limit(self.config.row_limit)
            .with_registry(Arc::clone(&self.registry));
        if self.config.log_scans {
            cursor = cursor.observed(table);
        }
        Ok(RowStream::new(cursor))
    }

    /// Builds a fresh filter from its description, then opens the scan.
    ///
    /// A description that fails to build is rejected before storage is
    /// touched.
    pub fn scan_spec(
        &self,
        table: &str,
        range: KeyRange,
        spec: &FilterSpec,
        columns: ColumnSelector,
    ) -> ScanResult<RowStream<S::Iter>> {
        let filter = match spec.build() {
            Ok(filter) => filter,
            Err(err) => {
                self.registry.increment_filters_rejected();
                if self.config.log_scans {
                    let reason = err.to_string();
                    Logger::event(
                        Event::FilterRejected,
                        &[("filter", err.filter()), ("reason", reason.as_str()), ("table", table)],
                    );
                }
                return Err(err.into());
            }
        };
        self.scan(table, range, Some(filter), columns)
    }

    /// Reads a single row, or `None` if it has no selected cells
    pub fn get(
        &self,
        table: &str,
        row_key: &[u8],
        columns: ColumnSelector,
    ) -> ScanResult<Option<Row>> {
        let mut stream = self.scan(table, KeyRange::single(row_key), None, columns)?;
        stream.next().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{CompareOp, Comparator};
    use crate::filter::ValueFilter;
    use crate::model::Cell;
    use crate::storage::MemoryStore;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        for (row, name) in [("10001", "Jack"), ("10002", "Mary"), ("10003", "John")] {
            store.put("user", Cell::new(row, "info", "name", name, 1));
            store.put("user", Cell::new(row, "info", "age", "30", 1));
        }
        store
    }

    #[test]
    fn test_scan_counts_in_registry() {
        let store = store();
        let scanner = Scanner::with_config(&store, ScanConfig::quiet()).unwrap();
        let filter = ValueFilter::new(CompareOp::Equal, Comparator::substring("J")).unwrap();

        let rows: Vec<Row> = scanner
            .scan("user", KeyRange::all(), Some(filter.into()), ColumnSelector::all())
            .unwrap()
            .collect::<ScanResult<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        let metrics = scanner.metrics();
        assert_eq!(metrics.scans_opened, 1);
        assert_eq!(metrics.scans_completed, 1);
        assert_eq!(metrics.rows_emitted, 2);
        assert_eq!(metrics.cells_pulled, 6);
    }

    #[test]
    fn test_get_single_row() {
        let store = store();
        let scanner = Scanner::with_config(&store, ScanConfig::quiet()).unwrap();

        let row = scanner
            .get("user", b"10002", ColumnSelector::all().column("info", "name"))
            .unwrap()
            .unwrap();
        assert_eq!(row.get_value(b"info", b"name"), Some(b"Mary".as_slice()));
        assert_eq!(row.len(), 1);

        assert!(scanner.get("user", b"99999", ColumnSelector::all()).unwrap().is_none());
    }

    #[test]
    fn test_missing_table_fails_open() {
        let store = store();
        let scanner = Scanner::with_config(&store, ScanConfig::quiet()).unwrap();

        let err = scanner
            .scan("nope", KeyRange::all(), None, ColumnSelector::all())
            .unwrap_err();
        assert_eq!(err.code(), Some("CFSCAN_STORAGE_TABLE_NOT_FOUND"));
        assert_eq!(scanner.metrics().scans_failed, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let store = store();
        let config = ScanConfig {
            max_versions: 0,
            ..ScanConfig::quiet()
        };
        assert!(Scanner::with_config(&store, config).is_err());
    }

    #[test]
    fn test_abandoned_scan_counted() {
        let store = store();
        let scanner = Scanner::with_config(&store, ScanConfig::quiet()).unwrap();

        let mut stream = scanner
            .scan("user", KeyRange::all(), None, ColumnSelector::all())
            .unwrap();
        assert!(stream.next().is_some());
        drop(stream);

        assert_eq!(scanner.metrics().scans_abandoned, 1);
    }
}
