//! Metrics registry for the scan engine
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, shared by every scan of a `Scanner`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-level scan counters.
///
/// Relaxed atomics: values are exact once all scans finished, but may be
/// observed mid-update while scans run.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    scans_opened: AtomicU64,
    scans_completed: AtomicU64,
    scans_stopped_by_filter: AtomicU64,
    scans_failed: AtomicU64,
    scans_abandoned: AtomicU64,
    filters_rejected: AtomicU64,
    cells_pulled: AtomicU64,
    rows_emitted: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment scans opened
    pub fn increment_scans_opened(&self) {
        self.scans_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment scans that ran to the end of storage or their row limit
    pub fn increment_scans_completed(&self) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment scans ended early by a filter
    pub fn increment_scans_stopped_by_filter(&self) {
        self.scans_stopped_by_filter.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment scans aborted by an error
    pub fn increment_scans_failed(&self) {
        self.scans_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment scans dropped before finishing
    pub fn increment_scans_abandoned(&self) {
        self.scans_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment filter descriptions that failed to build
    pub fn increment_filters_rejected(&self) {
        self.filters_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Add cells pulled from storage
    pub fn add_cells_pulled(&self, cells: u64) {
        self.cells_pulled.fetch_add(cells, Ordering::Relaxed);
    }

    /// Add rows delivered to callers
    pub fn add_rows_emitted(&self, rows: u64) {
        self.rows_emitted.fetch_add(rows, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_default()
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans_opened: self.scans_opened.load(Ordering::Relaxed),
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            scans_stopped_by_filter: self.scans_stopped_by_filter.load(Ordering::Relaxed),
            scans_failed: self.scans_failed.load(Ordering::Relaxed),
            scans_abandoned: self.scans_abandoned.load(Ordering::Relaxed),
            filters_rejected: self.filters_rejected.load(Ordering::Relaxed),
            cells_pulled: self.cells_pulled.load(Ordering::Relaxed),
            rows_emitted: self.rows_emitted.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub scans_opened: u64,
    pub scans_completed: u64,
    pub scans_stopped_by_filter: u64,
    pub scans_failed: u64,
    pub scans_abandoned: u64,
    pub filters_rejected: u64,
    pub cells_pulled: u64,
    pub rows_emitted: u64,
}
