//! Per-scan counters

use serde::Serialize;

/// What one scan did so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanMetrics {
    /// Cells read from storage
    pub cells_pulled: u64,
    /// Cells that made it into a row buffer
    pub cells_included: u64,
    /// Rows delivered to the caller
    pub rows_emitted: u64,
    /// Rows rejected at their key or at row end
    pub rows_dropped: u64,
    /// Forward seeks to a filter hint
    pub seeks: u64,
    /// Skips to the next row key
    pub next_row_skips: u64,
}
