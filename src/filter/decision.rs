//! Decisions returned by filters

/// What the cursor should do with the current cell or row key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// Keep the cell
    Include,
    /// Drop the cell, continue with the next one
    SkipCell,
    /// Drop the rest of the row and move to the next row key
    NextRow,
    /// Drop the rest of the row and jump forward to the given row key
    SeekTo(Vec<u8>),
    /// End the scan now; the partial row is discarded
    StopScan,
}

impl ScanDecision {
    /// Returns true for `Include`
    pub fn is_include(&self) -> bool {
        matches!(self, ScanDecision::Include)
    }

    /// Returns true for `StopScan`
    pub fn is_stop(&self) -> bool {
        matches!(self, ScanDecision::StopScan)
    }

    /// Merges two rejecting decisions, keeping the least restrictive one.
    ///
    /// Used by ONE lists: a cell only one child skipped stays reachable for
    /// the others, and two seek hints keep the nearer one.
    pub(crate) fn weaker(self, other: ScanDecision) -> ScanDecision {
        use ScanDecision::*;
        match (self, other) {
            (Include, _) | (_, Include) => Include,
            (SkipCell, _) | (_, SkipCell) => SkipCell,
            (NextRow, _) | (_, NextRow) => NextRow,
            (SeekTo(a), SeekTo(b)) => SeekTo(a.min(b)),
            (SeekTo(a), StopScan) | (StopScan, SeekTo(a)) => SeekTo(a),
            (StopScan, StopScan) => StopScan,
        }
    }
}

/// Row-level verdict given once all cells of a row were offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    /// Emit the buffered row
    KeepRow,
    /// Discard the buffered row
    DropRow,
}

impl RowDecision {
    /// Returns true for `KeepRow`
    pub fn is_keep(self) -> bool {
        self == RowDecision::KeepRow
    }
}
