//! The storage contract consumed by the scan cursor

use crate::model::{Cell, ColumnSelector, KeyRange};

use super::errors::StorageResult;

/// Pull iterator over cells in key order.
///
/// Cells come back sorted by row key, family, qualifier and newest
/// timestamp first. The iterator never moves backwards.
pub trait CellIterator {
    /// Returns the next cell, or `None` when the scan range is exhausted
    fn next_cell(&mut self) -> StorageResult<Option<Cell>>;

    /// Moves forward so the next cell has a row key >= `row_key`.
    ///
    /// A target at or before the current position is a no-op.
    fn seek(&mut self, row_key: &[u8]) -> StorageResult<()>;

    /// Releases the underlying resources. Must be idempotent.
    fn close(&mut self);
}

/// What the cursor asks storage for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub table: String,
    pub range: KeyRange,
    pub columns: ColumnSelector,
    /// Newest versions returned per column
    pub max_versions: usize,
}

impl ScanRequest {
    /// Full-table request returning the latest version of every column
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            range: KeyRange::all(),
            columns: ColumnSelector::all(),
            max_versions: 1,
        }
    }

    /// Restricts the row-key range
    pub fn with_range(mut self, range: KeyRange) -> Self {
        self.range = range;
        self
    }

    /// Restricts the returned columns
    pub fn with_columns(mut self, columns: ColumnSelector) -> Self {
        self.columns = columns;
        self
    }

    /// Sets how many versions per column are returned
    pub fn with_max_versions(mut self, max_versions: usize) -> Self {
        self.max_versions = max_versions;
        self
    }
}

/// Anything a scan can be opened against
pub trait CellSource {
    type Iter: CellIterator;

    /// Opens a scan over the requested range and columns
    fn open_scan(&self, request: &ScanRequest) -> StorageResult<Self::Iter>;
}

/// Owns an open scan and closes it exactly once.
///
/// The iterator is closed on `close()`, on error paths that call it, and on
/// drop, whichever comes first.
#[derive(Debug)]
pub struct ScanHandle<I: CellIterator> {
    iter: I,
    closed: bool,
}

impl<I: CellIterator> ScanHandle<I> {
    /// Takes ownership of an open iterator
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            closed: false,
        }
    }

    /// Pulls the next cell; a closed handle yields nothing
    pub fn next_cell(&mut self) -> StorageResult<Option<Cell>> {
        if self.closed {
            return Ok(None);
        }
        self.iter.next_cell()
    }

    /// Forwards a seek to the iterator
    pub fn seek(&mut self, row_key: &[u8]) -> StorageResult<()> {
        if self.closed {
            return Ok(());
        }
        self.iter.seek(row_key)
    }

    /// Closes the iterator if still open
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.iter.close();
        }
    }

    /// Returns whether the handle has been released
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<I: CellIterator> Drop for ScanHandle<I> {
    fn drop(&mut self) {
        self.close();
    }
}
