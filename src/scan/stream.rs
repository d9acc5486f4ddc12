//! Lazy row stream handed to callers

use uuid::Uuid;

use super::cursor::ScanCursor;
use super::errors::ScanResult;
use super::metrics::ScanMetrics;
use crate::model::Row;
use crate::storage::CellIterator;

/// Forward-only stream of filtered rows.
///
/// Storage is only read when the caller asks for the next row. Dropping
/// the stream closes the storage handle. After an error the stream yields
/// `None`.
#[derive(Debug)]
pub struct RowStream<I: CellIterator> {
    cursor: ScanCursor<I>,
}

impl<I: CellIterator> RowStream<I> {
    pub(crate) fn new(cursor: ScanCursor<I>) -> Self {
        Self { cursor }
    }

    /// Key of the last delivered row.
    ///
    /// A scan opened with `KeyRange::resume_after(checkpoint)` continues
    /// right after it.
    pub fn checkpoint(&self) -> Option<&[u8]> {
        self.cursor.last_row_key()
    }

    /// Counters of this scan so far
    pub fn metrics(&self) -> &ScanMetrics {
        self.cursor.metrics()
    }

    /// Returns true once the scan has stopped
    pub fn is_finished(&self) -> bool {
        self.cursor.state() == super::cursor::CursorState::Stopped
    }

    /// Id carried in this scan's log lines
    pub fn scan_id(&self) -> Uuid {
        self.cursor.scan_id()
    }
}

impl<I: CellIterator> Iterator for RowStream<I> {
    type Item = ScanResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_row().transpose()
    }
}

impl<I: CellIterator> std::iter::FusedIterator for RowStream<I> {}
