//! Scan cursor: turns a cell stream into filtered rows
//!
//! ```text
//! INIT --first cell--> SCANNING --row key changes--> ROW_BOUNDARY
//!                         ^                              |
//!                         +--------- next row -----------+
//! any state --STOP_SCAN / exhausted / error / limit--> STOPPED
//! ```
//!
//! A row is only known to be complete once the first cell of the next row
//! was pulled. That cell is parked and replayed as the start of the next
//! row.

use std::sync::Arc;

use uuid::Uuid;

use super::errors::{ScanError, ScanResult};
use super::metrics::ScanMetrics;
use crate::filter::{Filter, ScanDecision, ScanFilter};
use crate::model::{next_row_key, printable, Cell, Row};
use crate::observability::{Event, MetricsRegistry, ObservationScope};
use crate::storage::{CellIterator, ScanHandle};

/// Cursor states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing pulled yet
    Init,
    /// Inside a row
    Scanning,
    /// Between two rows, running row-end evaluation
    RowBoundary,
    /// Final
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Exhausted,
    RowLimit,
    Filter,
}

impl StopReason {
    fn as_str(self) -> &'static str {
        match self {
            StopReason::Exhausted => "exhausted",
            StopReason::RowLimit => "row_limit",
            StopReason::Filter => "filter",
        }
    }
}

#[derive(Debug)]
struct RowProgress {
    row: Row,
    /// Rejected at its key; row-end evaluation is skipped
    rejected: bool,
    /// Remaining cells of this row are ignored
    skip_rest: bool,
}

/// Drives one scan.
///
/// The cursor owns the storage handle and the filter instance for its scan.
/// Neither is shared with any other scan.
#[derive(Debug)]
pub struct ScanCursor<I: CellIterator> {
    handle: ScanHandle<I>,
    filter: Option<Filter>,
    state: CursorState,
    parked: Option<Cell>,
    current: Option<RowProgress>,
    metrics: ScanMetrics,
    row_limit: Option<u64>,
    last_row_key: Option<Vec<u8>>,
    scan_id: Uuid,
    scope: Option<ObservationScope>,
    registry: Option<Arc<MetricsRegistry>>,
}

impl<I: CellIterator> ScanCursor<I> {
    /// Creates a cursor over an open storage iterator
    pub fn new(iter: I, filter: Option<Filter>) -> Self {
        Self {
            handle: ScanHandle::new(iter),
            filter,
            state: CursorState::Init,
            parked: None,
            current: None,
            metrics: ScanMetrics::default(),
            row_limit: None,
            last_row_key: None,
            scan_id: Uuid::new_v4(),
            scope: None,
            registry: None,
        }
    }

    /// Stops after `limit` rows were delivered
    pub fn with_row_limit(mut self, limit: Option<u64>) -> Self {
        self.row_limit = limit;
        self
    }

    /// Reports the scan outcome into a shared registry
    pub fn with_registry(mut self, registry: Arc<MetricsRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Logs the scan lifecycle, starting with SCAN_OPEN
    pub fn observed(mut self, table: &str) -> Self {
        let filter = self.filter.as_ref().map_or("none", |f| f.name());
        self.scope = Some(ObservationScope::new(
            Event::ScanOpen,
            Event::ScanAbandoned,
            vec![
                ("scan_id", self.scan_id.to_string()),
                ("table", table.to_string()),
                ("filter", filter.to_string()),
            ],
        ));
        self
    }

    /// Returns the current state
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Returns the counters of this scan
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Returns the key of the last delivered row
    pub fn last_row_key(&self) -> Option<&[u8]> {
        self.last_row_key.as_deref()
    }

    /// Returns the id carried in this scan's log lines
    pub fn scan_id(&self) -> Uuid {
        self.scan_id
    }

    /// Returns the next row that passed the filter, or `None` once stopped.
    ///
    /// After an error the cursor is stopped and the storage handle closed.
    pub fn next_row(&mut self) -> ScanResult<Option<Row>> {
        match self.advance() {
            Ok(row) => Ok(row),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> ScanResult<Option<Row>> {
        if self.state == CursorState::Init && self.filter_done() {
            self.finish(StopReason::Filter);
        }

        while self.state != CursorState::Stopped {
            let Some(cell) = self.pull()? else {
                let row = self.end_row()?;
                self.finish(StopReason::Exhausted);
                return Ok(row);
            };

            let boundary = self
                .current
                .as_ref()
                .map_or(false, |progress| progress.row.key() != cell.row());
            if boundary {
                self.parked = Some(cell);
                let row = self.end_row()?;
                if self.state != CursorState::Stopped {
                    if self.filter_done() {
                        self.finish(StopReason::Filter);
                    } else {
                        self.state = CursorState::Scanning;
                    }
                }
                match row {
                    Some(row) => return Ok(Some(row)),
                    None => continue,
                }
            }

            if self.current.is_none() {
                self.start_row(cell.row())?;
            }
            if self.state != CursorState::Stopped {
                self.offer(cell)?;
            }
        }
        Ok(None)
    }

    fn pull(&mut self) -> ScanResult<Option<Cell>> {
        if let Some(cell) = self.parked.take() {
            return Ok(Some(cell));
        }
        let cell = self.handle.next_cell()?;
        if cell.is_some() {
            self.metrics.cells_pulled += 1;
            if self.state == CursorState::Init {
                self.state = CursorState::Scanning;
            }
        }
        Ok(cell)
    }

    fn start_row(&mut self, row_key: &[u8]) -> ScanResult<()> {
        let decision = match self.filter.as_mut() {
            Some(filter) => filter.evaluate_row_key(row_key)?,
            None => ScanDecision::Include,
        };

        let mut progress = RowProgress {
            row: Row::new(row_key),
            rejected: false,
            skip_rest: false,
        };
        match decision {
            // nothing to skip before the first cell
            ScanDecision::Include | ScanDecision::SkipCell => {
                self.current = Some(progress);
            }
            ScanDecision::StopScan => self.finish(StopReason::Filter),
            decision @ (ScanDecision::NextRow | ScanDecision::SeekTo(_)) => {
                progress.rejected = true;
                progress.skip_rest = true;
                self.current = Some(progress);
                self.jump(row_key, decision)?;
            }
        }
        Ok(())
    }

    fn offer(&mut self, cell: Cell) -> ScanResult<()> {
        let skip_rest = self.current.as_ref().map_or(true, |p| p.skip_rest);
        if skip_rest {
            return Ok(());
        }

        let decision = match self.filter.as_mut() {
            Some(filter) => filter.evaluate_cell(&cell)?,
            None => ScanDecision::Include,
        };
        match decision {
            ScanDecision::Include => {
                let cell = match self.filter.as_mut() {
                    Some(filter) => filter.transform_cell(cell)?,
                    None => cell,
                };
                self.metrics.cells_included += 1;
                if let Some(progress) = self.current.as_mut() {
                    progress.row.push(cell);
                }
            }
            ScanDecision::SkipCell => {}
            ScanDecision::StopScan => self.finish(StopReason::Filter),
            decision @ (ScanDecision::NextRow | ScanDecision::SeekTo(_)) => {
                if let Some(progress) = self.current.as_mut() {
                    progress.skip_rest = true;
                }
                self.jump(cell.row(), decision)?;
            }
        }
        Ok(())
    }

    /// Moves storage past the current row; seeks never go backwards.
    fn jump(&mut self, row_key: &[u8], decision: ScanDecision) -> ScanResult<()> {
        match decision {
            ScanDecision::SeekTo(hint) if hint.as_slice() > row_key => {
                self.metrics.seeks += 1;
                self.handle.seek(&hint)?;
            }
            _ => {
                self.metrics.next_row_skips += 1;
                self.handle.seek(&next_row_key(row_key))?;
            }
        }
        Ok(())
    }

    fn end_row(&mut self) -> ScanResult<Option<Row>> {
        let Some(progress) = self.current.take() else {
            return Ok(None);
        };
        self.state = CursorState::RowBoundary;

        let keep = match self.filter.as_mut() {
            _ if progress.rejected => false,
            Some(filter) => filter.evaluate_row_end(&progress.row)?.is_keep(),
            None => true,
        };
        if let Some(filter) = self.filter.as_mut() {
            filter.reset();
        }

        // a kept row with no cells left is not emitted either
        if !keep || progress.row.is_empty() {
            self.metrics.rows_dropped += 1;
            return Ok(None);
        }
        Ok(Some(self.emit(progress.row)))
    }

    fn emit(&mut self, row: Row) -> Row {
        self.metrics.rows_emitted += 1;
        self.last_row_key = Some(row.key().to_vec());
        if let Some(limit) = self.row_limit {
            if self.metrics.rows_emitted >= limit {
                self.finish(StopReason::RowLimit);
            }
        }
        row
    }

    fn filter_done(&self) -> bool {
        self.filter.as_ref().map_or(false, |f| f.filter_all_remaining())
    }

    fn release(&mut self) {
        self.state = CursorState::Stopped;
        self.parked = None;
        self.current = None;
        self.handle.close();
        if let Some(registry) = &self.registry {
            registry.add_cells_pulled(self.metrics.cells_pulled);
            registry.add_rows_emitted(self.metrics.rows_emitted);
        }
    }

    fn finish(&mut self, reason: StopReason) {
        if self.state == CursorState::Stopped {
            return;
        }
        self.release();

        let event = match reason {
            StopReason::Filter => Event::ScanStoppedByFilter,
            StopReason::Exhausted | StopReason::RowLimit => Event::ScanComplete,
        };
        if let Some(registry) = &self.registry {
            match event {
                Event::ScanStoppedByFilter => registry.increment_scans_stopped_by_filter(),
                _ => registry.increment_scans_completed(),
            }
        }
        if let Some(scope) = self.scope.take() {
            let cells = self.metrics.cells_pulled.to_string();
            let rows = self.metrics.rows_emitted.to_string();
            let last = self.last_row_key.as_deref().map(printable).unwrap_or_default();
            scope.complete(
                event,
                &[
                    ("cells_pulled", cells.as_str()),
                    ("last_row", last.as_str()),
                    ("reason", reason.as_str()),
                    ("rows_emitted", rows.as_str()),
                ],
            );
        }
    }

    fn fail(&mut self, err: &ScanError) {
        if self.state == CursorState::Stopped {
            return;
        }
        self.release();

        if let Some(registry) = &self.registry {
            registry.increment_scans_failed();
        }
        if let Some(scope) = self.scope.take() {
            scope.fail(Event::ScanFailed, &err.to_string());
        }
    }
}

impl<I: CellIterator> Drop for ScanCursor<I> {
    fn drop(&mut self) {
        if self.state != CursorState::Stopped {
            self.release();
            if let Some(registry) = &self.registry {
                registry.increment_scans_abandoned();
            }
            // scope drop logs SCAN_ABANDONED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{CompareOp, Comparator};
    use crate::filter::{FilterError, PageFilter, RowPrefixFilter, ValueFilter};
    use crate::storage::{StorageError, StorageResult};

    #[derive(Debug)]
    struct VecIter {
        cells: Vec<Cell>,
        position: usize,
        fail_at: Option<usize>,
        seeks: Vec<Vec<u8>>,
        closed: bool,
    }

    impl VecIter {
        fn new(cells: Vec<Cell>) -> Self {
            Self {
                cells,
                position: 0,
                fail_at: None,
                seeks: Vec::new(),
                closed: false,
            }
        }
    }

    impl CellIterator for VecIter {
        fn next_cell(&mut self) -> StorageResult<Option<Cell>> {
            if self.fail_at == Some(self.position) {
                return Err(StorageError::read_failed("injected"));
            }
            let cell = self.cells.get(self.position).cloned();
            self.position += 1;
            Ok(cell)
        }

        fn seek(&mut self, row_key: &[u8]) -> StorageResult<()> {
            self.seeks.push(row_key.to_vec());
            while self
                .cells
                .get(self.position)
                .map_or(false, |c| c.row() < row_key)
            {
                self.position += 1;
            }
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    fn rows(keys_and_names: &[(&str, &str)]) -> Vec<Cell> {
        let mut cells = Vec::new();
        for (key, name) in keys_and_names {
            cells.push(Cell::new(*key, "info", "age", "30", 1));
            cells.push(Cell::new(*key, "info", "name", *name, 1));
        }
        cells
    }

    fn drain<I: CellIterator>(cursor: &mut ScanCursor<I>) -> Vec<Row> {
        let mut out = Vec::new();
        while let Some(row) = cursor.next_row().unwrap() {
            out.push(row);
        }
        out
    }

    #[test]
    fn test_unfiltered_scan_groups_rows() {
        let iter = VecIter::new(rows(&[("1", "Jack"), ("2", "Mary")]));
        let mut cursor = ScanCursor::new(iter, None);
        assert_eq!(cursor.state(), CursorState::Init);

        let out = drain(&mut cursor);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].key(), b"2");
        assert_eq!(out[1].len(), 2);
        assert_eq!(cursor.state(), CursorState::Stopped);
        assert_eq!(cursor.metrics().cells_pulled, 4);
        assert_eq!(cursor.last_row_key(), Some(b"2".as_slice()));
    }

    #[test]
    fn test_value_filter_drops_empty_rows() {
        let filter = ValueFilter::new(CompareOp::Equal, Comparator::substring("J")).unwrap();
        let iter = VecIter::new(rows(&[("1", "Jack"), ("2", "Mary"), ("3", "John")]));
        let mut cursor = ScanCursor::new(iter, Some(filter.into()));

        let out = drain(&mut cursor);
        let keys: Vec<_> = out.iter().map(|r| r.key().to_vec()).collect();
        assert_eq!(keys, vec![b"1".to_vec(), b"3".to_vec()]);
        assert_eq!(out[0].len(), 1);
        assert_eq!(cursor.metrics().rows_dropped, 1);
    }

    #[test]
    fn test_page_filter_stops_after_one_extra_pull() {
        let iter = VecIter::new(rows(&[
            ("1", "a"),
            ("2", "b"),
            ("3", "c"),
            ("4", "d"),
            ("5", "e"),
        ]));
        let mut cursor = ScanCursor::new(iter, Some(PageFilter::new(2).into()));

        assert_eq!(drain(&mut cursor).len(), 2);
        assert_eq!(cursor.metrics().cells_pulled, 5);
    }

    #[test]
    fn test_prefix_seek_and_stop() {
        let mut cells = rows(&[("a1", "x"), ("b1", "y"), ("b2", "z"), ("c1", "w")]);
        cells.push(Cell::new("d1", "info", "name", "v", 1));
        let mut cursor = ScanCursor::new(
            VecIter::new(cells),
            Some(RowPrefixFilter::new("b").into()),
        );

        let out = drain(&mut cursor);
        assert_eq!(out.len(), 2);
        assert_eq!(cursor.metrics().seeks, 1);
        // stopped at c1, d1 never pulled
        assert_eq!(cursor.metrics().cells_pulled, 6);
    }

    #[test]
    fn test_row_limit() {
        let iter = VecIter::new(rows(&[("1", "a"), ("2", "b"), ("3", "c")]));
        let mut cursor = ScanCursor::new(iter, None).with_row_limit(Some(1));

        assert_eq!(drain(&mut cursor).len(), 1);
        assert_eq!(cursor.state(), CursorState::Stopped);
    }

    #[test]
    fn test_storage_error_stops_cursor() {
        let mut iter = VecIter::new(rows(&[("1", "a"), ("2", "b")]));
        iter.fail_at = Some(3);
        let mut cursor = ScanCursor::new(iter, None);

        assert_eq!(cursor.next_row().unwrap().unwrap().key(), b"1");
        let err = cursor.next_row().unwrap_err();
        assert!(matches!(err, ScanError::Storage(_)));
        assert_eq!(cursor.state(), CursorState::Stopped);
        assert!(cursor.next_row().unwrap().is_none());
    }

    #[derive(Debug)]
    struct SkipEverything;

    impl ScanFilter for SkipEverything {
        fn name(&self) -> &'static str {
            "SkipEverything"
        }

        fn evaluate_cell(&mut self, _cell: &Cell) -> crate::filter::FilterResult<ScanDecision> {
            Ok(ScanDecision::SkipCell)
        }
    }

    #[test]
    fn test_kept_row_without_cells_counts_as_dropped() {
        let iter = VecIter::new(rows(&[("1", "a"), ("2", "b")]));
        let mut cursor = ScanCursor::new(iter, Some(Filter::custom(SkipEverything)));

        assert!(drain(&mut cursor).is_empty());
        assert_eq!(cursor.metrics().rows_dropped, 2);
        assert_eq!(cursor.metrics().rows_emitted, 0);
    }

    #[derive(Debug)]
    struct FailOnRowEnd;

    impl ScanFilter for FailOnRowEnd {
        fn name(&self) -> &'static str {
            "FailOnRowEnd"
        }

        fn evaluate_row_end(&mut self, _row: &Row) -> crate::filter::FilterResult<crate::filter::RowDecision> {
            Err(FilterError::evaluation_failed("FailOnRowEnd", "no"))
        }
    }

    #[test]
    fn test_filter_error_stops_cursor() {
        let iter = VecIter::new(rows(&[("1", "a")]));
        let mut cursor = ScanCursor::new(iter, Some(Filter::custom(FailOnRowEnd)));

        let err = cursor.next_row().unwrap_err();
        assert!(matches!(err, ScanError::Filter(_)));
        assert_eq!(err.code(), Some("CFSCAN_FILTER_EVALUATION_FAILED"));
    }
}
