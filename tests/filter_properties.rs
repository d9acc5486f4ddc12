//! Filter Semantics Tests
//!
//! End-to-end filter behavior through the scan cursor:
//! - ALL lists stop on the first STOP_SCAN
//! - List evaluation order changes results
//! - Missing-column handling of SingleColumnValueFilter
//! - Row sampling bounds and reproducibility
//! - Row-range and column-range boundaries
//! - Page limits pull at most one cell past the last row
//! - ONE lists: row-key filters combined with content filters

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cfscan::comparator::{CompareOp, Comparator};
use cfscan::filter::{
    ColumnRangeFilter, Filter, FilterList, FilterResult, PageFilter, QualifierFilter,
    RandomSampleFilter, RowFilter, RowPrefixFilter, RowRange, RowRangeFilter, ScanDecision,
    ScanFilter, SingleColumnValueFilter, ValueFilter,
};
use cfscan::model::{Cell, ColumnSelector, KeyRange, Row};
use cfscan::scan::{ScanResult, Scanner};
use cfscan::config::ScanConfig;
use cfscan::storage::{CellIterator, CellSource, ScanRequest, StorageResult};

// =============================================================================
// Test Utilities
// =============================================================================

#[derive(Debug, Default)]
struct Counters {
    pulls: AtomicUsize,
    closes: AtomicUsize,
    seeks: Mutex<Vec<Vec<u8>>>,
}

/// Storage stub that counts every cell handed out
struct CountingStore {
    cells: Vec<Cell>,
    counters: Arc<Counters>,
}

impl CountingStore {
    fn new(mut cells: Vec<Cell>) -> Self {
        cells.sort();
        Self {
            cells,
            counters: Arc::new(Counters::default()),
        }
    }

    fn pulls(&self) -> usize {
        self.counters.pulls.load(Ordering::SeqCst)
    }

    fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct CountingIter {
    cells: Vec<Cell>,
    position: usize,
    counters: Arc<Counters>,
}

impl CellSource for CountingStore {
    type Iter = CountingIter;

    fn open_scan(&self, request: &ScanRequest) -> StorageResult<CountingIter> {
        let cells = self
            .cells
            .iter()
            .filter(|c| request.range.contains(c.row()))
            .filter(|c| request.columns.selects(c.family(), c.qualifier()))
            .cloned()
            .collect();
        Ok(CountingIter {
            cells,
            position: 0,
            counters: Arc::clone(&self.counters),
        })
    }
}

impl CellIterator for CountingIter {
    fn next_cell(&mut self) -> StorageResult<Option<Cell>> {
        let cell = self.cells.get(self.position).cloned();
        if cell.is_some() {
            self.position += 1;
            self.counters.pulls.fetch_add(1, Ordering::SeqCst);
        }
        Ok(cell)
    }

    fn seek(&mut self, row_key: &[u8]) -> StorageResult<()> {
        self.counters.seeks.lock().unwrap().push(row_key.to_vec());
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
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Five users; names containing "J" sit on rows 1, 3 and 5
fn user_cells() -> Vec<Cell> {
    let users = [
        ("10001", "Jack", Some("jack@example.com")),
        ("10002", "Mary", None),
        ("10003", "John", Some("john@example.com")),
        ("10004", "Lucy", None),
        ("10005", "Jill", Some("jill@example.com")),
    ];
    let mut cells = Vec::new();
    for (row, name, email) in users {
        cells.push(Cell::new(row, "info", "age", "30", 1));
        cells.push(Cell::new(row, "info", "name", name, 1));
        if let Some(email) = email {
            cells.push(Cell::new(row, "contact", "email", email, 1));
        }
    }
    cells
}

fn scan_keys(store: &CountingStore, filter: impl Into<Filter>) -> Vec<String> {
    scan_rows(store, filter)
        .iter()
        .map(|r| String::from_utf8_lossy(r.key()).into_owned())
        .collect()
}

fn scan_rows(store: &CountingStore, filter: impl Into<Filter>) -> Vec<Row> {
    let scanner = Scanner::with_config(store, ScanConfig::quiet()).unwrap();
    scanner
        .scan("user", KeyRange::all(), Some(filter.into()), ColumnSelector::all())
        .unwrap()
        .collect::<ScanResult<Vec<_>>>()
        .unwrap()
}

fn has_j() -> ValueFilter {
    ValueFilter::new(CompareOp::Equal, Comparator::substring("J")).unwrap()
}

/// Stops the scan when it sees a given value
#[derive(Debug)]
struct StopAtValue(&'static str);

impl ScanFilter for StopAtValue {
    fn name(&self) -> &'static str {
        "StopAtValue"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        if cell.value() == self.0.as_bytes() {
            Ok(ScanDecision::StopScan)
        } else {
            Ok(ScanDecision::Include)
        }
    }
}

// =============================================================================
// ALL Lists Halt On STOP_SCAN
// =============================================================================

#[test]
fn test_all_list_stop_from_row_key_child() {
    let store = CountingStore::new(user_cells());
    let range = RowRange::new("10001", true, "10003", false).unwrap();
    let filter = FilterList::all(vec![
        ValueFilter::new(CompareOp::NotEqual, Comparator::binary("")).unwrap().into(),
        RowRangeFilter::new(vec![range]).unwrap().into(),
    ]);

    assert_eq!(scan_keys(&store, filter), vec!["10001", "10002"]);
    // rows 1 and 2 hold 5 cells; the first cell of row 3 reveals the stop
    assert_eq!(store.pulls(), 6);
    assert_eq!(store.closes(), 1);
}

#[test]
fn test_all_list_stop_mid_row_discards_partial_row() {
    let store = CountingStore::new(user_cells());
    let filter = FilterList::all(vec![Filter::custom(StopAtValue("John"))]);

    let keys = scan_keys(&store, filter);
    assert_eq!(keys, vec!["10001", "10002"]);
}

// =============================================================================
// List Order Sensitivity
// =============================================================================

#[test]
fn test_page_before_value_counts_rejected_rows() {
    let store = CountingStore::new(user_cells());
    let filter = FilterList::all(vec![PageFilter::new(2).into(), has_j().into()]);

    assert_eq!(scan_keys(&store, filter), vec!["10001"]);
}

#[test]
fn test_value_before_page_counts_matching_rows() {
    let store = CountingStore::new(user_cells());
    let filter = FilterList::all(vec![has_j().into(), PageFilter::new(2).into()]);

    assert_eq!(scan_keys(&store, filter), vec!["10001", "10003"]);
}

#[test]
fn test_page_after_column_filter_counts_rows_with_cells() {
    let store = CountingStore::new(user_cells());
    let email = QualifierFilter::new(CompareOp::Equal, Comparator::binary("email")).unwrap();
    let filter = FilterList::all(vec![email.into(), PageFilter::new(2).into()]);

    let rows = scan_rows(&store, filter);
    let keys: Vec<_> = rows.iter().map(|r| r.key().to_vec()).collect();
    assert_eq!(keys, vec![b"10001".to_vec(), b"10003".to_vec()]);
    assert!(rows.iter().all(|r| r.len() == 1));
}

#[test]
fn test_page_before_column_filter_counts_every_row() {
    let store = CountingStore::new(user_cells());
    let email = QualifierFilter::new(CompareOp::Equal, Comparator::binary("email")).unwrap();
    let filter = FilterList::all(vec![PageFilter::new(2).into(), email.into()]);

    // row 10002 has no email but still uses up the page
    assert_eq!(scan_keys(&store, filter), vec!["10001"]);
}

// =============================================================================
// SingleColumnValueFilter Missing Columns
// =============================================================================

fn email_filter(filter_if_missing: bool) -> SingleColumnValueFilter {
    SingleColumnValueFilter::new(
        "contact",
        "email",
        CompareOp::Equal,
        Comparator::regex(r"@example\.com$").unwrap(),
    )
    .unwrap()
    .filter_if_missing(filter_if_missing)
}

#[test]
fn test_filter_if_missing_drops_rows_without_column() {
    let store = CountingStore::new(user_cells());
    assert_eq!(
        scan_keys(&store, email_filter(true)),
        vec!["10001", "10003", "10005"]
    );
}

#[test]
fn test_missing_column_kept_by_default() {
    let store = CountingStore::new(user_cells());
    let rows = scan_rows(&store, email_filter(false));

    assert_eq!(rows.len(), 5);
    // whole rows come back, not just the tested column
    assert_eq!(rows[0].len(), 3);
}

#[test]
fn test_single_column_value_mismatch_drops_row() {
    let store = CountingStore::new(user_cells());
    let filter = SingleColumnValueFilter::new(
        "info",
        "name",
        CompareOp::Equal,
        Comparator::binary("Mary"),
    )
    .unwrap();

    assert_eq!(scan_keys(&store, filter), vec!["10002"]);
}

// =============================================================================
// Random Sampling
// =============================================================================

#[test]
fn test_sample_everything_and_nothing() {
    let store = CountingStore::new(user_cells());
    assert_eq!(
        scan_keys(&store, RandomSampleFilter::new(1.0).unwrap()).len(),
        5
    );
    assert!(scan_keys(&store, RandomSampleFilter::new(0.0).unwrap()).is_empty());
}

#[test]
fn test_seeded_sample_is_reproducible() {
    let store = CountingStore::new(user_cells());
    let first = scan_keys(&store, RandomSampleFilter::with_seed(0.5, 42).unwrap());
    let second = scan_keys(&store, RandomSampleFilter::with_seed(0.5, 42).unwrap());
    assert_eq!(first, second);
}

// =============================================================================
// Range Boundaries
// =============================================================================

#[test]
fn test_row_range_boundaries() {
    let keys = [
        "1001", "1002", "1003", "1004", "1005", "1005x", "1006", "1007", "1008",
    ];
    let cells = keys
        .iter()
        .map(|k| Cell::new(*k, "info", "name", "x", 1))
        .collect();
    let store = CountingStore::new(cells);

    let filter = RowRangeFilter::new(vec![
        RowRange::new("1001", true, "1003", false).unwrap(),
        RowRange::new("1005", false, "1007", true).unwrap(),
    ])
    .unwrap();

    assert_eq!(
        scan_keys(&store, filter),
        vec!["1001", "1002", "1005x", "1006", "1007"]
    );
    // 1003 seeks past 1004 to the start of the second range
    assert!(!store.counters.seeks.lock().unwrap().is_empty());
}

#[test]
fn test_column_range_boundaries() {
    let cells = vec![
        Cell::new("1001", "info", "age", "30", 1),
        Cell::new("1001", "info", "name", "Jack", 1),
        Cell::new("1001", "info", "zzz", "?", 1),
    ];
    let store = CountingStore::new(cells);
    let filter = ColumnRangeFilter::new("age", true, "name", true).unwrap();

    let rows = scan_rows(&store, filter);
    let qualifiers: Vec<_> = rows[0].cells().iter().map(|c| c.qualifier().to_vec()).collect();
    assert_eq!(qualifiers, vec![b"age".to_vec(), b"name".to_vec()]);
}

// =============================================================================
// Page Limits
// =============================================================================

#[test]
fn test_page_filter_pulls_one_cell_past_limit() {
    let store = CountingStore::new(user_cells());

    assert_eq!(scan_keys(&store, PageFilter::new(2)), vec!["10001", "10002"]);
    // row 1 has 3 cells, row 2 has 2, plus the first cell of row 3
    assert_eq!(store.pulls(), 6);
    assert_eq!(store.closes(), 1);
}

#[test]
fn test_page_filter_zero_reads_nothing() {
    let store = CountingStore::new(user_cells());

    assert!(scan_keys(&store, PageFilter::new(0)).is_empty());
    assert_eq!(store.pulls(), 0);
}

// =============================================================================
// OR Lists
// =============================================================================

fn row_lengths(rows: &[Row]) -> Vec<(String, usize)> {
    rows.iter()
        .map(|r| (String::from_utf8_lossy(r.key()).into_owned(), r.len()))
        .collect()
}

#[test]
fn test_or_with_row_filter_keeps_matching_row_and_matching_cells() {
    let store = CountingStore::new(user_cells());
    let row = RowFilter::new(CompareOp::Equal, Comparator::binary("10002")).unwrap();
    let filter = FilterList::one(vec![row.into(), has_j().into()]);

    let rows = scan_rows(&store, filter);
    // 10002 comes back whole; the J rows only carry their name cell
    assert_eq!(
        row_lengths(&rows),
        vec![
            ("10001".to_string(), 1),
            ("10002".to_string(), 2),
            ("10003".to_string(), 1),
            ("10005".to_string(), 1),
        ]
    );
}

#[test]
fn test_or_with_rejecting_sampler_defers_to_content_filter() {
    let store = CountingStore::new(user_cells());
    let filter = FilterList::one(vec![
        RandomSampleFilter::new(0.0).unwrap().into(),
        has_j().into(),
    ]);

    assert_eq!(scan_keys(&store, filter), vec!["10001", "10003", "10005"]);
}

#[test]
fn test_or_with_accepting_sampler_keeps_everything() {
    let store = CountingStore::new(user_cells());
    let filter = FilterList::one(vec![
        RandomSampleFilter::new(1.0).unwrap().into(),
        has_j().into(),
    ]);

    let rows = scan_rows(&store, filter);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1].len(), 2);
}

#[test]
fn test_or_stop_from_row_key_child_propagates() {
    let mut cells = user_cells();
    cells.push(Cell::new("20001", "info", "name", "Joe", 1));
    let store = CountingStore::new(cells);
    let filter = FilterList::one(vec![RowPrefixFilter::new("1000").into(), has_j().into()]);

    // Joe would match the value filter, but the prefix filter ends the scan
    assert_eq!(
        scan_keys(&store, filter),
        vec!["10001", "10002", "10003", "10004", "10005"]
    );
    // 13 user cells plus the first cell of 20001
    assert_eq!(store.pulls(), 14);
    assert_eq!(store.closes(), 1);
}

#[test]
fn test_or_stop_mid_row_depends_on_order() {
    let store = CountingStore::new(user_cells());
    let stop_first = FilterList::one(vec![Filter::custom(StopAtValue("John")), has_j().into()]);
    assert_eq!(scan_keys(&store, stop_first), vec!["10001", "10002"]);

    // an earlier INCLUDE for John's name cell means the stop is never asked for
    let store = CountingStore::new(user_cells());
    let stop_last = FilterList::one(vec![has_j().into(), Filter::custom(StopAtValue("John"))]);
    assert_eq!(scan_keys(&store, stop_last).len(), 5);
}
