//! In-memory cell store
//!
//! An ordered map of tables, rows and cell versions. Every scan works on a
//! snapshot taken at `open_scan`, so writes made while a scan is open are
//! not visible to it.
//!
//! The snapshot is an eager copy: `open_scan` clones every cell the request
//! selects before the first pull, so opening a scan costs memory in
//! proportion to the range, not to what the caller ends up reading.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use crate::model::Cell;

use super::errors::{StorageError, StorageResult};
use super::source::{CellIterator, CellSource, ScanRequest};

type Table = BTreeMap<Vec<u8>, BTreeSet<Cell>>;

/// Reference store used by tests and embedders
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: BTreeMap<String, Table>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the table has been written to
    pub fn table_exists(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Writes one cell version, creating the table on first use.
    ///
    /// A cell with the same coordinates and timestamp replaces the old one.
    pub fn put(&mut self, table: &str, cell: Cell) {
        let versions = self
            .tables
            .entry(table.to_string())
            .or_default()
            .entry(cell.row().to_vec())
            .or_default();
        versions.retain(|existing| !existing.same_version(&cell));
        versions.insert(cell);
    }

    /// Removes whole rows; returns how many existed
    pub fn delete_rows<K: AsRef<[u8]>>(
        &mut self,
        table: &str,
        keys: impl IntoIterator<Item = K>,
    ) -> StorageResult<usize> {
        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StorageError::table_not_found(table))?;
        let mut removed = 0;
        for key in keys {
            let key: &[u8] = key.as_ref();
            if rows.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Returns the number of rows in a table
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |rows| rows.len())
    }

    /// Copies every selected cell of the range, in scan order.
    fn snapshot(&self, request: &ScanRequest) -> StorageResult<Vec<Cell>> {
        let rows = self
            .tables
            .get(&request.table)
            .ok_or_else(|| StorageError::table_not_found(&request.table))?;

        let start = request.range.start();
        let mut cells = Vec::new();
        for (key, versions) in rows.range::<[u8], _>((Bound::Included(start), Bound::Unbounded)) {
            if request.range.is_past(key) {
                break;
            }
            let mut last: Option<&Cell> = None;
            let mut kept = 0;
            for cell in versions {
                if !request.columns.selects(cell.family(), cell.qualifier()) {
                    continue;
                }
                // versions of one column are adjacent, newest first
                match last {
                    Some(prev) if prev.is_column(cell.family(), cell.qualifier()) => kept += 1,
                    _ => kept = 1,
                }
                last = Some(cell);
                if kept <= request.max_versions {
                    cells.push(cell.clone());
                }
            }
        }
        Ok(cells)
    }
}

impl CellSource for MemoryStore {
    type Iter = MemoryScanIter;

    fn open_scan(&self, request: &ScanRequest) -> StorageResult<MemoryScanIter> {
        Ok(MemoryScanIter {
            cells: self.snapshot(request)?,
            position: 0,
            closed: false,
        })
    }
}

/// Cursor over a scan snapshot; owns its copied cells until closed
#[derive(Debug)]
pub struct MemoryScanIter {
    cells: Vec<Cell>,
    position: usize,
    closed: bool,
}

impl MemoryScanIter {
    /// Returns whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl CellIterator for MemoryScanIter {
    fn next_cell(&mut self) -> StorageResult<Option<Cell>> {
        if self.closed {
            return Err(StorageError::handle_closed());
        }
        let cell = self.cells.get(self.position).cloned();
        if cell.is_some() {
            self.position += 1;
        }
        Ok(cell)
    }

    fn seek(&mut self, row_key: &[u8]) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::handle_closed());
        }
        let remaining = &self.cells[self.position..];
        self.position += remaining.partition_point(|cell| cell.row() < row_key);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        self.cells = Vec::new();
        self.position = 0;
    }
}
