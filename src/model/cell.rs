//! Cell: the unit produced by storage and inspected by filters

use std::cmp::Ordering;
use std::fmt;

use super::bytes::printable;

/// One versioned value at (row, family, qualifier, timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    row: Vec<u8>,
    family: Vec<u8>,
    qualifier: Vec<u8>,
    value: Vec<u8>,
    timestamp: i64,
}

impl Cell {
    /// Creates a new cell
    pub fn new(
        row: impl Into<Vec<u8>>,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        timestamp: i64,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
            timestamp,
        }
    }

    /// Returns the row key
    pub fn row(&self) -> &[u8] {
        &self.row
    }

    /// Returns the column family
    pub fn family(&self) -> &[u8] {
        &self.family
    }

    /// Returns the column qualifier
    pub fn qualifier(&self) -> &[u8] {
        &self.qualifier
    }

    /// Returns the cell value
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns the version timestamp
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns true if this cell belongs to the given column
    pub fn is_column(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.family == family && self.qualifier == qualifier
    }

    /// Returns true if both cells address the same version of the same column.
    pub fn same_version(&self, other: &Cell) -> bool {
        self.row == other.row
            && self.family == other.family
            && self.qualifier == other.qualifier
            && self.timestamp == other.timestamp
    }

    /// Returns a copy of this cell carrying a different value.
    ///
    /// Cells are never mutated in place; transforms produce new cells.
    pub fn with_value(&self, value: impl Into<Vec<u8>>) -> Cell {
        Cell {
            row: self.row.clone(),
            family: self.family.clone(),
            qualifier: self.qualifier.clone(),
            value: value.into(),
            timestamp: self.timestamp,
        }
    }

    /// Compares the coordinates of two cells, ignoring the value.
    pub fn cmp_coordinates(&self, other: &Cell) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.family.cmp(&other.family))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
            // newest version first
            .then_with(|| other.timestamp.cmp(&self.timestamp))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_coordinates(other)
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rowKey: {}, columnFamily: {}, column: {}, value: {}, timestamp: {}",
            printable(&self.row),
            printable(&self.family),
            printable(&self.qualifier),
            printable(&self.value),
            self.timestamp
        )
    }
}
