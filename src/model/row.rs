//! Row: the cells of one row key, in cell order

use super::cell::Cell;

/// Assembled row delivered to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    key: Vec<u8>,
    cells: Vec<Cell>,
}

impl Row {
    /// Creates an empty row
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            cells: Vec::new(),
        }
    }

    /// Appends a cell. The cell must carry this row's key.
    pub fn push(&mut self, cell: Cell) {
        debug_assert_eq!(cell.row(), self.key.as_slice());
        self.cells.push(cell);
    }

    /// Returns the row key
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Returns the cells in storage order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Consumes the row, returning its cells
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Returns the number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the newest version of a column
    pub fn latest(&self, family: &[u8], qualifier: &[u8]) -> Option<&Cell> {
        self.cells.iter().find(|c| c.is_column(family, qualifier))
    }

    /// Returns the newest value of a column
    pub fn get_value(&self, family: &[u8], qualifier: &[u8]) -> Option<&[u8]> {
        self.latest(family, qualifier).map(|c| c.value())
    }
}
