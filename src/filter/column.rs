//! Column-level filters
//!
//! These decide per cell (SKIP_CELL on failure). A row in which none of its
//! cells passed is dropped at row end. `KeyOnlyFilter` rewrites values
//! instead of rejecting.

use std::collections::BTreeSet;

use super::decision::{RowDecision, ScanDecision};
use super::errors::{FilterError, FilterResult};
use super::filter::ScanFilter;
use crate::comparator::{CompareOp, Comparator};
use crate::model::{Cell, Row};

fn include_if(keep: bool, included_in_row: &mut bool) -> FilterResult<ScanDecision> {
    if keep {
        *included_in_row = true;
        Ok(ScanDecision::Include)
    } else {
        Ok(ScanDecision::SkipCell)
    }
}

fn keep_if_included(included_in_row: bool) -> FilterResult<RowDecision> {
    Ok(if included_in_row {
        RowDecision::KeepRow
    } else {
        RowDecision::DropRow
    })
}

/// Compares the column family
#[derive(Debug, Clone)]
pub struct ColumnFamilyFilter {
    op: CompareOp,
    comparator: Comparator,
    included_in_row: bool,
}

impl ColumnFamilyFilter {
    /// Creates a family filter
    pub fn new(op: CompareOp, comparator: Comparator) -> FilterResult<Self> {
        comparator.check_op("ColumnFamilyFilter", op)?;
        Ok(Self {
            op,
            comparator,
            included_in_row: false,
        })
    }
}

impl ScanFilter for ColumnFamilyFilter {
    fn name(&self) -> &'static str {
        "ColumnFamilyFilter"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        include_if(self.comparator.matches(self.op, cell.family()), &mut self.included_in_row)
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        keep_if_included(self.included_in_row)
    }

    fn reset(&mut self) {
        self.included_in_row = false;
    }
}

/// Compares the column qualifier
#[derive(Debug, Clone)]
pub struct QualifierFilter {
    op: CompareOp,
    comparator: Comparator,
    included_in_row: bool,
}

impl QualifierFilter {
    /// Creates a qualifier filter
    pub fn new(op: CompareOp, comparator: Comparator) -> FilterResult<Self> {
        comparator.check_op("QualifierFilter", op)?;
        Ok(Self {
            op,
            comparator,
            included_in_row: false,
        })
    }
}

impl ScanFilter for QualifierFilter {
    fn name(&self) -> &'static str {
        "QualifierFilter"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        include_if(self.comparator.matches(self.op, cell.qualifier()), &mut self.included_in_row)
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        keep_if_included(self.included_in_row)
    }

    fn reset(&mut self) {
        self.included_in_row = false;
    }
}

/// Keeps cells whose qualifier starts with a prefix
#[derive(Debug, Clone)]
pub struct ColumnPrefixFilter {
    prefix: Vec<u8>,
    included_in_row: bool,
}

impl ColumnPrefixFilter {
    /// Creates a column prefix filter
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            included_in_row: false,
        }
    }
}

impl ScanFilter for ColumnPrefixFilter {
    fn name(&self) -> &'static str {
        "ColumnPrefixFilter"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        include_if(cell.qualifier().starts_with(&self.prefix), &mut self.included_in_row)
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        keep_if_included(self.included_in_row)
    }

    fn reset(&mut self) {
        self.included_in_row = false;
    }
}

/// Keeps cells whose qualifier starts with any of several prefixes
#[derive(Debug, Clone)]
pub struct MultiColumnPrefixFilter {
    prefixes: BTreeSet<Vec<u8>>,
    included_in_row: bool,
}

impl MultiColumnPrefixFilter {
    /// Creates the filter; duplicate prefixes collapse
    pub fn new<P: Into<Vec<u8>>>(prefixes: impl IntoIterator<Item = P>) -> FilterResult<Self> {
        let prefixes: BTreeSet<Vec<u8>> = prefixes.into_iter().map(Into::into).collect();
        if prefixes.is_empty() {
            return Err(FilterError::invalid_config(
                "MultiColumnPrefixFilter",
                "at least one prefix is required",
            ));
        }
        Ok(Self {
            prefixes,
            included_in_row: false,
        })
    }
}

impl ScanFilter for MultiColumnPrefixFilter {
    fn name(&self) -> &'static str {
        "MultiColumnPrefixFilter"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        let qualifier = cell.qualifier();
        // the only candidate prefixes sort at or below the qualifier
        let hit = self
            .prefixes
            .range(..=qualifier.to_vec())
            .any(|p| qualifier.starts_with(p));
        include_if(hit, &mut self.included_in_row)
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        keep_if_included(self.included_in_row)
    }

    fn reset(&mut self) {
        self.included_in_row = false;
    }
}

/// Keeps cells whose qualifier lies between two bounds.
///
/// An empty bound is unbounded on that side.
#[derive(Debug, Clone)]
pub struct ColumnRangeFilter {
    min: Vec<u8>,
    min_inclusive: bool,
    max: Vec<u8>,
    max_inclusive: bool,
    included_in_row: bool,
}

impl ColumnRangeFilter {
    /// Creates a column range filter
    pub fn new(
        min: impl Into<Vec<u8>>,
        min_inclusive: bool,
        max: impl Into<Vec<u8>>,
        max_inclusive: bool,
    ) -> FilterResult<Self> {
        let (min, max) = (min.into(), max.into());
        if !min.is_empty() && !max.is_empty() {
            if min > max || (min == max && !(min_inclusive && max_inclusive)) {
                return Err(FilterError::invalid_config(
                    "ColumnRangeFilter",
                    "column range contains no qualifiers",
                ));
            }
        }
        Ok(Self {
            min,
            min_inclusive,
            max,
            max_inclusive,
            included_in_row: false,
        })
    }

    fn contains(&self, qualifier: &[u8]) -> bool {
        let above_min = self.min.is_empty()
            || qualifier > self.min.as_slice()
            || (self.min_inclusive && qualifier == self.min.as_slice());
        let below_max = self.max.is_empty()
            || qualifier < self.max.as_slice()
            || (self.max_inclusive && qualifier == self.max.as_slice());
        above_min && below_max
    }
}

impl ScanFilter for ColumnRangeFilter {
    fn name(&self) -> &'static str {
        "ColumnRangeFilter"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        include_if(self.contains(cell.qualifier()), &mut self.included_in_row)
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        keep_if_included(self.included_in_row)
    }

    fn reset(&mut self) {
        self.included_in_row = false;
    }
}

/// Returns keys only: every cell is kept but its value is stripped.
///
/// With `len_as_value` the value becomes its original length as a 4-byte
/// big-endian integer.
#[derive(Debug, Clone, Default)]
pub struct KeyOnlyFilter {
    len_as_value: bool,
}

impl KeyOnlyFilter {
    /// Strips values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces values by their length
    pub fn len_as_value() -> Self {
        Self { len_as_value: true }
    }
}

impl ScanFilter for KeyOnlyFilter {
    fn name(&self) -> &'static str {
        "KeyOnlyFilter"
    }

    fn transform_cell(&mut self, cell: Cell) -> FilterResult<Cell> {
        if self.len_as_value {
            let len = u32::try_from(cell.value().len()).map_err(|_| {
                FilterError::evaluation_failed("KeyOnlyFilter", "value length exceeds u32")
            })?;
            Ok(cell.with_value(len.to_be_bytes().to_vec()))
        } else {
            Ok(cell.with_value(Vec::new()))
        }
    }
}
