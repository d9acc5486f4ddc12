//! Value-based filters

use super::decision::{RowDecision, ScanDecision};
use super::errors::FilterResult;
use super::filter::ScanFilter;
use crate::comparator::{CompareOp, Comparator};
use crate::model::{Cell, Row};

/// Keeps cells whose value satisfies the comparison.
///
/// A row in which no cell was kept is dropped at row end.
#[derive(Debug, Clone)]
pub struct ValueFilter {
    op: CompareOp,
    comparator: Comparator,
    included_in_row: bool,
}

impl ValueFilter {
    /// Creates a value filter
    pub fn new(op: CompareOp, comparator: Comparator) -> FilterResult<Self> {
        comparator.check_op("ValueFilter", op)?;
        Ok(Self {
            op,
            comparator,
            included_in_row: false,
        })
    }
}

impl ScanFilter for ValueFilter {
    fn name(&self) -> &'static str {
        "ValueFilter"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        if self.comparator.matches(self.op, cell.value()) {
            self.included_in_row = true;
            Ok(ScanDecision::Include)
        } else {
            Ok(ScanDecision::SkipCell)
        }
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        if self.included_in_row {
            Ok(RowDecision::KeepRow)
        } else {
            Ok(RowDecision::DropRow)
        }
    }

    fn reset(&mut self) {
        self.included_in_row = false;
    }
}

/// Keeps or drops whole rows based on the value of one column.
///
/// Every cell of a row is kept; the decision is made at row end:
/// - column missing: dropped when `filter_if_missing`, kept otherwise
/// - column present: kept iff its value matches
///
/// With `latest_version_only` (the default) only the newest version of the
/// column is tested; otherwise any matching version keeps the row.
#[derive(Debug, Clone)]
pub struct SingleColumnValueFilter {
    family: Vec<u8>,
    qualifier: Vec<u8>,
    op: CompareOp,
    comparator: Comparator,
    filter_if_missing: bool,
    latest_version_only: bool,
    found_column: bool,
    matched_column: bool,
}

impl SingleColumnValueFilter {
    /// Creates the filter with `filter_if_missing = false`
    pub fn new(
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        op: CompareOp,
        comparator: Comparator,
    ) -> FilterResult<Self> {
        comparator.check_op("SingleColumnValueFilter", op)?;
        Ok(Self {
            family: family.into(),
            qualifier: qualifier.into(),
            op,
            comparator,
            filter_if_missing: false,
            latest_version_only: true,
            found_column: false,
            matched_column: false,
        })
    }

    /// Drop rows that do not have the column at all
    pub fn filter_if_missing(mut self, filter_if_missing: bool) -> Self {
        self.filter_if_missing = filter_if_missing;
        self
    }

    /// Test only the newest version of the column
    pub fn latest_version_only(mut self, latest_version_only: bool) -> Self {
        self.latest_version_only = latest_version_only;
        self
    }
}

impl ScanFilter for SingleColumnValueFilter {
    fn name(&self) -> &'static str {
        "SingleColumnValueFilter"
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        if !cell.is_column(&self.family, &self.qualifier) {
            return Ok(ScanDecision::Include);
        }
        if self.matched_column || (self.latest_version_only && self.found_column) {
            return Ok(ScanDecision::Include);
        }
        self.found_column = true;
        self.matched_column = self.comparator.matches(self.op, cell.value());
        Ok(ScanDecision::Include)
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        let keep = if self.found_column {
            self.matched_column
        } else {
            !self.filter_if_missing
        };
        Ok(if keep {
            RowDecision::KeepRow
        } else {
            RowDecision::DropRow
        })
    }

    fn reset(&mut self) {
        self.found_column = false;
        self.matched_column = false;
    }
}
