//! The `ScanFilter` contract and the `Filter` sum type

use std::fmt;

use super::column::{
    ColumnFamilyFilter, ColumnPrefixFilter, ColumnRangeFilter, KeyOnlyFilter,
    MultiColumnPrefixFilter, QualifierFilter,
};
use super::decision::{RowDecision, ScanDecision};
use super::errors::FilterResult;
use super::fuzzy::FuzzyRowFilter;
use super::list::FilterList;
use super::range::RowRangeFilter;
use super::row::{PageFilter, RandomSampleFilter, RowFilter, RowPrefixFilter};
use super::value::{SingleColumnValueFilter, ValueFilter};
use crate::model::{Cell, Row};

/// Evaluation hooks every filter implements.
///
/// All hooks have permissive defaults, so a variant overrides only the
/// stages it cares about. An `Err` from any hook aborts the scan.
pub trait ScanFilter: fmt::Debug + Send {
    /// Name used in errors and logs
    fn name(&self) -> &'static str;

    /// Offered once per row, before its first cell.
    ///
    /// Anything other than `Include` rejects the whole row, and
    /// `evaluate_row_end` is not called for it.
    fn evaluate_row_key(&mut self, _row_key: &[u8]) -> FilterResult<ScanDecision> {
        Ok(ScanDecision::Include)
    }

    /// Offered every cell of an accepted row
    fn evaluate_cell(&mut self, _cell: &Cell) -> FilterResult<ScanDecision> {
        Ok(ScanDecision::Include)
    }

    /// Rewrites an included cell before it is buffered
    fn transform_cell(&mut self, cell: Cell) -> FilterResult<Cell> {
        Ok(cell)
    }

    /// Row-level verdict once every cell was offered
    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        Ok(RowDecision::KeepRow)
    }

    /// Polled after each row; `true` ends the scan without pulling more cells
    fn filter_all_remaining(&self) -> bool {
        false
    }

    /// Clears per-row state; called at every row boundary
    fn reset(&mut self) {}
}

/// Every filter the engine knows, plus embedder-defined ones.
#[derive(Debug)]
pub enum Filter {
    Value(ValueFilter),
    SingleColumnValue(SingleColumnValueFilter),
    Page(PageFilter),
    RandomSample(RandomSampleFilter),
    Row(RowFilter),
    RowPrefix(RowPrefixFilter),
    RowRange(RowRangeFilter),
    FuzzyRow(FuzzyRowFilter),
    ColumnFamily(ColumnFamilyFilter),
    Qualifier(QualifierFilter),
    ColumnPrefix(ColumnPrefixFilter),
    MultiColumnPrefix(MultiColumnPrefixFilter),
    ColumnRange(ColumnRangeFilter),
    KeyOnly(KeyOnlyFilter),
    List(FilterList),
    Custom(Box<dyn ScanFilter>),
}

impl Filter {
    /// Wraps an embedder-defined filter
    pub fn custom(filter: impl ScanFilter + 'static) -> Self {
        Filter::Custom(Box::new(filter))
    }

    fn inner(&self) -> &dyn ScanFilter {
        match self {
            Filter::Value(f) => f,
            Filter::SingleColumnValue(f) => f,
            Filter::Page(f) => f,
            Filter::RandomSample(f) => f,
            Filter::Row(f) => f,
            Filter::RowPrefix(f) => f,
            Filter::RowRange(f) => f,
            Filter::FuzzyRow(f) => f,
            Filter::ColumnFamily(f) => f,
            Filter::Qualifier(f) => f,
            Filter::ColumnPrefix(f) => f,
            Filter::MultiColumnPrefix(f) => f,
            Filter::ColumnRange(f) => f,
            Filter::KeyOnly(f) => f,
            Filter::List(f) => f,
            Filter::Custom(f) => &**f,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ScanFilter {
        match self {
            Filter::Value(f) => f,
            Filter::SingleColumnValue(f) => f,
            Filter::Page(f) => f,
            Filter::RandomSample(f) => f,
            Filter::Row(f) => f,
            Filter::RowPrefix(f) => f,
            Filter::RowRange(f) => f,
            Filter::FuzzyRow(f) => f,
            Filter::ColumnFamily(f) => f,
            Filter::Qualifier(f) => f,
            Filter::ColumnPrefix(f) => f,
            Filter::MultiColumnPrefix(f) => f,
            Filter::ColumnRange(f) => f,
            Filter::KeyOnly(f) => f,
            Filter::List(f) => f,
            Filter::Custom(f) => &mut **f,
        }
    }
}

impl ScanFilter for Filter {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn evaluate_row_key(&mut self, row_key: &[u8]) -> FilterResult<ScanDecision> {
        self.inner_mut().evaluate_row_key(row_key)
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        self.inner_mut().evaluate_cell(cell)
    }

    fn transform_cell(&mut self, cell: Cell) -> FilterResult<Cell> {
        self.inner_mut().transform_cell(cell)
    }

    fn evaluate_row_end(&mut self, row: &Row) -> FilterResult<RowDecision> {
        self.inner_mut().evaluate_row_end(row)
    }

    fn filter_all_remaining(&self) -> bool {
        self.inner().filter_all_remaining()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }
}

macro_rules! impl_from_filter {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Filter {
                fn from(filter: $ty) -> Self {
                    Filter::$variant(filter)
                }
            }
        )*
    };
}

impl_from_filter! {
    Value => ValueFilter,
    SingleColumnValue => SingleColumnValueFilter,
    Page => PageFilter,
    RandomSample => RandomSampleFilter,
    Row => RowFilter,
    RowPrefix => RowPrefixFilter,
    RowRange => RowRangeFilter,
    FuzzyRow => FuzzyRowFilter,
    ColumnFamily => ColumnFamilyFilter,
    Qualifier => QualifierFilter,
    ColumnPrefix => ColumnPrefixFilter,
    MultiColumnPrefix => MultiColumnPrefixFilter,
    ColumnRange => ColumnRangeFilter,
    KeyOnly => KeyOnlyFilter,
    List => FilterList,
}
