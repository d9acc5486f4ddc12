//! Scan filter subsystem
//!
//! Filters are evaluated by the scan cursor at three points of every row:
//!
//! 1. `evaluate_row_key` once, before the first cell of the row
//! 2. `evaluate_cell` for every cell, in cell order
//! 3. `evaluate_row_end` once all cells of the row have been offered
//!
//! Each answer is a `ScanDecision` (or a `RowDecision` at row end) that the
//! cursor obeys: keep the cell, drop it, skip to the next row, seek forward,
//! or stop the scan.
//!
//! # Lifecycle
//!
//! Filters hold per-scan state (page counters, matched flags). A filter is
//! built fresh for every scan and never shared between scans. `FilterSpec`
//! is the serializable description that gets turned into fresh instances.
//!
//! # Composition
//!
//! `FilterList` combines filters with ALL / ONE semantics. Evaluation order
//! is part of the contract: reordering children can change results.

mod column;
mod decision;
mod errors;
mod filter;
mod fuzzy;
mod list;
mod range;
mod row;
mod spec;
mod value;

pub use column::{
    ColumnFamilyFilter, ColumnPrefixFilter, ColumnRangeFilter, KeyOnlyFilter,
    MultiColumnPrefixFilter, QualifierFilter,
};
pub use decision::{RowDecision, ScanDecision};
pub use errors::{FilterError, FilterErrorCode, FilterResult, Severity};
pub use filter::{Filter, ScanFilter};
pub use fuzzy::{FuzzyPattern, FuzzyRowFilter};
pub use list::{FilterList, Operator};
pub use range::{RowRange, RowRangeFilter};
pub use row::{PageFilter, RandomSampleFilter, RowFilter, RowPrefixFilter};
pub use spec::{ComparatorSpec, FilterSpec, FuzzyPatternSpec, RowRangeSpec, SpecBytes};
pub use value::{SingleColumnValueFilter, ValueFilter};
