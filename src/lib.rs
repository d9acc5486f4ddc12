//! cfscan - scan filter evaluation for a column-family store
//!
//! Filters run next to the data: a scan cursor pulls cells from storage in
//! key order, asks the filter about every row key, cell and finished row,
//! and hands only the surviving rows to the caller.
//!
//! ```ignore
//! use cfscan::comparator::{CompareOp, Comparator};
//! use cfscan::filter::{FilterList, PageFilter, ValueFilter};
//! use cfscan::model::{Cell, ColumnSelector, KeyRange};
//! use cfscan::scan::Scanner;
//! use cfscan::storage::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! store.put("user", Cell::new("10001", "info", "name", "Jack", 1));
//!
//! let filter = FilterList::all(vec![
//!     ValueFilter::new(CompareOp::Equal, Comparator::substring("J"))?.into(),
//!     PageFilter::new(2).into(),
//! ]);
//! let scanner = Scanner::new(&store);
//! for row in scanner.scan("user", KeyRange::all(), Some(filter.into()), ColumnSelector::all())? {
//!     println!("{:?}", row?);
//! }
//! ```

pub mod comparator;
pub mod config;
pub mod filter;
pub mod model;
pub mod observability;
pub mod scan;
pub mod storage;
