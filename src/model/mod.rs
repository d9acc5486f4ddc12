//! Data model shared by every scan subsystem
//!
//! A cell is addressed by (row, family, qualifier, timestamp). Cells sort by
//! row key ascending, then family, then qualifier, then timestamp descending,
//! so the newest version of a column is always seen first.
//!
//! # Invariants
//!
//! - Cells are immutable once produced by storage
//! - All cells of a `Row` share one row key
//! - Keys and values are opaque bytes

mod bytes;
mod cell;
mod range;
mod row;
mod selector;

pub use bytes::{next_row_key, printable};
pub use cell::Cell;
pub use range::KeyRange;
pub use row::Row;
pub use selector::ColumnSelector;
