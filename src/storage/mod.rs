//! Storage collaborator for the scan engine
//!
//! The cursor only ever talks to storage through `CellSource` and
//! `CellIterator`: open a scan, pull cells in key order, seek forward,
//! close. `MemoryStore` is an ordered in-memory implementation of that
//! contract.
//!
//! # Handle lifecycle
//!
//! An open iterator is wrapped in a `ScanHandle`, which closes it on
//! completion, on error and on early drop.

mod errors;
mod memory;
mod source;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use memory::{MemoryScanIter, MemoryStore};
pub use source::{CellIterator, CellSource, ScanHandle, ScanRequest};
