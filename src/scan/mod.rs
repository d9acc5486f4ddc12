//! Scan execution
//!
//! `Scanner` opens a storage scan and wraps it in a `ScanCursor`, which
//! pulls cells in key order, consults the filter at every row key, cell and
//! row end, and assembles the surviving cells into rows. Callers consume
//! the rows through a lazy `RowStream`.
//!
//! # Guarantees
//!
//! - Rows come out in row-key order, each row's cells in cell order
//! - Storage is read only as far as the caller pulls
//! - Storage seeks never move backwards
//! - The storage handle is closed on completion, error and early drop
//! - Rows delivered before an error stay valid

mod cursor;
mod errors;
mod metrics;
mod scanner;
mod stream;

pub use cursor::{CursorState, ScanCursor};
pub use errors::{ScanError, ScanResult};
pub use metrics::ScanMetrics;
pub use scanner::Scanner;
pub use stream::RowStream;
