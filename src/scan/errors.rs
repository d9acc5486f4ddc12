//! Scan errors
//!
//! Lower-level subsystem errors pass through unchanged, so callers can
//! still match on their codes.

use thiserror::Error;

use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::storage::StorageError;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Anything that ends a scan with an error
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ScanError {
    /// Returns the stable error code, if the source carries one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ScanError::Storage(e) => Some(e.code().code()),
            ScanError::Filter(e) => Some(e.code().code()),
            ScanError::Config(_) => None,
        }
    }
}
