//! Storage error types
//!
//! Error codes:
//! - CFSCAN_STORAGE_READ_FAILED (ERROR severity)
//! - CFSCAN_STORAGE_TABLE_NOT_FOUND (ERROR severity)
//! - CFSCAN_STORAGE_HANDLE_CLOSED (ERROR severity)

use std::fmt;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The scan fails, the store stays usable
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// The iterator could not produce the next cell
    ReadFailed,
    /// The scanned table does not exist
    TableNotFound,
    /// A cell was requested from a closed scan handle
    HandleClosed,
}

impl StorageErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::ReadFailed => "CFSCAN_STORAGE_READ_FAILED",
            StorageErrorCode::TableNotFound => "CFSCAN_STORAGE_TABLE_NOT_FOUND",
            StorageErrorCode::HandleClosed => "CFSCAN_STORAGE_HANDLE_CLOSED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with its code and context
#[derive(Debug, Clone)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
}

impl StorageError {
    /// The storage could not deliver the next cell
    pub fn read_failed(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::ReadFailed,
            message: message.into(),
            details: None,
        }
    }

    /// The storage could not deliver a cell of the given row
    pub fn read_failed_at(row: &[u8], message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::ReadFailed,
            message: message.into(),
            details: Some(format!("row: {}", crate::model::printable(row))),
        }
    }

    /// The table does not exist
    pub fn table_not_found(table: &str) -> Self {
        Self {
            code: StorageErrorCode::TableNotFound,
            message: "table not found".to_string(),
            details: Some(format!("table: {}", table)),
        }
    }

    /// The scan handle was already closed
    pub fn handle_closed() -> Self {
        Self {
            code: StorageErrorCode::HandleClosed,
            message: "scan handle is closed".to_string(),
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
