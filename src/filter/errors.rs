//! Filter error types
//!
//! Error codes:
//! - CFSCAN_FILTER_CONFIG_INVALID (REJECT) - raised at construction, never mid-scan
//! - CFSCAN_FILTER_EVALUATION_FAILED (ERROR) - aborts the running scan

use std::fmt;

/// Severity levels for filter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected before any cell is read
    Reject,
    /// The running scan fails, the engine stays healthy
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Filter-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterErrorCode {
    /// Invalid construction arguments
    ConfigInvalid,
    /// A filter failed while evaluating a cell or row
    EvaluationFailed,
}

impl FilterErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            FilterErrorCode::ConfigInvalid => "CFSCAN_FILTER_CONFIG_INVALID",
            FilterErrorCode::EvaluationFailed => "CFSCAN_FILTER_EVALUATION_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            FilterErrorCode::ConfigInvalid => Severity::Reject,
            FilterErrorCode::EvaluationFailed => Severity::Error,
        }
    }
}

impl fmt::Display for FilterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Filter error with the offending filter's name
#[derive(Debug, Clone)]
pub struct FilterError {
    code: FilterErrorCode,
    filter: &'static str,
    message: String,
}

impl FilterError {
    /// Invalid filter construction arguments
    pub fn invalid_config(filter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            code: FilterErrorCode::ConfigInvalid,
            filter,
            message: reason.into(),
        }
    }

    /// Failure during evaluation
    pub fn evaluation_failed(filter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            code: FilterErrorCode::EvaluationFailed,
            filter,
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> FilterErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the name of the filter that raised the error
    pub fn filter(&self) -> &'static str {
        self.filter
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true for construction-time errors
    pub fn is_config(&self) -> bool {
        self.code == FilterErrorCode::ConfigInvalid
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}: {}",
            self.code.severity(),
            self.code.code(),
            self.filter,
            self.message
        )
    }
}

impl std::error::Error for FilterError {}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
