//! Observable scan events
//!
//! Events are explicit and typed. Every log line the engine writes names
//! one of these.

use std::fmt;

use super::logger::Severity;

/// Observable events of the scan engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Scan configuration loaded
    ConfigLoaded,

    // Scan lifecycle
    /// Storage scan opened, cursor created
    ScanOpen,
    /// Storage exhausted or row limit reached
    ScanComplete,
    /// A filter ended the scan early
    ScanStoppedByFilter,
    /// Storage or filter error aborted the scan
    ScanFailed,
    /// The row stream was dropped before the scan finished
    ScanAbandoned,

    // Filter construction
    /// A filter description failed to build
    FilterRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ScanOpen => "SCAN_OPEN",
            Event::ScanComplete => "SCAN_COMPLETE",
            Event::ScanStoppedByFilter => "SCAN_STOPPED_BY_FILTER",
            Event::ScanFailed => "SCAN_FAILED",
            Event::ScanAbandoned => "SCAN_ABANDONED",
            Event::FilterRejected => "FILTER_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ScanFailed => Severity::Error,
            Event::ScanAbandoned | Event::FilterRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
