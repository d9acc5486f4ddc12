//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Counters shared across scans
//! - Scan lifecycle tracing
//!
//! # Principles
//!
//! 1. Observability is read-only: it never changes scan results
//! 2. No async or background threads
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use cfscan::observability::{Event, Logger, MetricsRegistry, ObservationScope};
//!
//! Logger::event(Event::FilterRejected, &[("reason", "empty range list")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_scans_opened();
//!
//! let scope = ObservationScope::new(Event::ScanOpen, Event::ScanAbandoned, vec![]);
//! scope.complete(Event::ScanComplete, &[]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;
