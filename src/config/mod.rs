//! Scan configuration
//!
//! `ScanConfig` carries the defaults a `Scanner` applies to each scan it
//! opens: version count, row limit and whether scans are logged.

mod errors;
mod scan_config;

pub use errors::{ConfigError, ConfigResult};
pub use scan_config::ScanConfig;
