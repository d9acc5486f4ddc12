//! Row-key ranges for scans
//!
//! A range is `[start, stop)` by default. An empty start means unbounded
//! below and an empty stop means unbounded above.

use super::bytes::next_row_key;

/// Row-key range handed to storage when opening a scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyRange {
    start: Vec<u8>,
    stop: Vec<u8>,
    stop_inclusive: bool,
}

impl KeyRange {
    /// The whole table
    pub fn all() -> Self {
        Self::default()
    }

    /// Half-open range `[start, stop)`
    pub fn new(start: impl Into<Vec<u8>>, stop: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            stop_inclusive: false,
        }
    }

    /// Closed range `[start, stop]`
    pub fn closed(start: impl Into<Vec<u8>>, stop: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            stop_inclusive: true,
        }
    }

    /// Exactly one row key
    pub fn single(row: impl Into<Vec<u8>>) -> Self {
        let row = row.into();
        Self::closed(row.clone(), row)
    }

    /// Everything after `key`, unbounded above
    pub fn starting_after(key: &[u8]) -> Self {
        Self {
            start: next_row_key(key),
            stop: Vec::new(),
            stop_inclusive: false,
        }
    }

    /// This range with its start moved past `key`.
    ///
    /// Used to resume a scan from a stream checkpoint.
    pub fn resume_after(&self, key: &[u8]) -> Self {
        let resumed = next_row_key(key);
        Self {
            start: if resumed > self.start { resumed } else { self.start.clone() },
            stop: self.stop.clone(),
            stop_inclusive: self.stop_inclusive,
        }
    }

    /// Returns the inclusive start key (empty = unbounded)
    pub fn start(&self) -> &[u8] {
        &self.start
    }

    /// Returns the stop key (empty = unbounded)
    pub fn stop(&self) -> &[u8] {
        &self.stop
    }

    /// Returns whether the stop key itself is part of the range
    pub fn is_stop_inclusive(&self) -> bool {
        self.stop_inclusive
    }

    /// Returns true if `key` sorts before the start of the range
    pub fn is_before(&self, key: &[u8]) -> bool {
        key < self.start.as_slice()
    }

    /// Returns true if `key` sorts after the end of the range
    pub fn is_past(&self, key: &[u8]) -> bool {
        if self.stop.is_empty() {
            return false;
        }
        if self.stop_inclusive {
            key > self.stop.as_slice()
        } else {
            key >= self.stop.as_slice()
        }
    }

    /// Returns true if `key` lies inside the range
    pub fn contains(&self, key: &[u8]) -> bool {
        !self.is_before(key) && !self.is_past(key)
    }
}
