//! Multi-range row filter
//!
//! Ranges are sorted and coalesced at construction so that lookup is a
//! binary search over disjoint, ascending ranges.

use super::decision::ScanDecision;
use super::errors::{FilterError, FilterResult};
use super::filter::ScanFilter;
use crate::model::next_row_key;

/// One row-key range. Empty start or stop means unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRange {
    start: Vec<u8>,
    start_inclusive: bool,
    stop: Vec<u8>,
    stop_inclusive: bool,
}

impl RowRange {
    /// Creates a range, rejecting inverted or empty ones
    pub fn new(
        start: impl Into<Vec<u8>>,
        start_inclusive: bool,
        stop: impl Into<Vec<u8>>,
        stop_inclusive: bool,
    ) -> FilterResult<Self> {
        let range = Self {
            start: start.into(),
            start_inclusive,
            stop: stop.into(),
            stop_inclusive,
        };
        if !range.start.is_empty() && !range.stop.is_empty() {
            let inverted = range.start > range.stop;
            let empty = range.start == range.stop && !(start_inclusive && stop_inclusive);
            if inverted || empty {
                return Err(FilterError::invalid_config(
                    "RowRangeFilter",
                    format!("range {} contains no keys", range.describe()),
                ));
            }
        }
        Ok(range)
    }

    /// Returns true if `key` is at or after the start bound
    fn above_start(&self, key: &[u8]) -> bool {
        self.start.is_empty()
            || key > self.start.as_slice()
            || (self.start_inclusive && key == self.start.as_slice())
    }

    /// Returns true if `key` is at or before the stop bound
    fn below_stop(&self, key: &[u8]) -> bool {
        self.stop.is_empty()
            || key < self.stop.as_slice()
            || (self.stop_inclusive && key == self.stop.as_slice())
    }

    /// Returns true if `key` lies inside the range
    pub fn contains(&self, key: &[u8]) -> bool {
        self.above_start(key) && self.below_stop(key)
    }

    /// Smallest key inside the range
    fn first_key(&self) -> Vec<u8> {
        if self.start_inclusive || self.start.is_empty() {
            self.start.clone()
        } else {
            next_row_key(&self.start)
        }
    }

    /// Returns true if `next` (which starts no earlier) touches or overlaps self
    fn touches(&self, next: &RowRange) -> bool {
        if self.stop.is_empty() || next.start.is_empty() {
            return true;
        }
        next.start < self.stop
            || (next.start == self.stop && (self.stop_inclusive || next.start_inclusive))
    }

    /// Extends self to cover `next`
    fn absorb(&mut self, next: RowRange) {
        if self.stop.is_empty() {
            return;
        }
        if next.stop.is_empty() || next.stop > self.stop {
            self.stop = next.stop;
            self.stop_inclusive = next.stop_inclusive;
        } else if next.stop == self.stop {
            self.stop_inclusive |= next.stop_inclusive;
        }
    }

    fn describe(&self) -> String {
        format!(
            "{}{}, {}{}",
            if self.start_inclusive { '[' } else { '(' },
            String::from_utf8_lossy(&self.start),
            String::from_utf8_lossy(&self.stop),
            if self.stop_inclusive { ']' } else { ')' },
        )
    }
}

/// Keeps rows that fall in any of a set of ranges.
///
/// Keys in a gap seek to the next range; keys past the last range stop the
/// scan.
#[derive(Debug, Clone)]
pub struct RowRangeFilter {
    ranges: Vec<RowRange>,
    done: bool,
}

impl RowRangeFilter {
    /// Creates the filter; ranges may overlap and come in any order
    pub fn new(ranges: Vec<RowRange>) -> FilterResult<Self> {
        if ranges.is_empty() {
            return Err(FilterError::invalid_config(
                "RowRangeFilter",
                "at least one range is required",
            ));
        }
        Ok(Self {
            ranges: coalesce(ranges),
            done: false,
        })
    }

    /// Returns the sorted, coalesced ranges
    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }
}

fn coalesce(mut ranges: Vec<RowRange>) -> Vec<RowRange> {
    // inclusive starts sort before exclusive starts on the same key
    ranges.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.start_inclusive.cmp(&a.start_inclusive))
    });

    let mut merged: Vec<RowRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if last.touches(&range) => last.absorb(range),
            _ => merged.push(range),
        }
    }
    merged
}

impl ScanFilter for RowRangeFilter {
    fn name(&self) -> &'static str {
        "RowRangeFilter"
    }

    fn evaluate_row_key(&mut self, row_key: &[u8]) -> FilterResult<ScanDecision> {
        let idx = self.ranges.partition_point(|r| !r.below_stop(row_key));
        let Some(range) = self.ranges.get(idx) else {
            self.done = true;
            return Ok(ScanDecision::StopScan);
        };
        if range.above_start(row_key) {
            Ok(ScanDecision::Include)
        } else {
            Ok(ScanDecision::SeekTo(range.first_key()))
        }
    }

    fn filter_all_remaining(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, si: bool, stop: &str, sti: bool) -> RowRange {
        RowRange::new(start, si, stop, sti).unwrap()
    }

    #[test]
    fn test_demo_ranges() {
        let mut filter = RowRangeFilter::new(vec![
            range("1001", true, "1003", false),
            range("1005", false, "1007", true),
        ])
        .unwrap();

        for key in ["1001", "1002", "1005x", "1006", "1007"] {
            assert!(
                filter.evaluate_row_key(key.as_bytes()).unwrap().is_include(),
                "{} should be included",
                key
            );
        }
        assert_eq!(
            filter.evaluate_row_key(b"1003").unwrap(),
            ScanDecision::SeekTo(b"1005\x00".to_vec())
        );
        assert_eq!(
            filter.evaluate_row_key(b"1005").unwrap(),
            ScanDecision::SeekTo(b"1005\x00".to_vec())
        );
        assert!(filter.evaluate_row_key(b"1008").unwrap().is_stop());
        assert!(filter.filter_all_remaining());
    }

    #[test]
    fn test_key_before_first_range_seeks() {
        let mut filter = RowRangeFilter::new(vec![range("1001", true, "1003", false)]).unwrap();
        assert_eq!(
            filter.evaluate_row_key(b"0001").unwrap(),
            ScanDecision::SeekTo(b"1001".to_vec())
        );
    }

    #[test]
    fn test_overlapping_ranges_coalesce() {
        let filter = RowRangeFilter::new(vec![
            range("1004", true, "1008", false),
            range("1001", true, "1005", true),
            range("1008", true, "1009", false),
            range("2000", false, "2001", false),
        ])
        .unwrap();

        assert_eq!(
            filter.ranges(),
            &[
                range("1001", true, "1009", false),
                range("2000", false, "2001", false),
            ]
        );
    }

    #[test]
    fn test_exclusive_touching_ranges_stay_apart() {
        let filter = RowRangeFilter::new(vec![
            range("1001", true, "1003", false),
            range("1003", false, "1005", false),
        ])
        .unwrap();
        assert_eq!(filter.ranges().len(), 2);
    }

    #[test]
    fn test_unbounded_stop_absorbs_later_ranges() {
        let mut filter = RowRangeFilter::new(vec![
            range("1001", true, "", false),
            range("5000", true, "6000", false),
        ])
        .unwrap();
        assert_eq!(filter.ranges().len(), 1);
        assert!(filter.evaluate_row_key(b"9999").unwrap().is_include());
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        assert!(RowRangeFilter::new(Vec::new()).is_err());
        assert!(RowRange::new("1005", true, "1001", true).is_err());
        assert!(RowRange::new("1005", true, "1005", false).is_err());
        assert!(RowRange::new("1005", true, "1005", true).is_ok());
    }
}
