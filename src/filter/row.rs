//! Row-oriented filters
//!
//! These decide once per row, at the row key, and never look at cell
//! contents.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::decision::{RowDecision, ScanDecision};
use super::errors::{FilterError, FilterResult};
use super::filter::ScanFilter;
use crate::comparator::{CompareOp, Comparator};
use crate::model::Row;

/// Compares the row key; non-matching rows are skipped whole.
#[derive(Debug, Clone)]
pub struct RowFilter {
    op: CompareOp,
    comparator: Comparator,
}

impl RowFilter {
    /// Creates a row-key comparison filter
    pub fn new(op: CompareOp, comparator: Comparator) -> FilterResult<Self> {
        comparator.check_op("RowFilter", op)?;
        Ok(Self { op, comparator })
    }
}

impl ScanFilter for RowFilter {
    fn name(&self) -> &'static str {
        "RowFilter"
    }

    fn evaluate_row_key(&mut self, row_key: &[u8]) -> FilterResult<ScanDecision> {
        if self.comparator.matches(self.op, row_key) {
            Ok(ScanDecision::Include)
        } else {
            Ok(ScanDecision::NextRow)
        }
    }
}

/// Stops the scan once `limit` rows were kept.
///
/// Only rows that reach this filter's row-end stage count. Inside an ALL
/// list a row dropped by an earlier child never reaches it.
#[derive(Debug, Clone)]
pub struct PageFilter {
    limit: u64,
    rows_accepted: u64,
}

impl PageFilter {
    /// Creates a page filter
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            rows_accepted: 0,
        }
    }

    /// Returns the number of rows counted so far
    pub fn rows_accepted(&self) -> u64 {
        self.rows_accepted
    }
}

impl ScanFilter for PageFilter {
    fn name(&self) -> &'static str {
        "PageFilter"
    }

    fn evaluate_row_key(&mut self, _row_key: &[u8]) -> FilterResult<ScanDecision> {
        if self.filter_all_remaining() {
            Ok(ScanDecision::StopScan)
        } else {
            Ok(ScanDecision::Include)
        }
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        self.rows_accepted += 1;
        Ok(RowDecision::KeepRow)
    }

    fn filter_all_remaining(&self) -> bool {
        self.rows_accepted >= self.limit
    }
}

/// Keeps each row with the given probability.
///
/// One uniform draw in `[0, 1)` per row; the row is kept iff the draw is
/// below the probability. The random source can be injected.
pub struct RandomSampleFilter {
    probability: f32,
    rng: Box<dyn RngCore + Send>,
    chosen: bool,
}

impl RandomSampleFilter {
    /// Creates a sampler seeded from the OS
    pub fn new(probability: f32) -> FilterResult<Self> {
        Self::with_rng(probability, StdRng::from_entropy())
    }

    /// Creates a reproducible sampler
    pub fn with_seed(probability: f32, seed: u64) -> FilterResult<Self> {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }

    /// Creates a sampler over the given random source
    pub fn with_rng(probability: f32, rng: impl RngCore + Send + 'static) -> FilterResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(FilterError::invalid_config(
                "RandomSampleFilter",
                format!("probability {} outside [0, 1]", probability),
            ));
        }
        Ok(Self {
            probability,
            rng: Box::new(rng),
            chosen: false,
        })
    }
}

impl fmt::Debug for RandomSampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSampleFilter")
            .field("probability", &self.probability)
            .field("chosen", &self.chosen)
            .finish_non_exhaustive()
    }
}

impl ScanFilter for RandomSampleFilter {
    fn name(&self) -> &'static str {
        "RandomSampleFilter"
    }

    fn evaluate_row_key(&mut self, _row_key: &[u8]) -> FilterResult<ScanDecision> {
        let draw: f32 = self.rng.gen();
        self.chosen = draw < self.probability;
        if self.chosen {
            Ok(ScanDecision::Include)
        } else {
            Ok(ScanDecision::NextRow)
        }
    }

    fn evaluate_row_end(&mut self, _row: &Row) -> FilterResult<RowDecision> {
        Ok(if self.chosen {
            RowDecision::KeepRow
        } else {
            RowDecision::DropRow
        })
    }

    fn reset(&mut self) {
        self.chosen = false;
    }
}

/// Keeps rows whose key starts with a prefix.
///
/// Keys before the prefix seek forward to it; the first key past the prefix
/// range stops the scan. Keys must arrive in ascending order.
#[derive(Debug, Clone)]
pub struct RowPrefixFilter {
    prefix: Vec<u8>,
    passed: bool,
}

impl RowPrefixFilter {
    /// Creates a prefix filter
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            passed: false,
        }
    }
}

impl ScanFilter for RowPrefixFilter {
    fn name(&self) -> &'static str {
        "RowPrefixFilter"
    }

    fn evaluate_row_key(&mut self, row_key: &[u8]) -> FilterResult<ScanDecision> {
        if row_key.starts_with(&self.prefix) {
            return Ok(ScanDecision::Include);
        }
        if row_key < self.prefix.as_slice() {
            return Ok(ScanDecision::SeekTo(self.prefix.clone()));
        }
        self.passed = true;
        Ok(ScanDecision::StopScan)
    }

    fn filter_all_remaining(&self) -> bool {
        self.passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_filter_greater_or_equal() {
        let mut filter = RowFilter::new(CompareOp::GreaterOrEqual, Comparator::binary("1003")).unwrap();
        assert_eq!(filter.evaluate_row_key(b"1002").unwrap(), ScanDecision::NextRow);
        assert_eq!(filter.evaluate_row_key(b"1003").unwrap(), ScanDecision::Include);
        assert_eq!(filter.evaluate_row_key(b"1010").unwrap(), ScanDecision::Include);
    }

    #[test]
    fn test_row_filter_substring() {
        let mut filter = RowFilter::new(CompareOp::Equal, Comparator::substring("4")).unwrap();
        assert_eq!(filter.evaluate_row_key(b"1004").unwrap(), ScanDecision::Include);
        assert_eq!(filter.evaluate_row_key(b"1005").unwrap(), ScanDecision::NextRow);
    }

    #[test]
    fn test_page_filter_counts_kept_rows() {
        let mut filter = PageFilter::new(2);
        let row = Row::new("1001");

        assert!(filter.evaluate_row_key(b"1001").unwrap().is_include());
        filter.evaluate_row_end(&row).unwrap();
        assert!(!filter.filter_all_remaining());

        assert!(filter.evaluate_row_key(b"1002").unwrap().is_include());
        filter.evaluate_row_end(&row).unwrap();
        assert!(filter.filter_all_remaining());

        assert!(filter.evaluate_row_key(b"1003").unwrap().is_stop());
        assert_eq!(filter.rows_accepted(), 2);
    }

    #[test]
    fn test_random_sample_bounds() {
        let mut all = RandomSampleFilter::with_seed(1.0, 7).unwrap();
        let mut none = RandomSampleFilter::with_seed(0.0, 7).unwrap();

        for i in 0..100 {
            let key = format!("{:04}", i);
            assert!(all.evaluate_row_key(key.as_bytes()).unwrap().is_include());
            assert_eq!(
                none.evaluate_row_key(key.as_bytes()).unwrap(),
                ScanDecision::NextRow
            );
        }
    }

    #[test]
    fn test_random_sample_rejects_bad_probability() {
        assert!(RandomSampleFilter::new(1.5).is_err());
        assert!(RandomSampleFilter::new(-0.1).is_err());
        assert!(RandomSampleFilter::new(f32::NAN).is_err());
    }

    #[test]
    fn test_random_sample_is_reproducible() {
        let draws = |seed| {
            let mut filter = RandomSampleFilter::with_seed(0.5, seed).unwrap();
            (0..64)
                .map(|i: u32| filter.evaluate_row_key(&i.to_be_bytes()).unwrap().is_include())
                .collect::<Vec<_>>()
        };
        assert_eq!(draws(42), draws(42));
    }

    #[test]
    fn test_row_prefix() {
        let mut filter = RowPrefixFilter::new("100");

        assert_eq!(
            filter.evaluate_row_key(b"0999").unwrap(),
            ScanDecision::SeekTo(b"100".to_vec())
        );
        assert!(filter.evaluate_row_key(b"1001").unwrap().is_include());
        assert!(!filter.filter_all_remaining());
        assert!(filter.evaluate_row_key(b"1010").unwrap().is_stop());
        assert!(filter.filter_all_remaining());
    }
}
