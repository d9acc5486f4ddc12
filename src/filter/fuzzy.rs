//! Fuzzy row-key matching
//!
//! A pattern is a byte string plus a mask of the same length: mask byte `0`
//! means the key byte must equal the pattern byte, `1` means any byte. The
//! pattern applies to the leading bytes of the key; keys shorter than the
//! pattern never match.
//!
//! When a key does not match, the filter computes the smallest larger key
//! that could match and hands it to the cursor as a seek hint.

use super::decision::ScanDecision;
use super::errors::{FilterError, FilterResult};
use super::filter::ScanFilter;

const FIXED: u8 = 0;
const WILDCARD: u8 = 1;

/// One fuzzy pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyPattern {
    fixed: Vec<u8>,
    mask: Vec<u8>,
}

impl FuzzyPattern {
    /// Creates a pattern. Wildcard positions of `fixed` are ignored.
    pub fn new(fixed: impl Into<Vec<u8>>, mask: impl Into<Vec<u8>>) -> FilterResult<Self> {
        let mut fixed = fixed.into();
        let mask = mask.into();

        if fixed.is_empty() || fixed.len() != mask.len() {
            return Err(FilterError::invalid_config(
                "FuzzyRowFilter",
                format!(
                    "pattern length {} and mask length {} must be equal and non-zero",
                    fixed.len(),
                    mask.len()
                ),
            ));
        }
        if let Some(bad) = mask.iter().find(|&&m| m != FIXED && m != WILDCARD) {
            return Err(FilterError::invalid_config(
                "FuzzyRowFilter",
                format!("mask byte {} is neither 0 (fixed) nor 1 (wildcard)", bad),
            ));
        }
        for (byte, &m) in fixed.iter_mut().zip(&mask) {
            if m == WILDCARD {
                *byte = 0;
            }
        }
        Ok(Self { fixed, mask })
    }

    fn len(&self) -> usize {
        self.fixed.len()
    }

    /// Returns true if the leading bytes of `key` satisfy the pattern
    pub fn matches(&self, key: &[u8]) -> bool {
        key.len() >= self.len()
            && self
                .fixed
                .iter()
                .zip(&self.mask)
                .zip(key)
                .all(|((&f, &m), &k)| m == WILDCARD || f == k)
    }

    /// Smallest key greater than `key` whose leading bytes match, if any.
    ///
    /// `key` must not already match.
    pub fn next_candidate(&self, key: &[u8]) -> Option<Vec<u8>> {
        let len = self.len();
        let mut candidate: Vec<u8> = key.iter().copied().take(len).collect();
        // short keys sort before their zero-padded extension
        candidate.resize(len, 0);

        for i in 0..len {
            if self.mask[i] == WILDCARD {
                continue;
            }
            let want = self.fixed[i];
            if candidate[i] < want {
                self.fill_from(&mut candidate, i);
                return Some(candidate);
            }
            if candidate[i] > want {
                // carry into the nearest wildcard on the left
                let carry = (0..i)
                    .rev()
                    .find(|&j| self.mask[j] == WILDCARD && candidate[j] < u8::MAX)?;
                candidate[carry] += 1;
                self.fill_from(&mut candidate, carry + 1);
                return Some(candidate);
            }
        }
        Some(candidate)
    }

    /// Lowest matching bytes from position `from` on
    fn fill_from(&self, candidate: &mut [u8], from: usize) {
        for k in from..self.len() {
            candidate[k] = if self.mask[k] == WILDCARD { 0 } else { self.fixed[k] };
        }
    }
}

/// Keeps rows whose key matches any fuzzy pattern, seeking over the rest.
#[derive(Debug, Clone)]
pub struct FuzzyRowFilter {
    patterns: Vec<FuzzyPattern>,
    done: bool,
}

impl FuzzyRowFilter {
    /// Creates the filter
    pub fn new(patterns: Vec<FuzzyPattern>) -> FilterResult<Self> {
        if patterns.is_empty() {
            return Err(FilterError::invalid_config(
                "FuzzyRowFilter",
                "at least one pattern is required",
            ));
        }
        Ok(Self {
            patterns,
            done: false,
        })
    }

    /// Returns the seek hint for a non-matching key
    pub fn next_hint(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.patterns
            .iter()
            .filter_map(|p| p.next_candidate(key))
            .min()
    }
}

impl ScanFilter for FuzzyRowFilter {
    fn name(&self) -> &'static str {
        "FuzzyRowFilter"
    }

    fn evaluate_row_key(&mut self, row_key: &[u8]) -> FilterResult<ScanDecision> {
        if self.patterns.iter().any(|p| p.matches(row_key)) {
            return Ok(ScanDecision::Include);
        }
        match self.next_hint(row_key) {
            Some(hint) => Ok(ScanDecision::SeekTo(hint)),
            None => {
                self.done = true;
                Ok(ScanDecision::StopScan)
            }
        }
    }

    fn filter_all_remaining(&self) -> bool {
        self.done
    }
}
