//! Comparator variants

use std::cmp::Ordering;

use regex::Regex;

use super::op::CompareOp;
use crate::filter::{FilterError, FilterResult};

/// Compares candidate bytes against a reference. Stateless.
#[derive(Debug, Clone)]
pub enum Comparator {
    /// Lexicographic byte ordering, equality on exact bytes
    Binary(Vec<u8>),
    /// Orders the candidate's leading bytes against the reference
    BinaryPrefix(Vec<u8>),
    /// Case-sensitive byte substring (match-only)
    Substring(Vec<u8>),
    /// Regular expression over the candidate decoded as UTF-8 (match-only)
    Regex(Regex),
}

impl Comparator {
    /// Exact / ordered byte comparison
    pub fn binary(reference: impl Into<Vec<u8>>) -> Self {
        Comparator::Binary(reference.into())
    }

    /// Prefix comparison
    pub fn prefix(reference: impl Into<Vec<u8>>) -> Self {
        Comparator::BinaryPrefix(reference.into())
    }

    /// Substring match
    pub fn substring(needle: impl Into<Vec<u8>>) -> Self {
        Comparator::Substring(needle.into())
    }

    /// Regex match. Fails fast on an invalid pattern.
    pub fn regex(pattern: &str) -> FilterResult<Self> {
        Regex::new(pattern)
            .map(Comparator::Regex)
            .map_err(|e| FilterError::invalid_config("RegexComparator", e.to_string()))
    }

    /// Returns the ordering of `candidate` relative to the reference.
    pub fn compare(&self, candidate: &[u8]) -> Ordering {
        match self {
            Comparator::Binary(reference) => candidate.cmp(reference.as_slice()),
            Comparator::BinaryPrefix(reference) => {
                let len = candidate.len().min(reference.len());
                candidate[..len].cmp(reference.as_slice())
            }
            Comparator::Substring(needle) => match_only(contains(candidate, needle)),
            Comparator::Regex(regex) => {
                match_only(regex.is_match(&String::from_utf8_lossy(candidate)))
            }
        }
    }

    /// Returns true if `candidate` satisfies `op` against the reference
    pub fn matches(&self, op: CompareOp, candidate: &[u8]) -> bool {
        op.accepts(self.compare(candidate))
    }

    /// Returns true for comparators that cannot order
    pub fn is_match_only(&self) -> bool {
        matches!(self, Comparator::Substring(_) | Comparator::Regex(_))
    }

    /// Rejects pairing a match-only comparator with an ordering operator.
    pub fn check_op(&self, filter: &'static str, op: CompareOp) -> FilterResult<()> {
        if self.is_match_only() && op.is_ordering() {
            return Err(FilterError::invalid_config(
                filter,
                format!("{:?} needs an ordering comparator", op),
            ));
        }
        Ok(())
    }
}

fn match_only(matched: bool) -> Ordering {
    if matched {
        Ordering::Equal
    } else {
        Ordering::Greater
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
