//! Comparison operators

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How a comparator's ordering is turned into a match.
///
/// The ordering is always "candidate compared to reference".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// candidate < reference
    Less,
    /// candidate <= reference
    LessOrEqual,
    /// candidate == reference
    Equal,
    /// candidate != reference
    NotEqual,
    /// candidate >= reference
    GreaterOrEqual,
    /// candidate > reference
    Greater,
    /// Never matches
    NoOp,
}

impl CompareOp {
    /// Returns true if `ordering` satisfies this operator
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::NoOp => false,
        }
    }

    /// Returns true for operators that need a real ordering
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            CompareOp::Less
                | CompareOp::LessOrEqual
                | CompareOp::GreaterOrEqual
                | CompareOp::Greater
        )
    }
}
