//! Byte comparators used by the comparison filters
//!
//! A comparator carries a reference value and compares a candidate (a cell
//! value, a row key, a family or a qualifier) against it. A `CompareOp` then
//! turns the ordering into a match decision.
//!
//! Substring and regex comparators are match-only: they report `Equal` when
//! the candidate matches and `Greater` otherwise, so they pair with
//! `Equal` / `NotEqual` only.

mod comparator;
mod op;

pub use comparator::Comparator;
pub use op::CompareOp;
