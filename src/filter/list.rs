//! Ordered boolean composition of filters
//!
//! # Order matters
//!
//! Children are evaluated strictly in list order and evaluation stops at the
//! first decisive answer. A child that is skipped for a cell or row never
//! sees it, so stateful children (page counters, samplers) observe different
//! inputs depending on where they sit in the list. Reordering children can
//! therefore change results; callers choose the order deliberately.
//!
//! # Row keys under ONE
//!
//! A ONE list offers each row key to every child, stopping early only on
//! STOP_SCAN. A child that rejects the key sits out the rest of that row: it
//! is not asked about the row's cells or its row end. Only a key rejected by
//! every child rejects the row.

use serde::{Deserialize, Serialize};

use super::decision::{RowDecision, ScanDecision};
use super::errors::FilterResult;
use super::filter::{Filter, ScanFilter};
use crate::model::{Cell, Row};

/// Composition operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Every child must pass (AND)
    All,
    /// At least one child must pass (OR)
    One,
}

/// A filter made of other filters
#[derive(Debug)]
pub struct FilterList {
    operator: Operator,
    filters: Vec<Filter>,
    /// Children that rejected the current row at its key
    sitting_out: Vec<bool>,
}

impl FilterList {
    /// Creates a list
    pub fn new(operator: Operator, filters: Vec<Filter>) -> Self {
        let sitting_out = vec![false; filters.len()];
        Self {
            operator,
            filters,
            sitting_out,
        }
    }

    /// AND composition
    pub fn all(filters: Vec<Filter>) -> Self {
        Self::new(Operator::All, filters)
    }

    /// OR composition
    pub fn one(filters: Vec<Filter>) -> Self {
        Self::new(Operator::One, filters)
    }

    /// Appends a child at the end of the evaluation order
    pub fn push(&mut self, filter: impl Into<Filter>) {
        self.filters.push(filter.into());
        self.sitting_out.push(false);
    }

    /// Returns the operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the number of children
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if the list has no children
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Folds a per-child decision over the children taking part in the
    /// current row, in order.
    fn fold<F>(&mut self, mut eval: F) -> FilterResult<ScanDecision>
    where
        F: FnMut(&mut Filter) -> FilterResult<ScanDecision>,
    {
        let active = self
            .filters
            .iter_mut()
            .zip(&self.sitting_out)
            .filter(|(_, out)| !**out)
            .map(|(filter, _)| filter);

        match self.operator {
            Operator::All => {
                for filter in active {
                    let decision = eval(filter)?;
                    if !decision.is_include() {
                        return Ok(decision);
                    }
                }
                Ok(ScanDecision::Include)
            }
            Operator::One => {
                let mut rejected: Option<ScanDecision> = None;
                for filter in active {
                    let decision = eval(filter)?;
                    match decision {
                        ScanDecision::Include => return Ok(ScanDecision::Include),
                        ScanDecision::StopScan => return Ok(ScanDecision::StopScan),
                        other => rejected = Some(merge(rejected, other)),
                    }
                }
                Ok(rejected.unwrap_or(ScanDecision::Include))
            }
        }
    }

    fn evaluate_row_key_one(&mut self, row_key: &[u8]) -> FilterResult<ScanDecision> {
        let mut accepted = false;
        let mut rejected: Option<ScanDecision> = None;
        for (filter, out) in self.filters.iter_mut().zip(self.sitting_out.iter_mut()) {
            match filter.evaluate_row_key(row_key)? {
                ScanDecision::StopScan => return Ok(ScanDecision::StopScan),
                // SKIP_CELL at a row key skips nothing
                ScanDecision::Include | ScanDecision::SkipCell => accepted = true,
                other => {
                    *out = true;
                    rejected = Some(merge(rejected, other));
                }
            }
        }
        match rejected {
            Some(decision) if !accepted => Ok(decision),
            _ => Ok(ScanDecision::Include),
        }
    }
}

fn merge(prev: Option<ScanDecision>, next: ScanDecision) -> ScanDecision {
    match prev {
        Some(prev) => prev.weaker(next),
        None => next,
    }
}

impl ScanFilter for FilterList {
    fn name(&self) -> &'static str {
        "FilterList"
    }

    fn evaluate_row_key(&mut self, row_key: &[u8]) -> FilterResult<ScanDecision> {
        match self.operator {
            Operator::All => self.fold(|f| f.evaluate_row_key(row_key)),
            Operator::One => self.evaluate_row_key_one(row_key),
        }
    }

    fn evaluate_cell(&mut self, cell: &Cell) -> FilterResult<ScanDecision> {
        self.fold(|f| f.evaluate_cell(cell))
    }

    fn transform_cell(&mut self, cell: Cell) -> FilterResult<Cell> {
        self.filters
            .iter_mut()
            .try_fold(cell, |cell, f| f.transform_cell(cell))
    }

    fn evaluate_row_end(&mut self, row: &Row) -> FilterResult<RowDecision> {
        let decisive = match self.operator {
            Operator::All => RowDecision::DropRow,
            Operator::One => RowDecision::KeepRow,
        };
        let mut any = false;
        for (filter, _) in self
            .filters
            .iter_mut()
            .zip(&self.sitting_out)
            .filter(|(_, out)| !**out)
        {
            any = true;
            if filter.evaluate_row_end(row)? == decisive {
                return Ok(decisive);
            }
        }
        if !any {
            return Ok(RowDecision::KeepRow);
        }
        Ok(match decisive {
            RowDecision::DropRow => RowDecision::KeepRow,
            RowDecision::KeepRow => RowDecision::DropRow,
        })
    }

    fn filter_all_remaining(&self) -> bool {
        self.filters.iter().any(|f| f.filter_all_remaining())
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
        self.sitting_out.fill(false);
    }
}
