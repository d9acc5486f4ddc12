//! Serializable filter descriptions
//!
//! A `FilterSpec` is what a client ships to the scan layer. The scan layer
//! builds fresh filter instances from it for every scan, so no filter state
//! ever crosses scans. Construction errors surface here, before any cell is
//! read.
//!
//! Byte fields accept either a JSON string (taken as UTF-8 bytes) or an
//! array of byte values.
//!
//! ```json
//! {"type": "list", "operator": "all", "filters": [
//!     {"type": "single_column_value", "family": "info", "qualifier": "name",
//!      "op": "equal", "comparator": {"kind": "substring", "value": "J"}},
//!     {"type": "page", "limit": 2}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use super::column::{
    ColumnFamilyFilter, ColumnPrefixFilter, ColumnRangeFilter, KeyOnlyFilter,
    MultiColumnPrefixFilter, QualifierFilter,
};
use super::errors::FilterResult;
use super::filter::Filter;
use super::fuzzy::{FuzzyPattern, FuzzyRowFilter};
use super::list::{FilterList, Operator};
use super::range::{RowRange, RowRangeFilter};
use super::row::{PageFilter, RandomSampleFilter, RowFilter, RowPrefixFilter};
use super::value::{SingleColumnValueFilter, ValueFilter};
use crate::comparator::{CompareOp, Comparator};

/// Bytes written as text or as raw values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecBytes {
    Text(String),
    Raw(Vec<u8>),
}

impl SpecBytes {
    /// Returns the bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            SpecBytes::Text(s) => s.as_bytes().to_vec(),
            SpecBytes::Raw(b) => b.clone(),
        }
    }
}

impl From<&str> for SpecBytes {
    fn from(s: &str) -> Self {
        SpecBytes::Text(s.to_string())
    }
}

impl From<Vec<u8>> for SpecBytes {
    fn from(b: Vec<u8>) -> Self {
        SpecBytes::Raw(b)
    }
}

impl Default for SpecBytes {
    fn default() -> Self {
        SpecBytes::Raw(Vec::new())
    }
}

/// Serializable comparator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ComparatorSpec {
    Binary(SpecBytes),
    BinaryPrefix(SpecBytes),
    Substring(SpecBytes),
    Regex(String),
}

impl ComparatorSpec {
    /// Builds the comparator
    pub fn build(&self) -> FilterResult<Comparator> {
        Ok(match self {
            ComparatorSpec::Binary(b) => Comparator::binary(b.to_bytes()),
            ComparatorSpec::BinaryPrefix(b) => Comparator::prefix(b.to_bytes()),
            ComparatorSpec::Substring(b) => Comparator::substring(b.to_bytes()),
            ComparatorSpec::Regex(pattern) => Comparator::regex(pattern)?,
        })
    }
}

/// Serializable row range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRangeSpec {
    #[serde(default)]
    pub start: SpecBytes,
    #[serde(default = "default_true")]
    pub start_inclusive: bool,
    #[serde(default)]
    pub stop: SpecBytes,
    #[serde(default)]
    pub stop_inclusive: bool,
}

/// Serializable fuzzy pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyPatternSpec {
    pub fixed: SpecBytes,
    pub mask: Vec<u8>,
}

/// Serializable description of any built-in filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    Value {
        op: CompareOp,
        comparator: ComparatorSpec,
    },
    SingleColumnValue {
        family: SpecBytes,
        qualifier: SpecBytes,
        op: CompareOp,
        comparator: ComparatorSpec,
        #[serde(default)]
        filter_if_missing: bool,
        #[serde(default = "default_true")]
        latest_version_only: bool,
    },
    Page {
        limit: u64,
    },
    RandomSample {
        probability: f32,
        #[serde(default)]
        seed: Option<u64>,
    },
    Row {
        op: CompareOp,
        comparator: ComparatorSpec,
    },
    RowPrefix {
        prefix: SpecBytes,
    },
    RowRange {
        ranges: Vec<RowRangeSpec>,
    },
    FuzzyRow {
        patterns: Vec<FuzzyPatternSpec>,
    },
    ColumnFamily {
        op: CompareOp,
        comparator: ComparatorSpec,
    },
    Qualifier {
        op: CompareOp,
        comparator: ComparatorSpec,
    },
    ColumnPrefix {
        prefix: SpecBytes,
    },
    MultiColumnPrefix {
        prefixes: Vec<SpecBytes>,
    },
    ColumnRange {
        #[serde(default)]
        min: SpecBytes,
        #[serde(default = "default_true")]
        min_inclusive: bool,
        #[serde(default)]
        max: SpecBytes,
        #[serde(default)]
        max_inclusive: bool,
    },
    KeyOnly {
        #[serde(default)]
        len_as_value: bool,
    },
    List {
        operator: Operator,
        filters: Vec<FilterSpec>,
    },
}

fn default_true() -> bool {
    true
}

impl FilterSpec {
    /// Builds a fresh filter instance
    pub fn build(&self) -> FilterResult<Filter> {
        let filter: Filter = match self {
            FilterSpec::Value { op, comparator } => {
                ValueFilter::new(*op, comparator.build()?)?.into()
            }
            FilterSpec::SingleColumnValue {
                family,
                qualifier,
                op,
                comparator,
                filter_if_missing,
                latest_version_only,
            } => SingleColumnValueFilter::new(
                family.to_bytes(),
                qualifier.to_bytes(),
                *op,
                comparator.build()?,
            )?
            .filter_if_missing(*filter_if_missing)
            .latest_version_only(*latest_version_only)
            .into(),
            FilterSpec::Page { limit } => PageFilter::new(*limit).into(),
            FilterSpec::RandomSample { probability, seed } => match seed {
                Some(seed) => RandomSampleFilter::with_seed(*probability, *seed)?.into(),
                None => RandomSampleFilter::new(*probability)?.into(),
            },
            FilterSpec::Row { op, comparator } => RowFilter::new(*op, comparator.build()?)?.into(),
            FilterSpec::RowPrefix { prefix } => RowPrefixFilter::new(prefix.to_bytes()).into(),
            FilterSpec::RowRange { ranges } => {
                let ranges = ranges
                    .iter()
                    .map(|r| {
                        RowRange::new(
                            r.start.to_bytes(),
                            r.start_inclusive,
                            r.stop.to_bytes(),
                            r.stop_inclusive,
                        )
                    })
                    .collect::<FilterResult<Vec<_>>>()?;
                RowRangeFilter::new(ranges)?.into()
            }
            FilterSpec::FuzzyRow { patterns } => {
                let patterns = patterns
                    .iter()
                    .map(|p| FuzzyPattern::new(p.fixed.to_bytes(), p.mask.clone()))
                    .collect::<FilterResult<Vec<_>>>()?;
                FuzzyRowFilter::new(patterns)?.into()
            }
            FilterSpec::ColumnFamily { op, comparator } => {
                ColumnFamilyFilter::new(*op, comparator.build()?)?.into()
            }
            FilterSpec::Qualifier { op, comparator } => {
                QualifierFilter::new(*op, comparator.build()?)?.into()
            }
            FilterSpec::ColumnPrefix { prefix } => {
                ColumnPrefixFilter::new(prefix.to_bytes()).into()
            }
            FilterSpec::MultiColumnPrefix { prefixes } => {
                MultiColumnPrefixFilter::new(prefixes.iter().map(SpecBytes::to_bytes))?.into()
            }
            FilterSpec::ColumnRange {
                min,
                min_inclusive,
                max,
                max_inclusive,
            } => ColumnRangeFilter::new(min.to_bytes(), *min_inclusive, max.to_bytes(), *max_inclusive)?
                .into(),
            FilterSpec::KeyOnly { len_as_value } => {
                if *len_as_value {
                    KeyOnlyFilter::len_as_value().into()
                } else {
                    KeyOnlyFilter::new().into()
                }
            }
            FilterSpec::List { operator, filters } => {
                let children = filters
                    .iter()
                    .map(FilterSpec::build)
                    .collect::<FilterResult<Vec<_>>>()?;
                FilterList::new(*operator, children).into()
            }
        };
        Ok(filter)
    }
}
