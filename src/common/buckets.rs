//! Bucketing of per-repository counts
//!
//! This module provides:
//! - [`BucketDefinition`], an ordered set of named ranges with an overflow bucket
//! - [`histogram`], which counts values per bucket as a [`BucketEntry`] table
//! - [`cumulative_fractions`], the cumulative distribution of a set of counts

use core::num::NonZeroUsize;
use serde::Serialize;
use tabled::Tabled;
use thiserror::Error;

/// Errors that can occur when defining buckets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    #[error("Bucket definition has no overflow label")]
    Empty,

    #[error("Bucket '{label}' has upper bound {bound} which is not above the previous bound {previous}")]
    NotAscending {
        label: String,
        bound: u64,
        previous: u64,
    },
}

type Result<T> = core::result::Result<T, BucketError>;

/// Ordered sequence of `(label, inclusive upper bound)` pairs followed by an
/// open-ended overflow bucket.
///
/// The first bucket is closed at 0, every following bucket covers
/// `(previous bound, bound]` and the overflow bucket covers everything above
/// the last explicit bound. Bounds are strictly ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDefinition {
    bounds: Vec<(String, u64)>,
    overflow: String,
}

impl BucketDefinition {
    /// Creates a validated bucket definition.
    ///
    /// # Arguments
    /// * `bounds` - `(label, inclusive upper bound)` pairs in ascending order
    /// * `overflow` - Label of the bucket receiving values above the last bound
    ///
    /// # Returns
    /// * `Err(BucketError::NotAscending)` - If a bound does not exceed its predecessor
    /// * `Err(BucketError::Empty)` - If the overflow label is empty
    pub fn new(bounds: Vec<(String, u64)>, overflow: impl Into<String>) -> Result<Self> {
        let overflow = overflow.into();
        if overflow.is_empty() {
            return Err(BucketError::Empty);
        }

        for pair in bounds.windows(2) {
            let (_, previous) = pair[0];
            let (ref label, bound) = pair[1];
            if bound <= previous {
                return Err(BucketError::NotAscending {
                    label: label.clone(),
                    bound,
                    previous,
                });
            }
        }

        Ok(Self { bounds, overflow })
    }

    fn from_static(bounds: &[(&str, u64)], overflow: &str) -> Self {
        Self {
            bounds: bounds
                .iter()
                .map(|(label, bound)| (label.to_string(), *bound))
                .collect(),
            overflow: overflow.to_string(),
        }
    }

    /// Number of files per application: 1-10, 11-25, ... 501-1000, 1001-10000.
    pub fn files_per_application() -> Self {
        Self::from_static(
            &[
                ("1-10", 10),
                ("11-25", 25),
                ("26-50", 50),
                ("51-100", 100),
                ("101-200", 200),
                ("201-500", 500),
                ("501-1000", 1000),
            ],
            "1001-10000",
        )
    }

    /// Lines of code per application: 0-50, 51-100, ... 20001-50000, 50001+.
    pub fn lines_of_code_per_application() -> Self {
        Self::from_static(
            &[
                ("0-50", 50),
                ("51-100", 100),
                ("101-200", 200),
                ("201-500", 500),
                ("501-1000", 1000),
                ("1001-2000", 2000),
                ("2001-5000", 5000),
                ("5001-10000", 10000),
                ("10001-20000", 20000),
                ("20001-50000", 50000),
            ],
            "50001+",
        )
    }

    /// Number of functions per application: `1`, `2`, ... `n-1` and `n+`.
    ///
    /// Applications without functions fall into the `1` bucket.
    pub fn function_count(bins: NonZeroUsize) -> Self {
        let bins = bins.get() as u64;
        let bounds = (1..bins).map(|bound| (bound.to_string(), bound)).collect();
        Self {
            bounds,
            overflow: format!("{}+", bins),
        }
    }

    /// Returns the label of the bucket the value falls into.
    ///
    /// A value equal to a bound belongs to that bound's bucket.
    pub fn bin(&self, value: u64) -> &str {
        self.bounds
            .iter()
            .find(|(_, bound)| value <= *bound)
            .map(|(label, _)| label.as_str())
            .unwrap_or(self.overflow.as_str())
    }

    /// All bucket labels in ascending order, overflow last.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bounds
            .iter()
            .map(|(label, _)| label.as_str())
            .chain(core::iter::once(self.overflow.as_str()))
    }

    /// Number of buckets including the overflow bucket.
    pub fn len(&self) -> usize {
        self.bounds.len() + 1
    }

    /// Always false; the overflow bucket exists in every definition.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Position of the bucket the value falls into, overflow being the last.
    pub fn bin_index(&self, value: u64) -> usize {
        self.bounds
            .iter()
            .position(|(_, bound)| value <= *bound)
            .unwrap_or(self.bounds.len())
    }
}

/// Represents a single bucket with its range, count, and percentage
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct BucketEntry {
    /// Human-readable range description (e.g., "1-10", "50001+")
    #[tabled(rename = "Range")]
    pub range: String,
    /// Number of data points in this bucket
    #[tabled(rename = "Count")]
    pub count: usize,
    /// Percentage of total data points in this bucket
    #[tabled(rename = "Percentage")]
    pub percentage: String,
    /// Fraction of total data points in this bucket
    #[tabled(skip)]
    pub ratio: f64,
}

impl BucketEntry {
    /// Creates a new bucket entry with formatted percentage
    pub fn new(range: String, count: usize, total: usize) -> Self {
        let ratio = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        };

        Self {
            range,
            count,
            percentage: format!("{:.2}%", ratio * 100.0),
            ratio,
        }
    }
}

/// Counts values per bucket.
///
/// Every bucket of the definition is present in the output, in order, even when empty.
pub fn histogram(values: &[u64], definition: &BucketDefinition) -> Vec<BucketEntry> {
    let mut counts = vec![0usize; definition.len()];
    for &value in values {
        counts[definition.bin_index(value)] += 1;
    }

    definition
        .labels()
        .zip(counts)
        .map(|(label, count)| BucketEntry::new(label.to_string(), count, values.len()))
        .collect()
}

/// One point of a cumulative distribution curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Tabled)]
pub struct CumulativePoint {
    /// The data value on the X-axis
    #[tabled(rename = "Value")]
    pub value: u64,
    /// Fraction of data points at or below `value`
    #[tabled(rename = "Fraction")]
    pub fraction: f64,
}

/// Generates cumulative distribution data from raw values
///
/// Sorts the values ascending and returns one point per value, preceded by an
/// origin point at `(0, 0.0)`. The fraction of the last point is 1.0.
pub fn cumulative_fractions(values: &[u64]) -> Vec<CumulativePoint> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let total = sorted.len() as f64;
    core::iter::once(CumulativePoint {
        value: 0,
        fraction: 0.0,
    })
    .chain(sorted.iter().enumerate().map(|(index, &value)| CumulativePoint {
        value,
        fraction: (index + 1) as f64 / total,
    }))
    .collect()
}
