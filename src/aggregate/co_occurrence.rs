//! Pairwise label co-occurrence across repositories
//!
//! [`co_occurrence`] counts, for every unordered pair of labels, the repositories
//! in which both labels appear. [`CoOccurrenceMatrix::triangular`] reduces the
//! symmetric matrix to the lower triangle used for display.

use super::classifier::{corpus_order, Classifier};
use crate::common::Repository;
use core::fmt;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

/// Symmetric matrix of repository counts per label pair.
///
/// Both axes share the same label order: canonical labels first, then labels
/// outside the canonical order in first-seen order. The diagonal is always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoOccurrenceMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<u64>>,
}

/// Number of repositories containing both labels of a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct LabelPair {
    /// The label earlier in axis order
    #[tabled(rename = "First")]
    pub first: String,
    #[tabled(rename = "Second")]
    pub second: String,
    #[tabled(rename = "Repositories")]
    pub count: u64,
}

/// Counts label pairs per repository.
///
/// Each repository contributes at most once to a pair, no matter how many of
/// its sub-items carry either label. Repositories with fewer than two distinct
/// labels contribute nothing.
pub fn co_occurrence<C: Classifier>(repositories: &[Repository], classifier: &C) -> CoOccurrenceMatrix {
    let order = corpus_order(repositories, classifier);
    let size = order.len();
    let mut counts = vec![vec![0u64; size]; size];
    let mut present: Vec<usize> = Vec::new();

    for repository in repositories {
        present.clear();
        present.extend(classifier.labels(repository).filter_map(|label| order.position(label)));
        present.sort_unstable();
        present.dedup();

        for (offset, &left) in present.iter().enumerate() {
            for &right in &present[offset + 1..] {
                counts[left][right] += 1;
                counts[right][left] += 1;
            }
        }
    }

    debug!(repositories = repositories.len(), labels = size, "computed co-occurrence matrix");

    CoOccurrenceMatrix {
        labels: order.to_order(),
        counts,
    }
}

impl CoOccurrenceMatrix {
    /// Axis labels, shared by rows and columns.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|candidate| candidate == label)
    }

    /// Repositories containing both `a` and `b`; 0 for unknown labels and for `a == b`.
    pub fn count(&self, a: &str, b: &str) -> u64 {
        match (self.index(a), self.index(b)) {
            (Some(row), Some(column)) => self.counts[row][column],
            _ => 0,
        }
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.labels.len())
            .all(|row| (0..row).all(|column| self.counts[row][column] == self.counts[column][row]))
    }

    /// Every pair with a non-zero count, in axis order.
    pub fn pairs(&self) -> Vec<LabelPair> {
        let mut pairs = Vec::new();
        for (first_index, first) in self.labels.iter().enumerate() {
            for (second_index, second) in self.labels.iter().enumerate().skip(first_index + 1) {
                let count = self.counts[first_index][second_index];
                if count > 0 {
                    pairs.push(LabelPair {
                        first: first.clone(),
                        second: second.clone(),
                        count,
                    });
                }
            }
        }
        pairs
    }

    /// Lower-triangular view for display.
    ///
    /// Rows run over every label but the first, columns over every label but the
    /// last. A cell below the diagonal holds the pair count, or is empty if no
    /// repository has the pair; cells on or above the diagonal are masked.
    /// Rows and columns without any count are dropped.
    pub fn triangular(&self) -> TriangularMatrix {
        let size = self.labels.len();
        if size < 2 {
            return TriangularMatrix::default();
        }

        let cell = |row: usize, column: usize| -> MatrixCell {
            match (row > column, self.counts[row][column]) {
                (false, _) => MatrixCell::Masked,
                (true, 0) => MatrixCell::Empty,
                (true, count) => MatrixCell::Count(count),
            }
        };

        let rows: Vec<usize> = (1..size)
            .filter(|&row| (0..size - 1).any(|column| matches!(cell(row, column), MatrixCell::Count(_))))
            .collect();
        let columns: Vec<usize> = (0..size - 1)
            .filter(|&column| rows.iter().any(|&row| matches!(cell(row, column), MatrixCell::Count(_))))
            .collect();

        TriangularMatrix {
            cells: rows
                .iter()
                .map(|&row| columns.iter().map(|&column| cell(row, column)).collect())
                .collect(),
            rows: rows.iter().map(|&row| self.labels[row].clone()).collect(),
            columns: columns.iter().map(|&column| self.labels[column].clone()).collect(),
        }
    }
}

/// A cell of the triangular matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixCell {
    /// Repositories containing both labels
    Count(u64),
    /// No repository contains both labels
    Empty,
    /// Duplicate of a symmetric cell, or the diagonal
    Masked,
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixCell::Count(count) => write!(f, "{}", count),
            MatrixCell::Empty => Ok(()),
            MatrixCell::Masked => f.write_str("-"),
        }
    }
}

/// Lower triangle of a [`CoOccurrenceMatrix`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriangularMatrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `cells[row][column]`
    pub cells: Vec<Vec<MatrixCell>>,
}

/// One cell of a [`TriangularMatrix`], flattened for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct MatrixRecord {
    #[tabled(rename = "Row")]
    pub row: String,
    #[tabled(rename = "Column")]
    pub column: String,
    #[tabled(rename = "Value")]
    pub cell: MatrixCell,
}

impl TriangularMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<MatrixCell> {
        let row = self.rows.iter().position(|label| label == row)?;
        let column = self.columns.iter().position(|label| label == column)?;
        Some(self.cells[row][column])
    }

    /// All cells, row by row.
    pub fn records(&self) -> Vec<MatrixRecord> {
        self.rows
            .iter()
            .zip(&self.cells)
            .flat_map(|(row, cells)| {
                self.columns.iter().zip(cells).map(move |(column, cell)| MatrixRecord {
                    row: row.clone(),
                    column: column.clone(),
                    cell: *cell,
                })
            })
            .collect()
    }
}
