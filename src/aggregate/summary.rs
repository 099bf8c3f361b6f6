//! Corpus-wide summary figures
//!
//! Totals of the corpus and, per dimension, how many distinct labels the
//! repositories use, how many sub-items a label has on average where it is
//! present, and how often each exact combination of labels occurs.

use super::classifier::{corpus_order, Classifier};
use super::distribution::ratio;
use super::label_counts::LabelCounts;
use crate::common::Repository;
use hashbrown::HashMap;
use serde::Serialize;
use tabled::Tabled;

/// Separator between the labels of a [`LabelCombination`].
pub const COMBINATION_SEPARATOR: &str = ";";

/// Totals over the whole corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Tabled)]
pub struct CorpusTotals {
    #[tabled(rename = "Repositories")]
    pub repositories: u64,
    #[tabled(rename = "Files")]
    pub files: u64,
    #[tabled(rename = "Functions")]
    pub functions: u64,
}

/// Number of repositories using exactly `labels` distinct labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Tabled)]
pub struct DistinctLabelCount {
    #[tabled(rename = "Distinct Labels")]
    pub labels: usize,
    #[tabled(rename = "Repositories")]
    pub repositories: u64,
}

/// Average number of sub-items of a label over the repositories containing it
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LabelAverage {
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Items")]
    pub items: u64,
    #[tabled(rename = "Repositories")]
    pub repositories: u64,
    #[tabled(rename = "Average")]
    pub average: f64,
}

/// Number of repositories whose set of labels is exactly `combination`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct LabelCombination {
    /// Labels in axis order, joined by [`COMBINATION_SEPARATOR`]
    #[tabled(rename = "Combination")]
    pub combination: String,
    #[tabled(rename = "Repositories")]
    pub repositories: u64,
}

/// Summary of one dimension of the corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    /// Sorted ascending by number of repositories, then by number of labels
    pub distinct_labels: Vec<DistinctLabelCount>,
    /// Sorted ascending by average; ties keep axis order
    pub averages: Vec<LabelAverage>,
    /// Sorted ascending by number of repositories, then by combination
    pub combinations: Vec<LabelCombination>,
}

/// Counts repositories, files and functions.
pub fn corpus_totals(repositories: &[Repository]) -> CorpusTotals {
    CorpusTotals {
        repositories: repositories.len() as u64,
        files: repositories.iter().map(Repository::file_count).sum(),
        functions: repositories.iter().map(Repository::function_count).sum(),
    }
}

/// Summarizes the dimension of `classifier` over the corpus.
///
/// Repositories without included sub-items count towards zero distinct labels
/// and form no combination.
pub fn corpus_summary<C: Classifier>(repositories: &[Repository], classifier: &C) -> CorpusSummary {
    let order = corpus_order(repositories, classifier);
    let mut items = LabelCounts::with_order(&order.to_order());
    let mut present = LabelCounts::with_order(&order.to_order());
    let mut distinct: HashMap<usize, u64> = HashMap::new();
    let mut combinations: HashMap<String, u64> = HashMap::new();

    for repository in repositories {
        let mut positions: Vec<usize> = Vec::new();
        for label in classifier.labels(repository) {
            items.add(label, 1);
            if let Some(position) = order.position(label) {
                positions.push(position);
            }
        }
        positions.sort_unstable();
        positions.dedup();

        *distinct.entry(positions.len()).or_insert(0) += 1;
        if positions.is_empty() {
            continue;
        }

        let labels: Vec<&str> = positions
            .iter()
            .filter_map(|&position| order.label_at(position))
            .collect();
        for label in &labels {
            present.add(label, 1);
        }
        *combinations.entry(labels.join(COMBINATION_SEPARATOR)).or_insert(0) += 1;
    }

    let mut distinct_labels: Vec<DistinctLabelCount> = distinct
        .into_iter()
        .map(|(labels, repositories)| DistinctLabelCount { labels, repositories })
        .collect();
    distinct_labels.sort_by_key(|entry| (entry.repositories, entry.labels));

    let mut averages: Vec<LabelAverage> = present
        .iter()
        .filter(|(_, repositories)| *repositories > 0)
        .map(|(label, repositories)| {
            let count = items.get(label);
            LabelAverage {
                label: label.to_string(),
                items: count,
                repositories,
                average: ratio(count, repositories),
            }
        })
        .collect();
    averages.sort_by(|left, right| left.average.total_cmp(&right.average));

    let mut combinations: Vec<LabelCombination> = combinations
        .into_iter()
        .map(|(combination, repositories)| LabelCombination {
            combination,
            repositories,
        })
        .collect();
    combinations.sort_by(|left, right| {
        left.repositories
            .cmp(&right.repositories)
            .then_with(|| left.combination.cmp(&right.combination))
    });

    CorpusSummary {
        distinct_labels,
        averages,
        combinations,
    }
}
