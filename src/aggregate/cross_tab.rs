//! Joint distribution of two classifiers over the same sub-items
//!
//! A [`CrossTab`] holds one slice per label of dimension A (one bar of a stacked
//! bar chart) with the counts of every dimension-B label. Long slices can be
//! collapsed with [`top_k_with_overflow`]; repositories can be tagged
//! [`Sharing::Shared`] or [`Sharing::Exclusive`] per dimension with [`sharing`].

use super::classifier::{corpus_order, Classifier};
use super::distribution::{per_entity_distribution, ratio};
use super::label_counts::LabelCounts;
use crate::common::data_structures::saturating_sum;
use crate::common::{Repository, RepositoryId};
use core::fmt;
use core::num::NonZeroUsize;
use hashbrown::HashSet;
use serde::{Serialize, Serializer};
use tabled::Tabled;
use tracing::debug;

/// Display label of [`SliceLabel::Other`].
pub const OVERFLOW_LABEL: &str = "Other";

/// Label of an entry in a truncated slice
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SliceLabel {
    /// A dimension-B label kept individually
    Labeled(String),
    /// Everything beyond the top `k - 1` labels
    Other,
}

impl SliceLabel {
    pub fn as_str(&self) -> &str {
        match self {
            SliceLabel::Labeled(label) => label,
            SliceLabel::Other => OVERFLOW_LABEL,
        }
    }
}

impl fmt::Display for SliceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SliceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One entry of a truncated slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceEntry {
    pub label: SliceLabel,
    pub count: u64,
}

/// One cell of a cross-tabulation
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CrossTabEntry {
    /// Label of dimension A (the slice)
    #[tabled(rename = "A")]
    pub a: String,
    /// Label of dimension B
    #[tabled(rename = "B")]
    pub b: String,
    #[tabled(rename = "Count")]
    pub count: u64,
    /// Share of `count` within the slice of `a`
    #[tabled(rename = "Ratio")]
    pub ratio: f64,
}

/// One entry of a truncated slice, flattened for output
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct TopKEntry {
    #[tabled(rename = "A")]
    pub a: String,
    #[tabled(rename = "B")]
    pub b: SliceLabel,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Ratio")]
    pub ratio: f64,
}

/// Two-dimensional count table.
///
/// Both axes are ordered canonically, followed by labels outside the canonical
/// order in first-seen order. Every slice holds every dimension-B label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossTab {
    a_labels: Vec<String>,
    b_labels: Vec<String>,
    slices: Vec<LabelCounts>,
}

/// Counts every sub-item once under its pair of labels.
///
/// Sub-items excluded by either classifier are skipped.
pub fn cross_tab<A, B>(repositories: &[Repository], a: &A, b: &B) -> CrossTab
where
    A: Classifier,
    B: Classifier<Item = A::Item>,
{
    let a_order = corpus_order(repositories, a);
    let b_order = corpus_order(repositories, b);
    let b_labels = b_order.to_order();
    let mut slices = vec![LabelCounts::with_order(&b_labels); a_order.len()];

    for repository in repositories {
        for item in a.items(repository) {
            let (Some(a_label), Some(b_label)) = (a.classify(item), b.classify(item)) else {
                continue;
            };
            if let Some(index) = a_order.position(a_label) {
                slices[index].add(b_label, 1);
            }
        }
    }

    debug!(
        repositories = repositories.len(),
        slices = slices.len(),
        columns = b_labels.len(),
        "computed cross tabulation"
    );

    CrossTab {
        a_labels: a_order.to_order(),
        b_labels,
        slices,
    }
}

impl CrossTab {
    pub fn a_labels(&self) -> &[String] {
        &self.a_labels
    }

    pub fn b_labels(&self) -> &[String] {
        &self.b_labels
    }

    /// Dimension-B counts of the slice of `a`.
    pub fn slice(&self, a: &str) -> Option<&LabelCounts> {
        self.a_labels
            .iter()
            .position(|label| label == a)
            .map(|index| &self.slices[index])
    }

    pub fn count(&self, a: &str, b: &str) -> u64 {
        self.slice(a).map(|slice| slice.get(b)).unwrap_or(0)
    }

    /// Share of `b` within the slice of `a`; 0 for an empty slice.
    pub fn row_ratio(&self, a: &str, b: &str) -> f64 {
        self.slice(a)
            .map(|slice| ratio(slice.get(b), slice.total()))
            .unwrap_or(0.0)
    }

    /// Every cell, row-normalized, slice by slice.
    pub fn entries(&self) -> Vec<CrossTabEntry> {
        self.a_labels
            .iter()
            .zip(&self.slices)
            .flat_map(|(a, slice)| {
                let total = slice.total();
                slice.iter().map(move |(b, count)| CrossTabEntry {
                    a: a.clone(),
                    b: b.to_string(),
                    count,
                    ratio: ratio(count, total),
                })
            })
            .collect()
    }

    /// Applies [`top_k_with_overflow`] to every slice independently.
    pub fn top_k(&self, k: NonZeroUsize) -> Vec<TopKEntry> {
        self.a_labels
            .iter()
            .zip(&self.slices)
            .flat_map(|(a, slice)| {
                let total = slice.total();
                top_k_with_overflow(slice, k)
                    .into_iter()
                    .map(move |entry| TopKEntry {
                        a: a.clone(),
                        b: entry.label,
                        count: entry.count,
                        ratio: ratio(entry.count, total),
                    })
            })
            .collect()
    }
}

/// Keeps the `k - 1` largest labels of a slice and collapses the rest into [`SliceLabel::Other`].
///
/// Only labels with a non-zero count take part. Labels are ranked by count,
/// descending, with ties broken by their position in the slice. If at most `k`
/// labels take part, all of them are kept and no `Other` entry is produced.
/// Otherwise a label spelled [`OVERFLOW_LABEL`] always joins the overflow, so
/// the output never holds two entries with the same display label.
/// The counts of the output always sum to the slice total.
pub fn top_k_with_overflow(slice: &LabelCounts, k: NonZeroUsize) -> Vec<SliceEntry> {
    let mut ranked: Vec<(&str, u64)> = slice.iter().filter(|(_, count)| *count > 0).collect();
    // Stable, so equal counts keep slice order.
    ranked.sort_by(|left, right| right.1.cmp(&left.1));

    let k = k.get();
    if ranked.len() <= k {
        return ranked
            .into_iter()
            .map(|(label, count)| SliceEntry {
                label: SliceLabel::Labeled(label.to_string()),
                count,
            })
            .collect();
    }

    let literal_other = slice.get(OVERFLOW_LABEL);
    ranked.retain(|(label, _)| *label != OVERFLOW_LABEL);

    let kept = (k - 1).min(ranked.len());
    let overflow = saturating_sum(ranked[kept..].iter().map(|(_, count)| *count)).saturating_add(literal_other);
    ranked[..kept]
        .iter()
        .map(|(label, count)| SliceEntry {
            label: SliceLabel::Labeled(label.to_string()),
            count: *count,
        })
        .chain(core::iter::once(SliceEntry {
            label: SliceLabel::Other,
            count: overflow,
        }))
        .collect()
}

/// Whether a repository spreads its sub-items over more than one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sharing {
    /// Sub-items map to more than one label
    Shared,
    /// All sub-items map to a single label
    Exclusive,
}

impl fmt::Display for Sharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sharing::Shared => f.write_str("Shared"),
            Sharing::Exclusive => f.write_str("Exclusive"),
        }
    }
}

/// Tags `repository` for the dimension of `classifier`.
///
/// Returns [`None`] if the repository has no included sub-items.
pub fn sharing<C: Classifier>(repository: &Repository, classifier: &C) -> Option<Sharing> {
    let labels: HashSet<&str> = classifier.labels(repository).collect();
    match labels.len() {
        0 => None,
        1 => Some(Sharing::Exclusive),
        _ => Some(Sharing::Shared),
    }
}

/// Number of sub-items of one label in one repository, with the repository's tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct SharingRow {
    #[tabled(rename = "Repository")]
    pub repository: RepositoryId,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Sharing")]
    pub sharing: Sharing,
}

/// One row per repository and label present in it.
pub fn sharing_rows<C: Classifier>(repositories: &[Repository], classifier: &C) -> Vec<SharingRow> {
    let mut rows = Vec::new();
    for repository in repositories {
        let distribution = per_entity_distribution(repository, classifier);
        let present: Vec<_> = distribution
            .entries()
            .iter()
            .filter(|entry| entry.count > 0)
            .collect();

        let sharing = match present.len() {
            1 => Sharing::Exclusive,
            _ => Sharing::Shared,
        };
        rows.extend(present.into_iter().map(|entry| SharingRow {
            repository: repository.id,
            label: entry.label.clone(),
            count: entry.count,
            sharing,
        }));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::classifier::{FunctionClassifier, FunctionField};
    use crate::aggregate::test_support::{function, platforms_repository, repository};
    use crate::taxonomy::{Taxonomies, TaxonomyName};
    use itertools::Itertools;
    use rstest::rstest;

    fn k(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).unwrap()
    }

    fn slice(pairs: &[(&str, u64)]) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for (label, count) in pairs {
            counts.add(label, *count);
        }
        counts
    }

    const SIX: &[(&str, u64)] = &[("a", 10), ("b", 3), ("c", 7), ("d", 3), ("e", 1), ("f", 3)];

    #[test]
    fn top_k_keeps_k_minus_one_and_collapses_the_rest() {
        let entries = top_k_with_overflow(&slice(SIX), k(5));

        let labels: Vec<String> = entries.iter().map(|entry| entry.label.to_string()).collect();
        // b, d and f tie at 3; f ranks last by slice order.
        assert_eq!(labels, vec!["a", "c", "b", "d", "Other"]);
        assert_eq!(entries[4].label, SliceLabel::Other);
        assert_eq!(entries[4].count, 3 + 1);
    }

    #[test]
    fn top_k_without_overflow_when_few_labels() {
        let entries = top_k_with_overflow(&slice(&[("x", 1), ("y", 0), ("z", 4)]), k(2));

        assert_eq!(
            entries,
            vec![
                SliceEntry {
                    label: SliceLabel::Labeled("z".to_string()),
                    count: 4
                },
                SliceEntry {
                    label: SliceLabel::Labeled("x".to_string()),
                    count: 1
                },
            ]
        );
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    #[case(6)]
    #[case(7)]
    fn top_k_preserves_slice_total(#[case] value: usize) {
        let source = slice(SIX);
        let entries = top_k_with_overflow(&source, k(value));

        assert_eq!(entries.iter().map(|entry| entry.count).sum::<u64>(), source.total());
        assert!(entries.len() <= value);
        let others = entries.iter().filter(|entry| entry.label == SliceLabel::Other).count();
        assert_eq!(others, usize::from(value < SIX.len()));
    }

    #[test]
    fn top_k_folds_a_literal_other_label_into_the_overflow() {
        let source = slice(&[("Other", 3), ("AWS", 1), ("Azure", 1), ("GCP", 1), ("Vercel", 1)]);
        let entries = top_k_with_overflow(&source, k(3));

        assert_eq!(
            entries,
            vec![
                SliceEntry {
                    label: SliceLabel::Labeled("AWS".to_string()),
                    count: 1
                },
                SliceEntry {
                    label: SliceLabel::Labeled("Azure".to_string()),
                    count: 1
                },
                SliceEntry {
                    label: SliceLabel::Other,
                    count: 3 + 1 + 1
                },
            ]
        );
        let names: Vec<String> = entries.iter().map(|entry| entry.label.to_string()).collect();
        assert_eq!(names.iter().unique().count(), names.len());
    }

    #[test]
    fn top_k_keeps_a_literal_other_label_when_nothing_overflows() {
        let entries = top_k_with_overflow(&slice(&[("Other", 3), ("AWS", 1)]), k(3));

        assert_eq!(
            entries,
            vec![
                SliceEntry {
                    label: SliceLabel::Labeled("Other".to_string()),
                    count: 3
                },
                SliceEntry {
                    label: SliceLabel::Labeled("AWS".to_string()),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn top_k_with_k_one_collapses_everything() {
        let entries = top_k_with_overflow(&slice(&[("x", 2), ("y", 3)]), k(1));
        assert_eq!(
            entries,
            vec![SliceEntry {
                label: SliceLabel::Other,
                count: 5
            }]
        );
    }

    #[test]
    fn cross_tab_counts_and_row_normalizes() {
        let taxonomies = Taxonomies::builtin();
        let locations = FunctionClassifier::new(
            taxonomies.get(TaxonomyName::ExecutionLocation),
            FunctionField::Location,
        );
        let platforms = FunctionClassifier::new(taxonomies.get(TaxonomyName::Platform), FunctionField::Platform);
        let repositories = vec![
            repository(
                1,
                vec![],
                vec![
                    function("aws", "serverless", "http", "region"),
                    function("aws", "serverless", "http", "region"),
                    function("cloudflare", "wrangler", "http", "edge"),
                ],
            ),
            repository(2, vec![], vec![function("azure", "azure_functions", "queue", "region")]),
        ];

        let table = cross_tab(&repositories, &locations, &platforms);
        assert_eq!(table.a_labels(), ["Region", "Edge", "Unknown"]);
        assert_eq!(table.count("Region", "AWS"), 2);
        assert_eq!(table.count("Region", "Azure"), 1);
        assert_eq!(table.count("Edge", "Cloudflare"), 1);
        assert!((table.row_ratio("Region", "AWS") - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(table.row_ratio("Unknown", "AWS"), 0.0);

        let entries = table.entries();
        assert_eq!(entries.len(), table.a_labels().len() * table.b_labels().len());
        for a in table.a_labels() {
            let sum: f64 = entries.iter().filter(|entry| &entry.a == a).map(|entry| entry.ratio).sum();
            let expected = if table.slice(a).unwrap().total() == 0 { 0.0 } else { 1.0 };
            assert!((sum - expected).abs() < 1e-9, "slice {}", a);
        }
    }

    #[test]
    fn cross_tab_truncates_each_slice_independently() {
        let taxonomies = Taxonomies::builtin();
        let locations = FunctionClassifier::new(
            taxonomies.get(TaxonomyName::ExecutionLocation),
            FunctionField::Location,
        );
        let platforms = FunctionClassifier::new(taxonomies.get(TaxonomyName::Platform), FunctionField::Platform);
        let edge = ["aws", "azure", "gcp", "vercel"]
            .iter()
            .map(|platform| function(platform, "serverless", "http", "edge"));
        let region = std::iter::once(function("aws", "serverless", "http", "region"));
        let repositories = vec![repository(1, vec![], edge.chain(region).collect())];

        let entries = cross_tab(&repositories, &locations, &platforms).top_k(k(3));
        let edge: Vec<String> = entries
            .iter()
            .filter(|entry| entry.a == "Edge")
            .map(|entry| entry.b.to_string())
            .collect();
        assert_eq!(edge, vec!["AWS", "Azure", "Other"]);

        let region: Vec<&TopKEntry> = entries.iter().filter(|entry| entry.a == "Region").collect();
        assert_eq!(region.len(), 1);
        assert_eq!(region[0].ratio, 1.0);
    }

    #[rstest]
    #[case(&["aws", "aws"], Some(Sharing::Exclusive))]
    #[case(&["gcp", "firebase"], Some(Sharing::Exclusive))]
    #[case(&["aws", "azure"], Some(Sharing::Shared))]
    #[case(&[], None)]
    fn tags_sharing(#[case] platforms: &[&str], #[case] expected: Option<Sharing>) {
        let taxonomies = Taxonomies::builtin();
        let classifier = FunctionClassifier::new(taxonomies.get(TaxonomyName::Platform), FunctionField::Platform);
        assert_eq!(sharing(&platforms_repository(1, platforms), &classifier), expected);
    }

    #[test]
    fn sharing_rows_per_present_label() {
        let taxonomies = Taxonomies::builtin();
        let classifier = FunctionClassifier::new(taxonomies.get(TaxonomyName::Platform), FunctionField::Platform);
        let repositories = vec![
            platforms_repository(1, &["aws", "azure", "aws"]),
            platforms_repository(2, &["gcp"]),
            platforms_repository(3, &[]),
        ];

        let rows = sharing_rows(&repositories, &classifier);
        let summary: Vec<(RepositoryId, &str, u64, Sharing)> = rows
            .iter()
            .map(|row| (row.repository, row.label.as_str(), row.count, row.sharing))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "AWS", 2, Sharing::Shared),
                (1, "Azure", 1, Sharing::Shared),
                (2, "GCP", 1, Sharing::Exclusive),
            ]
        );
    }

    #[test]
    fn unknown_slice_labels_follow_canonical_ones_in_first_seen_order() {
        let taxonomies = Taxonomies::builtin();
        let locations = FunctionClassifier::new(
            taxonomies.get(TaxonomyName::ExecutionLocation),
            FunctionField::Location,
        );
        let platforms = FunctionClassifier::new(taxonomies.get(TaxonomyName::Platform), FunctionField::Platform);
        let repositories = vec![
            repository(
                1,
                vec![],
                vec![
                    function("aws", "serverless", "http", "orbit"),
                    function("azure", "azure_functions", "http", "region"),
                ],
            ),
            repository(
                2,
                vec![],
                vec![
                    function("gcp", "firebase", "http", "device"),
                    function("aws", "serverless", "http", "orbit"),
                    function("aws", "serverless", "http", "edge"),
                ],
            ),
        ];

        let table = cross_tab(&repositories, &locations, &platforms);
        assert_eq!(table.a_labels(), ["Region", "Edge", "Unknown", "orbit", "device"]);
        assert_eq!(table.count("orbit", "AWS"), 2);
        assert_eq!(table.count("device", "GCP"), 1);

        let entries = table.entries();
        let slice_order: Vec<&str> = entries.iter().map(|entry| entry.a.as_str()).dedup().collect();
        assert_eq!(slice_order, ["Region", "Edge", "Unknown", "orbit", "device"]);
        let orbit_aws = entries
            .iter()
            .position(|entry| entry.a == "orbit" && entry.b == "AWS")
            .unwrap();
        assert_eq!(orbit_aws, 3 * table.b_labels().len());
        assert_eq!(entries[orbit_aws].ratio, 1.0);

        let top: Vec<(String, String, u64)> = table
            .top_k(k(2))
            .into_iter()
            .map(|entry| (entry.a, entry.b.to_string(), entry.count))
            .collect();
        let expected = [("Region", "Azure", 1), ("Edge", "AWS", 1), ("orbit", "AWS", 2), ("device", "GCP", 1)];
        assert_eq!(
            top,
            expected
                .iter()
                .map(|(a, b, count)| (a.to_string(), b.to_string(), *count))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn cross_tab_is_independent_of_repository_order() {
        let taxonomies = Taxonomies::builtin();
        let triggers = FunctionClassifier::new(
            taxonomies.get(TaxonomyName::InvocationType),
            FunctionField::InvocationType,
        );
        let platforms = FunctionClassifier::new(taxonomies.get(TaxonomyName::Platform), FunctionField::Platform);
        let repositories = vec![
            repository(1, vec![], vec![function("aws", "serverless", "http", "region")]),
            repository(2, vec![], vec![function("azure", "azure_functions", "queue", "region")]),
            repository(3, vec![], vec![function("gcp", "firebase", "http", "region")]),
        ];
        let expected = cross_tab(&repositories, &triggers, &platforms).entries();

        for permutation in repositories.iter().cloned().permutations(repositories.len()) {
            assert_eq!(cross_tab(&permutation, &triggers, &platforms).entries(), expected);
        }
    }
}
