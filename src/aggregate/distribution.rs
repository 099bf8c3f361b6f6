//! Categorical distributions of repository sub-items
//!
//! - [`per_entity_distribution`]: one repository, every canonical label present
//! - [`corpus_distribution`]: all sub-items of the corpus, flattened
//! - [`presence_distribution`]: fraction of repositories containing a label at least once
//!
//! Zero denominators yield ratios of 0 rather than NaN.

use super::classifier::{corpus_order, tally, Classifier};
use super::label_counts::LabelCounts;
use crate::common::{BucketDefinition, Repository, RepositoryId};
use hashbrown::HashSet;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

/// Count and ratio of one label
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DistributionEntry {
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Ratio")]
    pub ratio: f64,
}

/// Per-label counts and ratios in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    entries: Vec<DistributionEntry>,
    /// Denominator of every ratio
    total: u64,
}

pub(crate) fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl Distribution {
    pub(crate) fn from_counts(counts: &LabelCounts, total: u64) -> Self {
        let entries = counts
            .iter()
            .map(|(label, count)| DistributionEntry {
                label: label.to_string(),
                count,
                ratio: ratio(count, total),
            })
            .collect();

        Self { entries, total }
    }

    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DistributionEntry> {
        self.entries
    }

    /// Denominator the ratios were computed against.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Ratio of `label`, 0 if the label is absent.
    pub fn ratio(&self, label: &str) -> f64 {
        self.find(label).map(|entry| entry.ratio).unwrap_or(0.0)
    }

    /// Count of `label`, 0 if the label is absent.
    pub fn count(&self, label: &str) -> u64 {
        self.find(label).map(|entry| entry.count).unwrap_or(0)
    }

    /// Sum over all ratios; 1 for a non-empty count distribution.
    pub fn ratio_sum(&self) -> f64 {
        self.entries.iter().map(|entry| entry.ratio).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    fn find(&self, label: &str) -> Option<&DistributionEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }
}

/// Distribution of the sub-items of a single repository.
///
/// All canonical labels of the classifier are present, zero-filled; labels
/// outside the canonical order follow in first-seen order.
pub fn per_entity_distribution<C: Classifier>(repository: &Repository, classifier: &C) -> Distribution {
    let counts = LabelCounts::with_order(classifier.canonical_order());
    per_entity_distribution_in(repository, classifier, counts)
}

/// Like [`per_entity_distribution`], but zero-filled with a caller-provided label order.
pub(crate) fn per_entity_distribution_in<C: Classifier>(
    repository: &Repository,
    classifier: &C,
    mut counts: LabelCounts,
) -> Distribution {
    tally(repository, classifier, &mut counts);
    let total = counts.total();
    Distribution::from_counts(&counts, total)
}

fn corpus_counts<'r, C: Classifier>(
    repositories: impl IntoIterator<Item = &'r Repository>,
    classifier: &C,
) -> LabelCounts {
    let mut counts = LabelCounts::with_order(classifier.canonical_order());
    for repository in repositories {
        tally(repository, classifier, &mut counts);
    }
    counts
}

/// Distribution over the flattened sub-items of every repository.
pub fn corpus_distribution<C: Classifier>(repositories: &[Repository], classifier: &C) -> Distribution {
    let counts = corpus_counts(repositories, classifier);
    let total = counts.total();
    debug!(repositories = repositories.len(), items = total, "computed corpus distribution");
    Distribution::from_counts(&counts, total)
}

/// Fraction of repositories in which at least one sub-item maps to each label.
///
/// Counts are numbers of repositories and the denominator is the number of
/// repositories, so ratios do not sum to 1 in general.
pub fn presence_distribution<C: Classifier>(repositories: &[Repository], classifier: &C) -> Distribution {
    let mut counts = LabelCounts::with_order(classifier.canonical_order());
    let mut present: HashSet<&str> = HashSet::new();

    for repository in repositories {
        present.clear();
        for label in classifier.labels(repository) {
            if present.insert(label) {
                counts.add(label, 1);
            }
        }
    }

    debug!(repositories = repositories.len(), "computed presence distribution");
    Distribution::from_counts(&counts, repositories.len() as u64)
}

/// Corpus distribution of the repositories falling into one size bucket
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct BucketedDistributionEntry {
    #[tabled(rename = "Bucket")]
    pub bucket: String,
    #[tabled(rename = "Repositories")]
    pub repositories: usize,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Ratio")]
    pub ratio: f64,
}

/// Splits the corpus into size buckets and computes the corpus distribution of each.
///
/// Every bucket appears in order with every canonical label, even when no
/// repository falls into it.
pub fn bucketed_distribution<C, F>(
    repositories: &[Repository],
    buckets: &BucketDefinition,
    size_metric: F,
    classifier: &C,
) -> Vec<BucketedDistributionEntry>
where
    C: Classifier,
    F: Fn(&Repository) -> u64,
{
    let mut members: Vec<Vec<&Repository>> = vec![Vec::new(); buckets.len()];
    for repository in repositories {
        members[buckets.bin_index(size_metric(repository))].push(repository);
    }

    let order = corpus_order(repositories, classifier);
    let mut entries = Vec::new();
    for (bucket, members) in buckets.labels().zip(members) {
        let mut counts = order.clone();
        for repository in &members {
            tally(repository, classifier, &mut counts);
        }

        let total = counts.total();
        entries.extend(counts.iter().map(|(label, count)| BucketedDistributionEntry {
            bucket: bucket.to_string(),
            repositories: members.len(),
            label: label.to_string(),
            count,
            ratio: ratio(count, total),
        }));
    }

    entries
}

/// Share of one label among the sub-items of one repository
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LabelSharePoint {
    #[tabled(rename = "Repository")]
    pub repository: RepositoryId,
    #[tabled(rename = "Label")]
    pub label: String,
    /// Sub-items of the repository
    #[tabled(rename = "Total")]
    pub total: u64,
    /// Sub-items of the repository with this label
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Share")]
    pub share: f64,
}

/// One point per repository and label present in it.
///
/// Repositories without sub-items produce no points.
pub fn label_share_points<C: Classifier>(repositories: &[Repository], classifier: &C) -> Vec<LabelSharePoint> {
    let mut points = Vec::new();
    for repository in repositories {
        let distribution = per_entity_distribution(repository, classifier);
        points.extend(
            distribution
                .entries()
                .iter()
                .filter(|entry| entry.count > 0)
                .map(|entry| LabelSharePoint {
                    repository: repository.id,
                    label: entry.label.clone(),
                    total: distribution.total(),
                    count: entry.count,
                    share: entry.ratio,
                }),
        );
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::classifier::{FileCategoryClassifier, FunctionClassifier, FunctionField, Weighting};
    use crate::aggregate::test_support::{file, platforms_repository, repository};
    use crate::common::FileCategory;
    use crate::taxonomy::{Taxonomies, TaxonomyName};
    use itertools::Itertools;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-9;

    fn platform_classifier(taxonomies: &Taxonomies) -> FunctionClassifier<'_> {
        FunctionClassifier::new(taxonomies.get(TaxonomyName::Platform), FunctionField::Platform)
    }

    #[test]
    fn per_entity_distribution_counts_files_not_lines() {
        let repo = repository(
            1,
            vec![
                file(FileCategory::SourceCode, "JavaScript", 100),
                file(FileCategory::Documentation, "Markdown", 10),
            ],
            vec![],
        );

        let distribution = per_entity_distribution(&repo, &FileCategoryClassifier::default());
        let labels: Vec<&str> = distribution.labels().collect();
        assert_eq!(labels, vec!["Source Code", "Documentation", "Data", "Asset", "Other"]);
        assert_eq!(distribution.ratio("Source Code"), 0.5);
        assert_eq!(distribution.ratio("Documentation"), 0.5);
        assert_eq!(distribution.ratio("Data"), 0.0);
        assert_eq!(distribution.ratio("Asset"), 0.0);
        assert_eq!(distribution.ratio("Other"), 0.0);
        assert_eq!(distribution.total(), 2);
    }

    #[test]
    fn per_entity_distribution_by_lines_of_code() {
        let repo = repository(
            1,
            vec![
                file(FileCategory::SourceCode, "JavaScript", 90),
                file(FileCategory::Documentation, "Markdown", 10),
            ],
            vec![],
        );

        let distribution = per_entity_distribution(&repo, &FileCategoryClassifier::new(Weighting::LinesOfCode));
        assert!((distribution.ratio("Source Code") - 0.9).abs() < TOLERANCE);
        assert_eq!(distribution.total(), 100);
    }

    #[test]
    fn huge_lines_of_code_saturate_the_total() {
        let half = u64::MAX / 2 + 1;
        let repo = repository(
            1,
            vec![
                file(FileCategory::SourceCode, "JavaScript", half),
                file(FileCategory::SourceCode, "TypeScript", half),
            ],
            vec![],
        );

        let distribution = corpus_distribution(&[repo], &FileCategoryClassifier::new(Weighting::LinesOfCode));
        assert_eq!(distribution.count("Source Code"), u64::MAX);
        assert_eq!(distribution.total(), u64::MAX);
        assert_eq!(distribution.ratio("Source Code"), 1.0);
    }

    #[test]
    fn empty_repository_has_all_zero_ratios() {
        let taxonomies = Taxonomies::builtin();
        let classifier = platform_classifier(&taxonomies);
        let repo = repository(7, vec![], vec![]);

        let distribution = per_entity_distribution(&repo, &classifier);
        assert_eq!(distribution.entries().len(), classifier.canonical_order().len());
        assert_eq!(distribution.ratio_sum(), 0.0);
        assert!(distribution.entries().iter().all(|entry| entry.ratio == 0.0));
    }

    #[rstest]
    #[case(&["aws"])]
    #[case(&["aws", "azure", "gcp", "firebase"])]
    #[case(&["knative", "aws", "knative", "openwhisk", "fastly"])]
    fn per_entity_ratios_sum_to_one(#[case] platforms: &[&str]) {
        let taxonomies = Taxonomies::builtin();
        let repo = platforms_repository(1, platforms);

        let distribution = per_entity_distribution(&repo, &platform_classifier(&taxonomies));
        assert!((distribution.ratio_sum() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn unknown_tags_are_counted_under_their_own_label() {
        let taxonomies = Taxonomies::builtin();
        let repo = platforms_repository(1, &["aws", "knative", "knative"]);

        let distribution = per_entity_distribution(&repo, &platform_classifier(&taxonomies));
        assert_eq!(distribution.count("knative"), 2);
        assert_eq!(distribution.labels().last(), Some("knative"));
        assert_eq!(distribution.total(), 3);
    }

    #[test]
    fn corpus_and_presence_distributions_differ() {
        let taxonomies = Taxonomies::builtin();
        let classifier = platform_classifier(&taxonomies);
        let repositories = vec![
            platforms_repository(1, &["aws", "aws", "azure"]),
            platforms_repository(2, &["aws"]),
        ];

        let corpus = corpus_distribution(&repositories, &classifier);
        assert_eq!(corpus.ratio("AWS"), 0.75);
        assert_eq!(corpus.ratio("Azure"), 0.25);
        assert_eq!(corpus.ratio("GCP"), 0.0);

        let presence = presence_distribution(&repositories, &classifier);
        assert_eq!(presence.ratio("AWS"), 1.0);
        assert_eq!(presence.ratio("Azure"), 0.5);
        assert_eq!(presence.total(), 2);
    }

    #[test]
    fn presence_counts_a_repository_once_per_canonical_label() {
        let taxonomies = Taxonomies::builtin();
        let repositories = vec![platforms_repository(1, &["gcp", "firebase", "gcp", "gcp", "gcp"])];

        let presence = presence_distribution(&repositories, &platform_classifier(&taxonomies));
        assert_eq!(presence.count("GCP"), 1);
        assert_eq!(presence.ratio("GCP"), 1.0);

        let corpus = corpus_distribution(&repositories, &platform_classifier(&taxonomies));
        assert_eq!(corpus.count("GCP"), 5);
    }

    #[test]
    fn corpus_counts_round_trip_through_ratios() {
        let taxonomies = Taxonomies::builtin();
        let classifier = platform_classifier(&taxonomies);
        let repositories = vec![
            platforms_repository(1, &["aws", "azure", "azure"]),
            platforms_repository(2, &["vercel", "knative"]),
            platforms_repository(3, &[]),
            platforms_repository(4, &["aws", "aws", "aws", "netlify"]),
        ];

        let corpus = corpus_distribution(&repositories, &classifier);
        assert_eq!(corpus.total(), 9);
        for entry in corpus.entries() {
            let recovered = (entry.ratio * corpus.total() as f64).round() as u64;
            assert_eq!(recovered, entry.count, "label {}", entry.label);
        }

        for entry in presence_distribution(&repositories, &classifier).entries() {
            assert!(entry.ratio <= 1.0);
        }
    }

    #[test]
    fn corpus_distribution_is_independent_of_repository_order() {
        let taxonomies = Taxonomies::builtin();
        let classifier = platform_classifier(&taxonomies);
        let repositories = vec![
            platforms_repository(1, &["aws", "azure"]),
            platforms_repository(2, &["gcp"]),
            platforms_repository(3, &["aws", "aws"]),
        ];
        let expected = corpus_distribution(&repositories, &classifier);

        for permutation in repositories.iter().cloned().permutations(repositories.len()) {
            assert_eq!(corpus_distribution(&permutation, &classifier), expected);
        }
    }

    #[test]
    fn empty_corpus_has_zero_ratios() {
        let taxonomies = Taxonomies::builtin();
        let classifier = platform_classifier(&taxonomies);

        assert_eq!(corpus_distribution(&[], &classifier).ratio_sum(), 0.0);
        assert_eq!(presence_distribution(&[], &classifier).ratio_sum(), 0.0);
    }

    #[test]
    fn bucketed_distribution_groups_by_size() {
        let definition = BucketDefinition::new(vec![("1-2".to_string(), 2)], "3+").unwrap();
        let repositories = vec![
            repository(1, vec![file(FileCategory::SourceCode, "JavaScript", 1)], vec![]),
            repository(
                2,
                vec![
                    file(FileCategory::SourceCode, "JavaScript", 1),
                    file(FileCategory::Data, "JSON", 1),
                    file(FileCategory::Data, "JSON", 1),
                ],
                vec![],
            ),
        ];

        let entries = bucketed_distribution(
            &repositories,
            &definition,
            Repository::file_count,
            &FileCategoryClassifier::default(),
        );

        assert_eq!(entries.len(), 10);
        let small: Vec<&BucketedDistributionEntry> = entries.iter().filter(|entry| entry.bucket == "1-2").collect();
        assert_eq!(small[0].label, "Source Code");
        assert_eq!(small[0].ratio, 1.0);
        assert_eq!(small[0].repositories, 1);

        let large = entries
            .iter()
            .find(|entry| entry.bucket == "3+" && entry.label == "Data")
            .unwrap();
        assert_eq!(large.count, 2);
        assert!((large.ratio - 2.0 / 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn label_share_points_skip_absent_labels() {
        let taxonomies = Taxonomies::builtin();
        let repositories = vec![
            platforms_repository(1, &["aws", "aws", "azure", "aws"]),
            platforms_repository(2, &[]),
        ];

        let points = label_share_points(&repositories, &platform_classifier(&taxonomies));
        assert_eq!(
            points,
            vec![
                LabelSharePoint {
                    repository: 1,
                    label: "AWS".to_string(),
                    total: 4,
                    count: 3,
                    share: 0.75,
                },
                LabelSharePoint {
                    repository: 1,
                    label: "Azure".to_string(),
                    total: 4,
                    count: 1,
                    share: 0.25,
                },
            ]
        );
    }
}
