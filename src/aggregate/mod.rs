//! Reusable aggregation core
//!
//! Every chart of the catalogue is a composition of the components in this module,
//! parameterised by a [`Classifier`] and the taxonomy tables it normalizes with.
//! All operations take the corpus by shared reference and return freshly computed,
//! render-agnostic records.

pub mod classifier;
pub mod co_occurrence;
pub mod cross_tab;
pub mod distribution;
pub mod label_counts;
pub mod languages;
pub mod smoothing;
pub mod summary;

pub use classifier::{
    Classifier, FileCategoryClassifier, FunctionClassifier, FunctionField, LanguageClassifier, Weighting,
};
pub use co_occurrence::{co_occurrence, CoOccurrenceMatrix, LabelPair, MatrixCell, MatrixRecord, TriangularMatrix};
pub use cross_tab::{
    cross_tab, sharing, sharing_rows, top_k_with_overflow, CrossTab, CrossTabEntry, Sharing, SharingRow,
    SliceEntry, SliceLabel, TopKEntry, OVERFLOW_LABEL,
};
pub use distribution::{
    bucketed_distribution, corpus_distribution, label_share_points, per_entity_distribution,
    presence_distribution, BucketedDistributionEntry, Distribution, DistributionEntry, LabelSharePoint,
};
pub use label_counts::LabelCounts;
pub use languages::{language_breakdown, LanguageShare, ShareCriterion};
pub use smoothing::{smoothed_stacked_ratios, SmoothedPoint, SmoothedRatio, SmoothedSeries};
pub use summary::{
    corpus_summary, corpus_totals, CorpusSummary, CorpusTotals, DistinctLabelCount, LabelAverage, LabelCombination,
};
