//! File count analysis
//!
//! Tables describing how many files the applications have and which categories
//! those files fall into.

use super::AnalysisSettings;
use crate::aggregate::{bucketed_distribution, corpus_distribution, smoothed_stacked_ratios, FileCategoryClassifier};
use crate::common::buckets::{cumulative_fractions, histogram};
use crate::common::{BucketDefinition, Repository, TableError, TableWriter};

type Result<T> = core::result::Result<T, TableError>;

/// Generate the file count tables
///
/// Writes:
/// - `num_files_per_application`: applications per file count bucket
/// - `number_of_files_repository_distribution`: cumulative fraction of applications by file count
/// - `number_of_files_category_distribution`: smoothed category mix by application size
/// - `number_of_files_by_category`: category mix over all files
/// - `distribution_of_files_by_category_by_application_size`: category mix per size bucket
pub fn generate_file_analysis(
    repositories: &[Repository],
    settings: &AnalysisSettings,
    writer: &TableWriter,
) -> Result<()> {
    let file_counts: Vec<u64> = repositories.iter().map(Repository::file_count).collect();
    let buckets = BucketDefinition::files_per_application();
    let categories = FileCategoryClassifier::default();

    writer.write(
        "num_files_per_application",
        "Number of Files per Application",
        &histogram(&file_counts, &buckets),
    )?;

    writer.write(
        "number_of_files_repository_distribution",
        "Cumulative Fraction of Applications by Number of Files",
        &cumulative_fractions(&file_counts),
    )?;

    let smoothed = smoothed_stacked_ratios(repositories, Repository::file_count, &categories, settings.files_window);
    writer.write(
        "number_of_files_category_distribution",
        "Distribution of File Categories by Number of Files (Smoothed)",
        &smoothed.records(),
    )?;

    writer.write(
        "number_of_files_by_category",
        "Percentage of Files by Category",
        corpus_distribution(repositories, &categories).entries(),
    )?;

    writer.write(
        "distribution_of_files_by_category_by_application_size",
        "Distribution of File Categories by Application Size",
        &bucketed_distribution(repositories, &buckets, Repository::file_count, &categories),
    )?;

    Ok(())
}
