//! Lines of code analysis
//!
//! Only source code files count towards lines of code.

use super::AnalysisSettings;
use crate::aggregate::{smoothed_stacked_ratios, LanguageClassifier, Weighting};
use crate::common::buckets::{cumulative_fractions, histogram};
use crate::common::data_structures::saturating_sum;
use crate::common::{BucketDefinition, FileCategory, Repository, TableError, TableWriter};
use crate::taxonomy::{TaxonomyName, Taxonomies};

type Result<T> = core::result::Result<T, TableError>;

/// Language whose lines of code are bucketed per application.
pub const BUCKETED_LANGUAGE: &str = "JavaScript";

/// Lines of code of the source files written in `language`.
pub fn source_lines_of_code_in(repository: &Repository, language: &str) -> u64 {
    saturating_sum(
        repository
            .files
            .iter()
            .filter(|file| file.category == FileCategory::SourceCode && file.language == language)
            .map(|file| file.lines_of_code),
    )
}

/// Generate the lines of code tables
///
/// Writes:
/// - `loc_repository_distribution`: cumulative fraction of applications by lines of code
/// - `loc_language_distribution`: smoothed language mix (by lines of code) by application size
/// - `lines_of_code_per_application`: applications per lines of code bucket ([`BUCKETED_LANGUAGE`] only)
pub fn generate_lines_of_code_analysis(
    repositories: &[Repository],
    taxonomies: &Taxonomies,
    settings: &AnalysisSettings,
    writer: &TableWriter,
) -> Result<()> {
    let lines_of_code: Vec<u64> = repositories.iter().map(Repository::source_lines_of_code).collect();

    writer.write(
        "loc_repository_distribution",
        "Cumulative Fraction of Applications by Lines of Code",
        &cumulative_fractions(&lines_of_code),
    )?;

    let languages = LanguageClassifier::new(taxonomies.get(TaxonomyName::Language))
        .only(FileCategory::SourceCode)
        .weighted(Weighting::LinesOfCode);
    let smoothed = smoothed_stacked_ratios(
        repositories,
        Repository::source_lines_of_code,
        &languages,
        settings.lines_of_code_window,
    );
    writer.write(
        "loc_language_distribution",
        "Distribution of Languages by Lines of Code (Smoothed)",
        &smoothed.records(),
    )?;

    let bucketed: Vec<u64> = repositories
        .iter()
        .map(|repository| source_lines_of_code_in(repository, BUCKETED_LANGUAGE))
        .collect();
    writer.write(
        "lines_of_code_per_application",
        "Lines of Code per Application",
        &histogram(&bucketed, &BucketDefinition::lines_of_code_per_application()),
    )?;

    Ok(())
}
