//! Function count analysis

use super::lines_of_code::{source_lines_of_code_in, BUCKETED_LANGUAGE};
use super::taxonomies::{Dimension, DIMENSIONS, EXECUTION_LOCATIONS, TRIGGER_TYPES};
use super::AnalysisSettings;
use crate::aggregate::{label_share_points, sharing_rows};
use crate::common::buckets::histogram;
use crate::common::{BucketDefinition, FileCategory, Repository, RepositoryId, TableError, TableWriter};
use crate::taxonomy::Taxonomies;
use serde::Serialize;
use tabled::Tabled;

type Result<T> = core::result::Result<T, TableError>;

/// Lines of code and number of functions of one application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Tabled)]
pub struct SizePoint {
    #[tabled(rename = "Repository")]
    pub repository: RepositoryId,
    #[tabled(rename = "LoC")]
    pub lines_of_code: u64,
    #[tabled(rename = "Functions")]
    pub functions: u64,
}

/// One point per application with a source file in [`BUCKETED_LANGUAGE`], even an empty one.
pub fn size_points(repositories: &[Repository]) -> Vec<SizePoint> {
    repositories
        .iter()
        .filter(|repository| {
            repository
                .files
                .iter()
                .any(|file| file.category == FileCategory::SourceCode && file.language == BUCKETED_LANGUAGE)
        })
        .map(|repository| SizePoint {
            repository: repository.id,
            lines_of_code: source_lines_of_code_in(repository, BUCKETED_LANGUAGE),
            functions: repository.function_count(),
        })
        .collect()
}

fn per_dimension_name(dimension: &Dimension) -> String {
    format!("num_functions_per_{}", dimension.singular)
}

/// Generate the function count tables
///
/// Writes:
/// - `function_count_distribution`: applications per number of functions
/// - `num_functions_per_<dimension>`: functions per label and application, tagged shared or exclusive
/// - `trigger_types_and_num_functions`: share of each trigger type within each application
/// - `execution_location_and_num_functions`: share of each execution location within each application
/// - `javascript_loc_and_num_functions`: lines of code against number of functions
pub fn generate_function_analysis(
    repositories: &[Repository],
    taxonomies: &Taxonomies,
    settings: &AnalysisSettings,
    writer: &TableWriter,
) -> Result<()> {
    let function_counts: Vec<u64> = repositories.iter().map(Repository::function_count).collect();
    writer.write(
        "function_count_distribution",
        "Number of Functions per Application",
        &histogram(&function_counts, &BucketDefinition::function_count(settings.function_bins)),
    )?;

    for dimension in &DIMENSIONS {
        writer.write(
            &per_dimension_name(dimension),
            &format!("Number of Functions per {}", dimension.title),
            &sharing_rows(repositories, &dimension.classifier(taxonomies)),
        )?;
    }

    writer.write(
        "trigger_types_and_num_functions",
        "Share of Trigger Types by Number of Functions",
        &label_share_points(repositories, &TRIGGER_TYPES.classifier(taxonomies)),
    )?;

    writer.write(
        "execution_location_and_num_functions",
        "Share of Execution Locations by Number of Functions",
        &label_share_points(repositories, &EXECUTION_LOCATIONS.classifier(taxonomies)),
    )?;

    writer.write(
        "javascript_loc_and_num_functions",
        "JavaScript Lines of Code and Number of Functions",
        &size_points(repositories),
    )?;

    Ok(())
}
