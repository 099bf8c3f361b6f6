//! Corpus summary

use super::taxonomies::DIMENSIONS;
use crate::aggregate::{corpus_summary, corpus_totals};
use crate::common::{Repository, TableError, TableWriter};
use crate::taxonomy::Taxonomies;
use tracing::info;

type Result<T> = core::result::Result<T, TableError>;

/// Generate the summary tables
///
/// Writes `corpus_totals` and, for every function dimension:
/// - `<name>_distinct_per_application`: applications per number of distinct labels
/// - `<name>_average_functions`: average functions of a label where it is present
/// - `<name>_combinations`: applications per exact set of labels
pub fn generate_summary(repositories: &[Repository], taxonomies: &Taxonomies, writer: &TableWriter) -> Result<()> {
    let totals = corpus_totals(repositories);
    info!(
        repositories = totals.repositories,
        files = totals.files,
        functions = totals.functions,
        "corpus totals"
    );
    writer.write("corpus_totals", "Corpus Totals", &[totals])?;

    for dimension in &DIMENSIONS {
        let summary = corpus_summary(repositories, &dimension.classifier(taxonomies));

        writer.write(
            &format!("{}_distinct_per_application", dimension.name),
            &format!("Applications by Number of Distinct {}s", dimension.title),
            &summary.distinct_labels,
        )?;
        writer.write(
            &format!("{}_average_functions", dimension.name),
            &format!("Average Functions per {} and Application", dimension.title),
            &summary.averages,
        )?;
        writer.write(
            &format!("{}_combinations", dimension.name),
            &format!("Applications by {} Combination", dimension.title),
            &summary.combinations,
        )?;
    }

    Ok(())
}
