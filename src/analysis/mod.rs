//! The chart catalogue
//!
//! One `generate_*` function per chart family. Each composes the aggregation
//! core into the flat tables consumed by the chart renderer and writes them
//! into its own subdirectory of the output:
//! - Files: counts, cumulative distribution and category mix
//! - Lines of code: cumulative distribution, language mix and histogram
//! - Languages: share by lines of code, files and applications
//! - Number of functions: histogram, shared/exclusive strips and label shares
//! - Taxonomies: per-function and per-application shares, matrices, top-K cross tabs
//! - Summary: corpus totals, distinct labels, averages and label combinations

pub mod files;
pub mod functions;
pub mod languages;
pub mod lines_of_code;
pub mod summary;
pub mod taxonomies;

use crate::common::{Repository, TableError, TableWriter};
use crate::parsing::ParsingError;
use crate::taxonomy::{TaxonomyError, Taxonomies};
use core::num::NonZeroUsize;
use thiserror::Error;
use tracing::info;

pub use files::generate_file_analysis;
pub use functions::generate_function_analysis;
pub use languages::generate_language_analysis;
pub use lines_of_code::generate_lines_of_code_analysis;
pub use summary::generate_summary;
pub use taxonomies::generate_taxonomy_analysis;

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Parsing error: {0}")]
    Parsing(#[from] ParsingError),

    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("Output error: {0}")]
    Table(#[from] TableError),
}

type Result<T> = core::result::Result<T, AnalysisError>;

const fn non_zero(value: usize) -> NonZeroUsize {
    NonZeroUsize::MIN.saturating_add(value - 1)
}

/// Labels kept per bar of the top-K cross tabulations.
pub const DEFAULT_TOP_K: NonZeroUsize = non_zero(5);

/// Rolling window over repositories ordered by number of files.
pub const DEFAULT_FILES_WINDOW: NonZeroUsize = non_zero(20);

/// Rolling window over repositories ordered by lines of code.
pub const DEFAULT_LINES_OF_CODE_WINDOW: NonZeroUsize = non_zero(15);

/// Buckets of the function count histogram, including the overflow bucket.
pub const DEFAULT_FUNCTION_BINS: NonZeroUsize = non_zero(20);

/// Languages kept in the language breakdown.
pub const DEFAULT_LANGUAGE_TOP_N: usize = 10;

/// Tunables of the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub top_k: NonZeroUsize,
    pub files_window: NonZeroUsize,
    pub lines_of_code_window: NonZeroUsize,
    pub function_bins: NonZeroUsize,
    pub language_top_n: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            files_window: DEFAULT_FILES_WINDOW,
            lines_of_code_window: DEFAULT_LINES_OF_CODE_WINDOW,
            function_bins: DEFAULT_FUNCTION_BINS,
            language_top_n: DEFAULT_LANGUAGE_TOP_N,
        }
    }
}

/// Generate every table of the catalogue
///
/// # Arguments
/// * `repositories` - The loaded corpus
/// * `taxonomies` - Taxonomy tables used to normalize function tags and languages
/// * `settings` - Tunables of the catalogue
/// * `writer` - Writer for the output directory; every family gets a subdirectory
///
/// # Returns
/// * `Ok(())` - If every table was written
/// * `Err(AnalysisError)` - If writing a table failed
pub fn generate_all(
    repositories: &[Repository],
    taxonomies: &Taxonomies,
    settings: &AnalysisSettings,
    writer: &TableWriter,
) -> Result<()> {
    info!(
        repositories = repositories.len(),
        output = %writer.output_dir().display(),
        "generating tables"
    );

    generate_file_analysis(repositories, settings, &writer.subdirectory("files")?)?;
    generate_lines_of_code_analysis(repositories, taxonomies, settings, &writer.subdirectory("linesOfCode")?)?;
    generate_language_analysis(repositories, settings, &writer.subdirectory("languages")?)?;
    generate_function_analysis(repositories, taxonomies, settings, &writer.subdirectory("numFunctions")?)?;
    generate_summary(repositories, taxonomies, &writer.subdirectory("summary")?)?;
    generate_taxonomy_analysis(repositories, taxonomies, settings, writer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.top_k.get(), 5);
        assert_eq!(settings.files_window.get(), 20);
        assert_eq!(settings.lines_of_code_window.get(), 15);
        assert_eq!(settings.function_bins.get(), 20);
        assert_eq!(settings.language_top_n, 10);
    }
}
