//! Language analysis

use super::AnalysisSettings;
use crate::aggregate::language_breakdown;
use crate::common::{Repository, TableError, TableWriter};

type Result<T> = core::result::Result<T, TableError>;

/// Generate `languages_by_loc_files_and_applications`
pub fn generate_language_analysis(
    repositories: &[Repository],
    settings: &AnalysisSettings,
    writer: &TableWriter,
) -> Result<()> {
    writer.write(
        "languages_by_loc_files_and_applications",
        "Languages by Lines of Code, Files and Applications",
        &language_breakdown(repositories, settings.language_top_n),
    )
}
