//! Per-taxonomy analysis of functions
//!
//! Every function tag (platform, framework, framework category, trigger type
//! and execution location) gets the same set of tables: shares per function
//! and per application, a co-occurrence matrix, and top-K cross tabulations
//! against the other tags.

use super::AnalysisSettings;
use crate::aggregate::{
    co_occurrence, corpus_distribution, cross_tab, presence_distribution, FunctionClassifier, FunctionField,
};
use crate::common::{Repository, TableError, TableWriter};
use crate::taxonomy::{TaxonomyName, Taxonomies};
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

type Result<T> = core::result::Result<T, TableError>;

/// A function tag analysed under one taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    /// Prefix of the table names, e.g. `platforms`
    pub name: &'static str,
    /// Singular of `name`, e.g. `platform`
    pub singular: &'static str,
    /// Singular display name, e.g. `Platform`
    pub title: &'static str,
    /// Output subdirectory
    pub directory: &'static str,
    pub taxonomy: TaxonomyName,
    pub field: FunctionField,
}

impl Dimension {
    /// Classifier for this dimension under `taxonomies`.
    pub fn classifier<'t>(&self, taxonomies: &'t Taxonomies) -> FunctionClassifier<'t> {
        FunctionClassifier::new(taxonomies.get(self.taxonomy), self.field)
    }
}

pub const PLATFORMS: Dimension = Dimension {
    name: "platforms",
    singular: "platform",
    title: "Platform",
    directory: "platforms",
    taxonomy: TaxonomyName::Platform,
    field: FunctionField::Platform,
};

pub const FRAMEWORKS: Dimension = Dimension {
    name: "frameworks",
    singular: "framework",
    title: "Framework",
    directory: "frameworks",
    taxonomy: TaxonomyName::Framework,
    field: FunctionField::Framework,
};

pub const FRAMEWORK_CATEGORIES: Dimension = Dimension {
    name: "framework_categories",
    singular: "framework_category",
    title: "Framework Category",
    directory: "frameworks",
    taxonomy: TaxonomyName::FrameworkCategory,
    field: FunctionField::Framework,
};

pub const TRIGGER_TYPES: Dimension = Dimension {
    name: "trigger_types",
    singular: "trigger_type",
    title: "Trigger Type",
    directory: "triggerTypes",
    taxonomy: TaxonomyName::InvocationType,
    field: FunctionField::InvocationType,
};

pub const EXECUTION_LOCATIONS: Dimension = Dimension {
    name: "execution_locations",
    singular: "execution_location",
    title: "Execution Location",
    directory: "executionLocations",
    taxonomy: TaxonomyName::ExecutionLocation,
    field: FunctionField::Location,
};

/// Every function dimension, in catalogue order.
pub const DIMENSIONS: [Dimension; 5] = [PLATFORMS, FRAMEWORKS, FRAMEWORK_CATEGORIES, TRIGGER_TYPES, EXECUTION_LOCATIONS];

/// `(segments, bars)` of the top-K cross tabulations: `<segments>_per_<bar>`.
const CROSS_TABS: [(Dimension, Dimension); 10] = [
    (PLATFORMS, TRIGGER_TYPES),
    (PLATFORMS, EXECUTION_LOCATIONS),
    (FRAMEWORKS, TRIGGER_TYPES),
    (FRAMEWORKS, EXECUTION_LOCATIONS),
    (TRIGGER_TYPES, EXECUTION_LOCATIONS),
    (TRIGGER_TYPES, FRAMEWORKS),
    (TRIGGER_TYPES, PLATFORMS),
    (EXECUTION_LOCATIONS, TRIGGER_TYPES),
    (EXECUTION_LOCATIONS, FRAMEWORKS),
    (EXECUTION_LOCATIONS, PLATFORMS),
];

/// Share of a label among applications and among functions
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ApplicationAndFunctionShare {
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Applications")]
    pub applications: f64,
    #[tabled(rename = "Functions")]
    pub functions: f64,
}

/// Logs raw tags of `dimension` that have no mapping in its taxonomy, once per tag.
fn warn_unmapped(repositories: &[Repository], taxonomies: &Taxonomies, dimension: &Dimension) {
    let taxonomy = taxonomies.get(dimension.taxonomy);
    let tags = repositories
        .iter()
        .flat_map(|repository| &repository.functions)
        .map(|function| dimension.field.tag(function));

    for tag in taxonomy.unmapped_tags(tags) {
        warn!(taxonomy = %dimension.taxonomy, tag, "tag has no canonical label; using it as is");
    }
}

/// Generate the tables of one dimension
///
/// Writes, into the dimension's subdirectory:
/// - `<name>_per_function`: share of functions per label
/// - `<name>_per_application`: share of applications containing each label
/// - `<name>_per_application_and_function`: both of the above side by side
/// - `<name>_matrix`: lower triangle of the co-occurrence matrix
/// - `<name>_pairs`: every co-occurring label pair
pub fn generate_dimension_analysis(
    repositories: &[Repository],
    taxonomies: &Taxonomies,
    dimension: &Dimension,
    writer: &TableWriter,
) -> Result<()> {
    warn_unmapped(repositories, taxonomies, dimension);
    let classifier = dimension.classifier(taxonomies);

    let per_function = corpus_distribution(repositories, &classifier);
    let per_application = presence_distribution(repositories, &classifier);

    writer.write(
        &format!("{}_per_function", dimension.name),
        &format!("Percentage of Functions per {}", dimension.title),
        per_function.entries(),
    )?;

    writer.write(
        &format!("{}_per_application", dimension.name),
        &format!("Percentage of Applications per {}", dimension.title),
        per_application.entries(),
    )?;

    let combined: Vec<ApplicationAndFunctionShare> = per_application
        .entries()
        .iter()
        .map(|entry| ApplicationAndFunctionShare {
            label: entry.label.clone(),
            applications: entry.ratio,
            functions: per_function.ratio(&entry.label),
        })
        .collect();
    writer.write(
        &format!("{}_per_application_and_function", dimension.name),
        &format!("Percentage of Applications and Functions per {}", dimension.title),
        &combined,
    )?;

    let matrix = co_occurrence(repositories, &classifier);
    writer.write(
        &format!("{}_matrix", dimension.name),
        &format!("Applications per {} Pair", dimension.title),
        &matrix.triangular().records(),
    )?;
    writer.write(
        &format!("{}_pairs", dimension.name),
        &format!("Co-occurring {} Pairs", dimension.title),
        &matrix.pairs(),
    )?;

    Ok(())
}

/// Table name of the cross tabulation of `segments` within each label of `bars`.
pub fn cross_tab_name(segments: &Dimension, bars: &Dimension) -> String {
    format!("{}_per_{}", segments.name, bars.singular)
}

/// Generate the top-K cross tabulation of `segments` within each label of `bars`
///
/// Written as `<segments>_per_<bar>` into the subdirectory of `segments`.
pub fn generate_cross_tab_analysis(
    repositories: &[Repository],
    taxonomies: &Taxonomies,
    segments: &Dimension,
    bars: &Dimension,
    settings: &AnalysisSettings,
    writer: &TableWriter,
) -> Result<()> {
    let table = cross_tab(
        repositories,
        &bars.classifier(taxonomies),
        &segments.classifier(taxonomies),
    );

    writer.write(
        &cross_tab_name(segments, bars),
        &format!("Distribution of {}s per {}", segments.title, bars.title),
        &table.top_k(settings.top_k),
    )
}

/// Generate the tables of every dimension and every cross tabulation
pub fn generate_taxonomy_analysis(
    repositories: &[Repository],
    taxonomies: &Taxonomies,
    settings: &AnalysisSettings,
    writer: &TableWriter,
) -> Result<()> {
    for dimension in &DIMENSIONS {
        let directory = writer.subdirectory(dimension.directory)?;
        generate_dimension_analysis(repositories, taxonomies, dimension, &directory)?;
    }

    for (segments, bars) in &CROSS_TABS {
        let directory = writer.subdirectory(segments.directory)?;
        generate_cross_tab_analysis(repositories, taxonomies, segments, bars, settings, &directory)?;
    }

    Ok(())
}
