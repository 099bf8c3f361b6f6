//! Classifiers assign canonical labels to the sub-items of a repository
//!
//! Every aggregation is parameterised by a [`Classifier`], which knows
//! - which sub-items of a repository it looks at (files or functions),
//! - the canonical label of each sub-item (or that the item is excluded),
//! - how much each sub-item weighs (1 unless counting lines of code),
//! - the canonical label order used for zero-filling and ranking.

use super::label_counts::LabelCounts;
use crate::common::{File, FileCategory, Function, Repository};
use crate::taxonomy::Taxonomy;

/// Maps the sub-items of a repository to canonical labels.
pub trait Classifier {
    /// The sub-item type (e.g. [`File`] or [`Function`]).
    type Item;

    /// The sub-items of `repository` this classifier looks at.
    fn items<'r>(&self, repository: &'r Repository) -> &'r [Self::Item];

    /// Canonical label of `item`, or [`None`] if the item is excluded.
    fn classify<'a>(&'a self, item: &'a Self::Item) -> Option<&'a str>;

    /// Weight of `item` in distributions.
    fn weight(&self, _item: &Self::Item) -> u64 {
        1
    }

    /// Canonical label order.
    fn canonical_order(&self) -> &[String];

    /// Canonical labels of the included sub-items of `repository`, in item order.
    fn labels<'a>(&'a self, repository: &'a Repository) -> impl Iterator<Item = &'a str>
    where
        Self::Item: 'a,
    {
        self.items(repository)
            .iter()
            .filter_map(move |item| self.classify(item))
    }
}

/// Sums the weights of the included sub-items of `repository` per label into `counts`.
pub(crate) fn tally<C: Classifier>(repository: &Repository, classifier: &C, counts: &mut LabelCounts) {
    for item in classifier.items(repository) {
        if let Some(label) = classifier.classify(item) {
            counts.add(label, classifier.weight(item));
        }
    }
}

/// Canonical order of `classifier` extended by every label seen in `repositories`,
/// in first-seen order.
pub(crate) fn corpus_order<C: Classifier>(repositories: &[Repository], classifier: &C) -> LabelCounts {
    let mut order = LabelCounts::with_order(classifier.canonical_order());
    for repository in repositories {
        for label in classifier.labels(repository) {
            order.touch(label);
        }
    }
    order
}

/// The taxonomy-tagged attributes of a [`Function`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionField {
    Platform,
    Framework,
    InvocationType,
    Location,
}

impl FunctionField {
    /// The raw tag of `function` for this field.
    pub fn tag(self, function: &Function) -> &str {
        match self {
            FunctionField::Platform => &function.platform,
            FunctionField::Framework => &function.framework,
            FunctionField::InvocationType => &function.invocation_type,
            FunctionField::Location => &function.location,
        }
    }
}

/// Classifies functions by one of their tags, normalized through a taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct FunctionClassifier<'t> {
    taxonomy: &'t Taxonomy,
    field: FunctionField,
}

impl<'t> FunctionClassifier<'t> {
    pub fn new(taxonomy: &'t Taxonomy, field: FunctionField) -> Self {
        Self { taxonomy, field }
    }

    pub fn taxonomy(&self) -> &'t Taxonomy {
        self.taxonomy
    }
}

impl Classifier for FunctionClassifier<'_> {
    type Item = Function;

    fn items<'r>(&self, repository: &'r Repository) -> &'r [Function] {
        &repository.functions
    }

    fn classify<'a>(&'a self, item: &'a Function) -> Option<&'a str> {
        Some(self.taxonomy.normalize(self.field.tag(item)))
    }

    fn canonical_order(&self) -> &[String] {
        self.taxonomy.canonical_order()
    }
}

/// How files contribute to a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// Every file counts once
    #[default]
    Count,
    /// Every file counts with its lines of code
    LinesOfCode,
}

impl Weighting {
    fn weight(self, file: &File) -> u64 {
        match self {
            Weighting::Count => 1,
            Weighting::LinesOfCode => file.lines_of_code,
        }
    }
}

/// Classifies files by their [`FileCategory`].
#[derive(Debug, Clone)]
pub struct FileCategoryClassifier {
    order: Vec<String>,
    weighting: Weighting,
}

impl FileCategoryClassifier {
    pub fn new(weighting: Weighting) -> Self {
        Self {
            order: FileCategory::ALL
                .iter()
                .map(|category| category.label().to_string())
                .collect(),
            weighting,
        }
    }
}

impl Default for FileCategoryClassifier {
    fn default() -> Self {
        Self::new(Weighting::Count)
    }
}

impl Classifier for FileCategoryClassifier {
    type Item = File;

    fn items<'r>(&self, repository: &'r Repository) -> &'r [File] {
        &repository.files
    }

    fn classify<'a>(&'a self, item: &'a File) -> Option<&'a str> {
        Some(item.category.label())
    }

    fn weight(&self, item: &File) -> u64 {
        self.weighting.weight(item)
    }

    fn canonical_order(&self) -> &[String] {
        &self.order
    }
}

/// Classifies files by language, optionally restricted to one [`FileCategory`].
#[derive(Debug, Clone, Copy)]
pub struct LanguageClassifier<'t> {
    taxonomy: &'t Taxonomy,
    category: Option<FileCategory>,
    weighting: Weighting,
}

impl<'t> LanguageClassifier<'t> {
    /// Languages of all files, mapped through `taxonomy`.
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self {
            taxonomy,
            category: None,
            weighting: Weighting::Count,
        }
    }

    /// Only files of `category` are classified; all others are excluded.
    pub fn only(mut self, category: FileCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn weighted(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }
}

impl Classifier for LanguageClassifier<'_> {
    type Item = File;

    fn items<'r>(&self, repository: &'r Repository) -> &'r [File] {
        &repository.files
    }

    fn classify<'a>(&'a self, item: &'a File) -> Option<&'a str> {
        match self.category {
            Some(category) if item.category != category => None,
            _ => Some(self.taxonomy.normalize(&item.language)),
        }
    }

    fn weight(&self, item: &File) -> u64 {
        self.weighting.weight(item)
    }

    fn canonical_order(&self) -> &[String] {
        self.taxonomy.canonical_order()
    }
}
