//! Canonical labels for raw taxonomy tags
//!
//! A [`Taxonomy`] maps raw tags (as written by the corpus exporter, e.g. `aws`)
//! to display labels (`AWS`) and fixes the order in which those labels are
//! iterated by every analysis. Unknown tags never fail: they pass through
//! unchanged (or map to a fixed catch-all label, for groupings such as languages).

use core::fmt;
use indexmap::IndexMap;
use serde::Deserialize;

pub mod builtin;
pub mod config;

pub use config::TaxonomyError;

/// What an unmapped raw tag normalizes to
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// The raw tag is its own canonical label
    #[default]
    Identity,
    /// Every unmapped tag collapses into this label
    Label(String),
}

/// Fixed, insertion-ordered mapping from raw tag to canonical label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    name: String,
    mapping: IndexMap<String, String>,
    order: Vec<String>,
    fallback: Fallback,
}

impl Taxonomy {
    /// Creates a taxonomy with identity fallback.
    ///
    /// Later duplicates of a raw tag replace the earlier mapping but keep its position.
    pub fn new<I, R, C>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<String>,
        C: Into<String>,
    {
        let mapping: IndexMap<String, String> = entries
            .into_iter()
            .map(|(raw, canonical)| (raw.into(), canonical.into()))
            .collect();

        let mut taxonomy = Self {
            name: name.into(),
            mapping,
            order: Vec::new(),
            fallback: Fallback::Identity,
        };
        taxonomy.rebuild_order();
        taxonomy
    }

    /// Replaces the fallback for unmapped tags.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self.rebuild_order();
        self
    }

    fn rebuild_order(&mut self) {
        let mut order: Vec<String> = Vec::with_capacity(self.mapping.len() + 1);
        let labels = self.mapping.values().map(String::as_str);
        let fallback = match &self.fallback {
            Fallback::Identity => None,
            Fallback::Label(label) => Some(label.as_str()),
        };

        for label in labels.chain(fallback) {
            if !order.iter().any(|existing| existing == label) {
                order.push(label.to_string());
            }
        }

        self.order = order;
    }

    /// Name of the taxonomy (e.g. `platform`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maps a raw tag to its canonical label.
    ///
    /// Tags absent from the mapping resolve through the [`Fallback`].
    pub fn normalize<'a>(&'a self, raw: &'a str) -> &'a str {
        match self.mapping.get(raw) {
            Some(canonical) => canonical,
            None => match &self.fallback {
                Fallback::Identity => raw,
                Fallback::Label(label) => label,
            },
        }
    }

    /// Whether the raw tag has an explicit mapping.
    pub fn is_mapped(&self, raw: &str) -> bool {
        self.mapping.contains_key(raw)
    }

    /// De-duplicated canonical labels in insertion order.
    pub fn canonical_order(&self) -> &[String] {
        &self.order
    }

    /// Raw tags from `raw_tags` that have no mapping, de-duplicated in first-seen order.
    pub fn unmapped_tags<'a>(&self, raw_tags: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let mut unmapped: Vec<&'a str> = Vec::new();
        for tag in raw_tags {
            if !self.is_mapped(tag) && !unmapped.contains(&tag) {
                unmapped.push(tag);
            }
        }
        unmapped
    }
}

/// The fixed taxonomies used across the analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyName {
    Platform,
    Framework,
    FrameworkCategory,
    InvocationType,
    ExecutionLocation,
    Language,
}

impl TaxonomyName {
    pub const ALL: [TaxonomyName; 6] = [
        TaxonomyName::Platform,
        TaxonomyName::Framework,
        TaxonomyName::FrameworkCategory,
        TaxonomyName::InvocationType,
        TaxonomyName::ExecutionLocation,
        TaxonomyName::Language,
    ];

    /// Parses the snake_case name used in configuration files.
    pub fn parse(name: &str) -> Option<Self> {
        TaxonomyName::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaxonomyName::Platform => "platform",
            TaxonomyName::Framework => "framework",
            TaxonomyName::FrameworkCategory => "framework_category",
            TaxonomyName::InvocationType => "invocation_type",
            TaxonomyName::ExecutionLocation => "execution_location",
            TaxonomyName::Language => "language",
        }
    }
}

impl fmt::Display for TaxonomyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete set of taxonomies, supplied to the analyses at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomies {
    platform: Taxonomy,
    framework: Taxonomy,
    framework_category: Taxonomy,
    invocation_type: Taxonomy,
    execution_location: Taxonomy,
    language: Taxonomy,
}

impl Taxonomies {
    /// Returns the taxonomy with the given name.
    pub fn get(&self, name: TaxonomyName) -> &Taxonomy {
        match name {
            TaxonomyName::Platform => &self.platform,
            TaxonomyName::Framework => &self.framework,
            TaxonomyName::FrameworkCategory => &self.framework_category,
            TaxonomyName::InvocationType => &self.invocation_type,
            TaxonomyName::ExecutionLocation => &self.execution_location,
            TaxonomyName::Language => &self.language,
        }
    }

    /// Replaces the taxonomy with the given name.
    pub fn set(&mut self, name: TaxonomyName, taxonomy: Taxonomy) {
        let slot = match name {
            TaxonomyName::Platform => &mut self.platform,
            TaxonomyName::Framework => &mut self.framework,
            TaxonomyName::FrameworkCategory => &mut self.framework_category,
            TaxonomyName::InvocationType => &mut self.invocation_type,
            TaxonomyName::ExecutionLocation => &mut self.execution_location,
            TaxonomyName::Language => &mut self.language,
        };
        *slot = taxonomy;
    }

    /// Maps `raw` through the named taxonomy.
    pub fn normalize<'a>(&'a self, raw: &'a str, name: TaxonomyName) -> &'a str {
        self.get(name).normalize(raw)
    }

    /// Canonical label order of the named taxonomy.
    pub fn canonical_order(&self, name: TaxonomyName) -> &[String] {
        self.get(name).canonical_order()
    }
}

impl Default for Taxonomies {
    fn default() -> Self {
        Self::builtin()
    }
}
