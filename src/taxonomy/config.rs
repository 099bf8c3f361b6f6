//! TOML overlay for the taxonomy tables
//!
//! ```toml
//! [taxonomies.platform]
//! entries = [["aws", "AWS"], ["ibm", "IBM"]]
//!
//! [taxonomies.language]
//! entries = [["Go", "Go"]]
//! fallback = { label = "Other" }
//! ```
//!
//! Every table listed in the file replaces the built-in table of the same name.

use super::{Fallback, Taxonomies, Taxonomy, TaxonomyName};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a taxonomy overlay
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("Failed to read taxonomy file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Failed to parse taxonomy file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Unknown taxonomy '{0}'")]
    UnknownTaxonomy(String),
}

type Result<T> = core::result::Result<T, TaxonomyError>;

#[derive(Debug, Default, Deserialize)]
struct TaxonomyFile {
    #[serde(default)]
    taxonomies: BTreeMap<String, TaxonomyTable>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyTable {
    /// Ordered `[raw, canonical]` pairs
    entries: Vec<(String, String)>,
    #[serde(default)]
    fallback: Fallback,
}

impl Taxonomies {
    /// Applies the tables of a TOML document on top of these taxonomies.
    pub fn overlay_toml_str(mut self, content: &str) -> Result<Self> {
        let file: TaxonomyFile = toml::from_str(content)?;

        for (key, table) in file.taxonomies {
            let name = TaxonomyName::parse(&key).ok_or(TaxonomyError::UnknownTaxonomy(key))?;
            debug!(taxonomy = %name, entries = table.entries.len(), "overriding taxonomy");
            let taxonomy = Taxonomy::new(name.as_str(), table.entries).with_fallback(table.fallback);
            self.set(name, taxonomy);
        }

        Ok(self)
    }

    /// Parses a TOML document on top of the built-in taxonomies.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::builtin().overlay_toml_str(content)
    }

    /// Loads a TOML file on top of the built-in taxonomies.
    pub fn load_overlay(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
