//! Flat output tables handed to the chart renderer
//!
//! Every analysis produces an ordered sequence of records. This module writes
//! such sequences into an output directory as pretty-printed JSON (for the
//! renderer) and/or as ASCII tables using the [`tabled`] crate (for humans).

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while writing tables
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to write table: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize table: {0}")]
    Serialize(#[from] serde_json::Error),
}

type Result<T> = core::result::Result<T, TableError>;

/// Which representations of a table get written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// ASCII tables in `.txt` files
    Text,
    /// JSON arrays in `.json` files
    Json,
    /// Both of the above
    #[default]
    Both,
}

impl OutputFormat {
    fn writes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    fn writes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

/// Formats rows as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `rows` - The records to format
/// * `title` - Optional title for the table
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_table<T: Tabled>(rows: &[T], title: Option<&str>) -> String {
    let body = if rows.is_empty() {
        "No data available".to_string()
    } else {
        Table::new(rows).to_string()
    };

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), body)
    } else {
        body
    }
}

/// Writes named tables into an output directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl TableWriter {
    /// Creates a writer, creating the output directory if needed.
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir, format })
    }

    /// Directory the tables are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writer for a subdirectory of this writer's directory, with the same format.
    pub fn subdirectory(&self, name: &str) -> Result<Self> {
        Self::new(self.output_dir.join(name), self.format)
    }

    /// Writes `rows` as `<name>.json` and/or `<name>.txt`.
    pub fn write<T: Serialize + Tabled>(&self, name: &str, title: &str, rows: &[T]) -> Result<()> {
        if self.format.writes_json() {
            let path = self.output_dir.join(format!("{}.json", name));
            fs::write(&path, serde_json::to_string_pretty(rows)?)?;
        }

        if self.format.writes_text() {
            let path = self.output_dir.join(format!("{}.txt", name));
            fs::write(&path, format_table(rows, Some(title)))?;
        }

        info!(table = name, rows = rows.len(), "wrote table");
        Ok(())
    }
}
