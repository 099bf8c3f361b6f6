use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of a repository within the corpus.
pub type RepositoryId = i64;

/// Sums `values`, saturating at `u64::MAX` instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

/// Coarse classification of a file, assigned from its extension by the corpus exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    SourceCode,
    Documentation,
    Data,
    Asset,
    Other,
}

impl FileCategory {
    /// All categories in display order.
    pub const ALL: [FileCategory; 5] = [
        FileCategory::SourceCode,
        FileCategory::Documentation,
        FileCategory::Data,
        FileCategory::Asset,
        FileCategory::Other,
    ];

    /// Display label, as written by the corpus exporter.
    pub fn label(self) -> &'static str {
        match self {
            FileCategory::SourceCode => "Source Code",
            FileCategory::Documentation => "Documentation",
            FileCategory::Data => "Data",
            FileCategory::Asset => "Asset",
            FileCategory::Other => "Other",
        }
    }

    /// Parses a category from either its display label (`Source Code`)
    /// or its identifier form (`SourceCode`).
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "Source Code" | "SourceCode" => Some(FileCategory::SourceCode),
            "Documentation" => Some(FileCategory::Documentation),
            "Data" => Some(FileCategory::Data),
            "Asset" => Some(FileCategory::Asset),
            "Other" => Some(FileCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single file of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    /// Category derived from the file extension
    pub category: FileCategory,
    /// Language derived from the file extension (e.g. `JavaScript`)
    pub language: String,
    /// Number of lines of code
    pub lines_of_code: u64,
}

/// A deployed serverless function discovered in a repository.
///
/// All fields are raw taxonomy tags (e.g. `aws`, `http`); they are mapped to
/// display labels by a [`Taxonomy`](crate::taxonomy::Taxonomy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub platform: String,
    pub framework: String,
    pub invocation_type: String,
    pub location: String,
}

/// A serverless application repository, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Unique repository identifier
    pub id: RepositoryId,
    /// Files in the order reported by the exporter
    pub files: Vec<File>,
    /// Functions in the order reported by the exporter
    pub functions: Vec<Function>,
}

impl Repository {
    /// Number of files in the repository.
    pub fn file_count(&self) -> u64 {
        self.files.len() as u64
    }

    /// Number of functions in the repository.
    pub fn function_count(&self) -> u64 {
        self.functions.len() as u64
    }

    /// Lines of code over all files of the given category.
    pub fn lines_of_code_in(&self, category: FileCategory) -> u64 {
        saturating_sum(
            self.files
                .iter()
                .filter(|file| file.category == category)
                .map(|file| file.lines_of_code),
        )
    }

    /// Lines of code over all source code files.
    pub fn source_lines_of_code(&self) -> u64 {
        self.lines_of_code_in(FileCategory::SourceCode)
    }
}
