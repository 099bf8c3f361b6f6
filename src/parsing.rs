//! Corpus loading
//!
//! The corpus is a JSON array of exported repositories, optionally compressed
//! with zstd (`.json.zst`):
//!
//! ```json
//! [
//!   {
//!     "RepositoryId": 42,
//!     "Complexity": { "Files": [{ "Category": "Source Code", "Language": "JavaScript", "LOC": 120 }] },
//!     "Functions": [{ "Platform": "aws", "Framework": "serverless", "InvocationType": "http", "Location": "region" }]
//!   }
//! ]
//! ```
//!
//! Missing `Complexity`, `Files` or `Functions` mean "none". A function's tags
//! are optional and default to the empty tag. Every other field is required; a
//! missing one fails the whole load with [`ParsingError::MalformedRecord`].

use crate::common::{File, FileCategory, Function, Repository, RepositoryId};
use hashbrown::HashSet;
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};
use zstd::Decoder;

/// Errors that can occur during corpus parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to decompress zstd file: {0}")]
    Decompression(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Malformed record {record}: missing field '{field}'")]
    MalformedRecord { record: String, field: &'static str },

    #[error("Malformed record {record}: unknown file category '{value}'")]
    UnknownCategory { record: String, value: String },
}

type Result<T> = core::result::Result<T, ParsingError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRepository {
    repository_id: Option<RepositoryId>,
    complexity: Option<RawComplexity>,
    functions: Option<Vec<RawFunction>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawComplexity {
    files: Option<Vec<RawFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFile {
    category: Option<String>,
    language: Option<String>,
    #[serde(rename = "LOC")]
    lines_of_code: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFunction {
    #[serde(default)]
    platform: String,
    #[serde(default)]
    framework: String,
    #[serde(default)]
    invocation_type: String,
    #[serde(default)]
    location: String,
}

/// Identifies a record within the corpus for error messages.
#[derive(Clone, Copy)]
struct RecordPath {
    index: usize,
    id: Option<RepositoryId>,
}

impl RecordPath {
    fn describe(self, item: Option<(&str, usize)>) -> String {
        let repository = match self.id {
            Some(id) => format!("repository #{} (id {})", self.index, id),
            None => format!("repository #{}", self.index),
        };

        match item {
            Some((kind, index)) => format!("{}, {} #{}", repository, kind, index),
            None => repository,
        }
    }

    fn require<T>(self, value: Option<T>, item: Option<(&str, usize)>, field: &'static str) -> Result<T> {
        value.ok_or_else(|| ParsingError::MalformedRecord {
            record: self.describe(item),
            field,
        })
    }
}

impl RawFile {
    fn validate(self, path: RecordPath, index: usize) -> Result<File> {
        let item = Some(("file", index));
        let category = path.require(self.category, item, "Category")?;
        let category = FileCategory::from_label(&category).ok_or_else(|| ParsingError::UnknownCategory {
            record: path.describe(item),
            value: category.clone(),
        })?;

        Ok(File {
            category,
            language: path.require(self.language, item, "Language")?,
            lines_of_code: path.require(self.lines_of_code, item, "LOC")?,
        })
    }
}

impl From<RawFunction> for Function {
    fn from(raw: RawFunction) -> Self {
        Function {
            platform: raw.platform,
            framework: raw.framework,
            invocation_type: raw.invocation_type,
            location: raw.location,
        }
    }
}

impl RawRepository {
    fn validate(self, index: usize) -> Result<Repository> {
        let path = RecordPath {
            index,
            id: self.repository_id,
        };
        let id = path.require(self.repository_id, None, "RepositoryId")?;

        let files = self
            .complexity
            .and_then(|complexity| complexity.files)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, file)| file.validate(path, index))
            .collect::<Result<Vec<_>>>()?;

        let functions = self
            .functions
            .unwrap_or_default()
            .into_iter()
            .map(Function::from)
            .collect();

        Ok(Repository { id, files, functions })
    }
}

fn validate(raw: Vec<RawRepository>) -> Result<Vec<Repository>> {
    let repositories = raw
        .into_iter()
        .enumerate()
        .map(|(index, repository)| repository.validate(index))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(repositories.len());
    for repository in &repositories {
        if !seen.insert(repository.id) {
            warn!(id = repository.id, "duplicate repository id");
        }
    }

    debug!(repositories = repositories.len(), "validated corpus");
    Ok(repositories)
}

/// Parse an uncompressed JSON corpus from a reader
pub fn parse_corpus_reader<R: Read>(reader: R) -> Result<Vec<Repository>> {
    let raw: Vec<RawRepository> = serde_json::from_reader(BufReader::new(reader))?;
    validate(raw)
}

/// Parse a JSON corpus held in memory
pub fn parse_corpus_str(content: &str) -> Result<Vec<Repository>> {
    let raw: Vec<RawRepository> = serde_json::from_str(content)?;
    validate(raw)
}

/// Parse the corpus file and load the repositories for analysis
///
/// Files ending in `.zst` are decompressed with zstd; anything else is read as
/// plain JSON.
///
/// # Arguments
/// * `file_path` - Path to the `.json` or `.json.zst` corpus
///
/// # Returns
/// * `Ok(Vec<Repository>)` - The repositories in file order
/// * `Err(ParsingError)` - If reading, decompression, JSON parsing or validation failed
pub fn parse_corpus(file_path: &Path) -> Result<Vec<Repository>> {
    let file = std::fs::File::open(file_path)?;

    let is_compressed = file_path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("zst"));

    let repositories = if is_compressed {
        let decoder = Decoder::new(file)
            .map_err(|e| ParsingError::Decompression(format!("Failed to create decoder: {}", e)))?;
        parse_corpus_reader(decoder)?
    } else {
        parse_corpus_reader(file)?
    };

    info!(
        path = %file_path.display(),
        repositories = repositories.len(),
        "loaded corpus"
    );
    Ok(repositories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const CORPUS: &str = r#"[
        {
            "RepositoryId": 7,
            "Name": "ignored",
            "Complexity": {
                "Files": [
                    { "Category": "Source Code", "Language": "JavaScript", "LOC": 120 },
                    { "Category": "Documentation", "Language": "Markdown", "LOC": 4 }
                ]
            },
            "Functions": [
                { "Platform": "aws", "Framework": "serverless", "InvocationType": "http", "Location": "region" }
            ]
        },
        { "RepositoryId": 8 }
    ]"#;

    #[test]
    fn parses_repositories_in_order() {
        let repositories = parse_corpus_str(CORPUS).unwrap();

        assert_eq!(repositories.len(), 2);
        assert_eq!(repositories[0].id, 7);
        assert_eq!(repositories[0].files.len(), 2);
        assert_eq!(repositories[0].files[0].category, FileCategory::SourceCode);
        assert_eq!(repositories[0].files[0].lines_of_code, 120);
        assert_eq!(repositories[0].functions[0].invocation_type, "http");
        assert_eq!(repositories[1].id, 8);
        assert!(repositories[1].files.is_empty());
        assert!(repositories[1].functions.is_empty());
    }

    #[rstest]
    #[case(r#"[{ "Functions": [] }]"#, "repository #0", "RepositoryId")]
    #[case(
        r#"[{ "RepositoryId": 3, "Complexity": { "Files": [{ "Category": "Data", "Language": "JSON" }] } }]"#,
        "repository #0 (id 3), file #0",
        "LOC"
    )]
    #[case(
        r#"[{ "RepositoryId": 1 }, { "RepositoryId": 2, "Complexity": { "Files": [
            { "Category": "Source Code", "Language": "JavaScript", "LOC": 1 },
            { "Category": "Source Code", "LOC": 1 }
        ] } }]"#,
        "repository #1 (id 2), file #1",
        "Language"
    )]
    fn reports_missing_fields(#[case] content: &str, #[case] expected_record: &str, #[case] expected_field: &str) {
        match parse_corpus_str(content) {
            Err(ParsingError::MalformedRecord { record, field }) => {
                assert_eq!(record, expected_record);
                assert_eq!(field, expected_field);
            }
            other => panic!("expected a malformed record, got {:?}", other),
        }
    }

    #[test]
    fn missing_function_tags_default_to_empty() {
        let content = r#"[{ "RepositoryId": 1, "Functions": [
            { "Platform": "aws", "Framework": "serverless", "InvocationType": "http" },
            {}
        ] }]"#;

        let repositories = parse_corpus_str(content).unwrap();
        let functions = &repositories[0].functions;

        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].platform, "aws");
        assert_eq!(functions[0].location, "");
        assert_eq!(functions[1].platform, "");
        assert_eq!(functions[1].invocation_type, "");
    }

    #[test]
    fn keeps_repositories_with_duplicate_ids() {
        let repositories = parse_corpus_str(r#"[{ "RepositoryId": 4 }, { "RepositoryId": 4 }]"#).unwrap();

        assert_eq!(repositories.len(), 2);
        assert!(repositories.iter().all(|repository| repository.id == 4));
    }

    #[test]
    fn rejects_unknown_categories() {
        let content = r#"[{ "RepositoryId": 1, "Complexity": { "Files": [
            { "Category": "Binary", "Language": "Unknown", "LOC": 0 }
        ] } }]"#;

        assert!(matches!(
            parse_corpus_str(content),
            Err(ParsingError::UnknownCategory { value, .. }) if value == "Binary"
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(parse_corpus_str("{"), Err(ParsingError::JsonParse(_))));
    }

    #[test]
    fn loads_plain_and_compressed_files() {
        let directory = tempfile::tempdir().unwrap();

        let plain = directory.path().join("corpus.json");
        std::fs::write(&plain, CORPUS).unwrap();

        let compressed = directory.path().join("corpus.json.zst");
        let mut file = std::fs::File::create(&compressed).unwrap();
        file.write_all(&zstd::encode_all(CORPUS.as_bytes(), 3).unwrap())
            .unwrap();
        drop(file);

        let expected = parse_corpus_str(CORPUS).unwrap();
        assert_eq!(parse_corpus(&plain).unwrap(), expected);
        assert_eq!(parse_corpus(&compressed).unwrap(), expected);

        let missing = parse_corpus(&directory.path().join("missing.json"));
        assert!(matches!(missing, Err(ParsingError::FileRead(_))));
    }
}
