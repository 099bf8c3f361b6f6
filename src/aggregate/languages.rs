//! Share of each source language by lines of code, files and applications

use super::classifier::{LanguageClassifier, Weighting};
use super::distribution::{corpus_distribution, presence_distribution, Distribution};
use crate::common::{FileCategory, Repository};
use crate::taxonomy::Taxonomy;
use core::fmt;
use hashbrown::HashSet;
use serde::Serialize;
use tabled::Tabled;

/// What a [`LanguageShare`] is a share of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShareCriterion {
    /// Lines of code of source files
    LinesOfCode,
    /// Number of source files
    Files,
    /// Number of applications with at least one source file
    Applications,
}

impl fmt::Display for ShareCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareCriterion::LinesOfCode => f.write_str("LoC"),
            ShareCriterion::Files => f.write_str("Files"),
            ShareCriterion::Applications => f.write_str("Applications"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LanguageShare {
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Criteria")]
    pub criterion: ShareCriterion,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Share")]
    pub share: f64,
}

/// Shares of the raw source languages of the corpus under every [`ShareCriterion`].
///
/// All shares are ranked together, descending; only the first `top_n` distinct
/// languages of that ranking are kept, with every criterion of a kept language.
/// Ties keep the order lines of code, files, applications, then first-seen.
pub fn language_breakdown(repositories: &[Repository], top_n: usize) -> Vec<LanguageShare> {
    let raw = Taxonomy::new("raw_language", core::iter::empty::<(String, String)>());
    let source = LanguageClassifier::new(&raw).only(FileCategory::SourceCode);

    let by_criterion: [(ShareCriterion, Distribution); 3] = [
        (
            ShareCriterion::LinesOfCode,
            corpus_distribution(repositories, &source.weighted(Weighting::LinesOfCode)),
        ),
        (ShareCriterion::Files, corpus_distribution(repositories, &source)),
        (ShareCriterion::Applications, presence_distribution(repositories, &source)),
    ];

    let mut shares: Vec<LanguageShare> = by_criterion
        .into_iter()
        .flat_map(|(criterion, distribution)| {
            distribution.into_entries().into_iter().map(move |entry| LanguageShare {
                language: entry.label,
                criterion,
                count: entry.count,
                share: entry.ratio,
            })
        })
        .collect();
    shares.sort_by(|left, right| right.share.total_cmp(&left.share));

    let mut kept: HashSet<String> = HashSet::new();
    for share in &shares {
        if kept.len() >= top_n {
            break;
        }
        kept.insert(share.language.clone());
    }

    shares.retain(|share| kept.contains(&share.language));
    shares
}
