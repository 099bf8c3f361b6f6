//! # Serverless Corpus Statistics
//!
//! Descriptive statistics over a corpus of serverless application repositories.
//!
//! The corpus is loaded once by [`parsing`], its raw tags are mapped to display
//! labels by [`taxonomy`], and [`analysis`] composes the aggregations of
//! [`aggregate`] into the flat tables written by [`common::TableWriter`].

/// Aggregations over the corpus: distributions, cross tabulations,
/// co-occurrence matrices, rolling smoothing and summaries.
pub mod aggregate;

/// The chart catalogue.
pub mod analysis;

/// Corpus data structures, buckets and table output.
pub mod common;

/// Loading the corpus export.
pub mod parsing;

/// Raw tag to canonical label mapping.
pub mod taxonomy;
