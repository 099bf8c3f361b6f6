//! Common infrastructure modules shared across analyses
//!
//! This module provides reusable infrastructure for:
//! - Data structures for the repository corpus
//! - Bucket definitions, histograms and cumulative distributions
//! - Writing flat output tables

pub mod buckets;
pub mod data_structures;
pub mod tables;

// Re-export commonly used items
pub use buckets::{BucketDefinition, BucketEntry};
pub use data_structures::{File, FileCategory, Function, Repository, RepositoryId};
pub use tables::{OutputFormat, TableError, TableWriter};
