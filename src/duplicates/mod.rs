//! Duplicate detection module.
//!
//! This module provides:
//! - [`indexer`]: The direct and hash-assisted indexing strategies
//! - [`mapping`]: The per-file duplicate mapping they produce

pub mod indexer;
pub mod mapping;

pub use indexer::{canonical_order, DuplicateIndexer, IndexError, IndexerConfig, Strategy};
pub use mapping::{DuplicateGroup, DuplicateMapping};
