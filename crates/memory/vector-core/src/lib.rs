//! # Similarity Store Core
//!
//! Core types and the storage interface for the similarity store: embedded
//! records grouped into named collections, metadata equality filters, and
//! approximate-nearest-neighbor queries.

mod store;
mod types;

pub use store::VectorStore;
pub use types::{
    collections, RecordFilter, RecordMetadata, ScoredRecord, VectorRecord,
};
