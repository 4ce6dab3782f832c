//! Similarity store interface.
//!
//! Backends implement `VectorStore` over named collections of embedded
//! records. Calls are independent: no transactional guarantees span records.

use async_trait::async_trait;

use crate::types::{RecordFilter, ScoredRecord, VectorRecord};

/// Trait for storing and querying embedded records.
///
/// Results of `query` are ordered ascending by distance (most similar first)
/// and are at most `limit` long — shorter when fewer records match the filter.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Appends one record to a collection.
    async fn insert(&self, collection: &str, record: VectorRecord) -> Result<(), anyhow::Error>;

    /// Replaces the first record matching `filter` (keeping its id), or inserts
    /// `record` when nothing matches.
    async fn upsert_by_filter(
        &self,
        collection: &str,
        filter: &RecordFilter,
        record: VectorRecord,
    ) -> Result<(), anyhow::Error>;

    /// Approximate nearest neighbors of `embedding` among records matching
    /// `filter`, ascending by distance, at most `limit` results.
    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, anyhow::Error>;

    /// Metadata-only lookup: all records matching `filter`, unordered.
    async fn get_by_filter(
        &self,
        collection: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<VectorRecord>, anyhow::Error>;

    /// Number of records in a collection.
    async fn count(&self, collection: &str) -> Result<usize, anyhow::Error>;
}
