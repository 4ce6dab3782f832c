//! # In-Memory Vector Store
//!
//! In-memory implementation of the `VectorStore` trait: collections are plain
//! maps and queries are exhaustive cosine-distance scans. Data is lost on
//! restart; intended for tests and development.
//!
//! ## Thread Safety
//!
//! The store uses `Arc<RwLock<>>` to ensure thread-safe concurrent access.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use vector_core::{RecordFilter, ScoredRecord, VectorRecord, VectorStore};

/// In-memory vector store. Collections are created lazily on first write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    collections: Arc<RwLock<HashMap<String, HashMap<Uuid, VectorRecord>>>>,
}

impl InMemoryVectorStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every record from every collection.
    pub async fn clear(&self) {
        let mut collections = self.collections.write().await;
        collections.clear();
    }

    /// Calculates cosine similarity between two vectors.
    ///
    /// Empty or zero vectors yield 0.0 (avoids division by zero); mismatched
    /// dimensions compare over the shorter prefix, as `zip` stops early.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Cosine distance: `1 - cosine_similarity`, the metric the retrieval
    /// thresholds assume.
    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        1.0 - Self::cosine_similarity(a, b)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, collection: &str, record: VectorRecord) -> Result<(), anyhow::Error> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(record.id, record);
        Ok(())
    }

    async fn upsert_by_filter(
        &self,
        collection: &str,
        filter: &RecordFilter,
        mut record: VectorRecord,
    ) -> Result<(), anyhow::Error> {
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection.to_string()).or_default();

        let existing_id = records
            .values()
            .find(|r| filter.matches(&r.metadata))
            .map(|r| r.id);

        if let Some(id) = existing_id {
            record.id = id;
            records.insert(id, record);
        } else {
            records.insert(record.id, record);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, anyhow::Error> {
        let collections = self.collections.read().await;
        let Some(records) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredRecord> = records
            .values()
            .filter(|r| filter.matches(&r.metadata))
            .map(|r| ScoredRecord {
                distance: Self::cosine_distance(embedding, &r.embedding),
                record: r.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }

    async fn get_by_filter(
        &self,
        collection: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<VectorRecord>, anyhow::Error> {
        let collections = self.collections.read().await;
        let Some(records) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(records
            .values()
            .filter(|r| filter.matches(&r.metadata))
            .cloned()
            .collect())
    }

    async fn count(&self, collection: &str) -> Result<usize, anyhow::Error> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map(|c| c.len()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vector_core::RecordMetadata;

    fn record(document: &str, embedding: Vec<f32>, user_id: Option<&str>) -> VectorRecord {
        VectorRecord::new(
            document.to_string(),
            embedding,
            RecordMetadata {
                user_id: user_id.map(str::to_string),
                timestamp: Utc::now(),
                ..RecordMetadata::default()
            },
        )
    }

    #[test]
    fn cosine_similarity_identical_vectors() {
        let sim = InMemoryVectorStore::cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_orthogonal_vectors() {
        let sim = InMemoryVectorStore::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_zero_vector_is_zero() {
        assert_eq!(InMemoryVectorStore::cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(InMemoryVectorStore::cosine_similarity(&[], &[1.0]), 0.0);
    }

    #[tokio::test]
    async fn query_orders_by_ascending_distance() {
        let store = InMemoryVectorStore::new();
        store
            .insert("c", record("far", vec![0.0, 1.0], None))
            .await
            .unwrap();
        store
            .insert("c", record("near", vec![1.0, 0.05], None))
            .await
            .unwrap();
        store
            .insert("c", record("exact", vec![1.0, 0.0], None))
            .await
            .unwrap();

        let hits = store
            .query("c", &[1.0, 0.0], &RecordFilter::any(), 10)
            .await
            .unwrap();

        let docs: Vec<&str> = hits.iter().map(|h| h.record.document.as_str()).collect();
        assert_eq!(docs, vec!["exact", "near", "far"]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[tokio::test]
    async fn query_respects_filter_and_limit() {
        let store = InMemoryVectorStore::new();
        for i in 0..5 {
            store
                .insert("c", record(&format!("u1-{i}"), vec![1.0, i as f32], Some("u1")))
                .await
                .unwrap();
        }
        store
            .insert("c", record("u2", vec![1.0, 0.0], Some("u2")))
            .await
            .unwrap();

        let hits = store
            .query("c", &[1.0, 0.0], &RecordFilter::by_user("u1"), 3)
            .await
            .unwrap();

        assert_eq!(hits.len(), 3);
        assert!(hits
            .iter()
            .all(|h| h.record.metadata.user_id.as_deref() == Some("u1")));
    }

    #[tokio::test]
    async fn query_unknown_collection_is_empty() {
        let store = InMemoryVectorStore::new();
        let hits = store
            .query("missing", &[1.0], &RecordFilter::any(), 5)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_in_place_keeping_id() {
        let store = InMemoryVectorStore::new();
        let first = record("v1", vec![1.0], Some("u1"));
        let original_id = first.id;
        store.insert("c", first).await.unwrap();

        let filter = RecordFilter::by_user("u1");
        store
            .upsert_by_filter("c", &filter, record("v2", vec![0.5], Some("u1")))
            .await
            .unwrap();

        assert_eq!(store.count("c").await.unwrap(), 1);
        let records = store.get_by_filter("c", &filter).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, original_id);
        assert_eq!(records[0].document, "v2");
    }

    #[tokio::test]
    async fn upsert_inserts_when_no_match() {
        let store = InMemoryVectorStore::new();
        store
            .upsert_by_filter(
                "c",
                &RecordFilter::by_user("u1"),
                record("v1", vec![1.0], Some("u1")),
            )
            .await
            .unwrap();
        assert_eq!(store.count("c").await.unwrap(), 1);
    }
}
