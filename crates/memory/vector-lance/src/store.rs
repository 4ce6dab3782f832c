//! LanceDB-based vector store implementation.
//!
//! One Lance table per logical collection, created lazily on first write.
//! RecordBatch conversion, metadata predicate pushdown, and VectorStore impl.
//! External: vector-core (VectorStore, VectorRecord), lancedb, arrow.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use arrow_array::types::Float32Type;
use arrow_array::{
    Array, Float32Array, RecordBatch, RecordBatchIterator, StringArray, UInt32Array,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use vector_core::{RecordFilter, RecordMetadata, ScoredRecord, VectorRecord, VectorStore};

use crate::config::LanceConfig;

/// LanceDB-based vector store.
///
/// Provides persistent vector storage under `config.db_path`. Each collection
/// maps to one table with a fixed schema; queries push user/category equality
/// predicates down to Lance as SQL filters.
pub struct LanceVectorStore {
    pub(crate) config: LanceConfig,
    db: Arc<RwLock<lancedb::Connection>>,
}

impl LanceVectorStore {
    /// Creates a new LanceVectorStore with the given database path.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = LanceVectorStore::new("./data/lancedb").await?;
    /// ```
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::with_config(LanceConfig {
            db_path: db_path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
        .await
    }

    /// Creates a new LanceVectorStore with custom configuration.
    pub async fn with_config(config: LanceConfig) -> Result<Self> {
        // Connect to database (creates if not exists)
        let db = lancedb::connect(&config.db_path)
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to connect to LanceDB: {}", e))?;

        Ok(Self {
            config,
            db: Arc::new(RwLock::new(db)),
        })
    }

    /// Ensures the table for a collection exists, creating it if necessary.
    async fn ensure_table(&self, collection: &str) -> Result<()> {
        let db = self.db.read().await;
        let table_names = db
            .table_names()
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to list tables: {}", e))?;

        if !table_names.iter().any(|n| n == collection) {
            let schema = Self::table_schema(self.config.embedding_dim);
            db.create_empty_table(collection, schema)
                .execute()
                .await
                .map_err(|e| anyhow!("Failed to create table {}: {}", collection, e))?;
            info!(collection = %collection, "Created Lance table");
        }

        Ok(())
    }

    /// True when the collection's table already exists.
    async fn table_exists(&self, collection: &str) -> Result<bool> {
        let db = self.db.read().await;
        let table_names = db
            .table_names()
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to list tables: {}", e))?;
        Ok(table_names.iter().any(|n| n == collection))
    }

    /// Returns the schema shared by all collection tables.
    fn table_schema(embedding_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("document", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    embedding_dim as i32,
                ),
                true,
            ),
            Field::new("user_id", DataType::Utf8, true),
            Field::new("title", DataType::Utf8, true),
            Field::new("category", DataType::Utf8, true),
            Field::new("tags", DataType::Utf8, true),
            Field::new("timestamp", DataType::Utf8, false),
            Field::new("user_message_len", DataType::UInt32, true),
            Field::new("response_len", DataType::UInt32, true),
            Field::new("context_keys", DataType::Utf8, true),
            Field::new("extra", DataType::Utf8, true),
        ]))
    }

    /// Escapes a string for use inside a Lance SQL string literal.
    fn escape_sql_string(value: &str) -> String {
        value.replace('\'', "''")
    }

    /// Builds the SQL predicate for a filter; `None` when the filter is empty.
    fn filter_predicate(filter: &RecordFilter) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(ref user_id) = filter.user_id {
            parts.push(format!("user_id = '{}'", Self::escape_sql_string(user_id)));
        }
        if let Some(ref category) = filter.category {
            parts.push(format!("category = '{}'", Self::escape_sql_string(category)));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" AND "))
        }
    }

    /// Converts a VectorRecord to a single-row RecordBatch.
    fn record_to_batch(&self, record: &VectorRecord) -> Result<RecordBatch> {
        let schema = Self::table_schema(self.config.embedding_dim);
        let meta = &record.metadata;

        if record.embedding.len() != self.config.embedding_dim {
            return Err(anyhow!(
                "Embedding dimension {} does not match store dimension {}",
                record.embedding.len(),
                self.config.embedding_dim
            ));
        }

        let id_array = StringArray::from(vec![record.id.to_string()]);
        let document_array = StringArray::from(vec![record.document.as_str()]);

        let vec_data: Vec<Option<f32>> = record.embedding.iter().map(|&x| Some(x)).collect();
        let vector_array = arrow_array::FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            std::iter::once(Some(vec_data)),
            self.config.embedding_dim as i32,
        );

        let user_id_array = StringArray::from(vec![meta.user_id.as_deref()]);
        let title_array = StringArray::from(vec![meta.title.as_deref()]);
        let category_array = StringArray::from(vec![meta.category.as_deref()]);
        let tags_array = StringArray::from(vec![meta.tags.as_deref()]);
        let timestamp_array = StringArray::from(vec![meta.timestamp.to_rfc3339()]);
        let user_message_len_array =
            UInt32Array::from(vec![meta.user_message_len.map(|l| l as u32)]);
        let response_len_array = UInt32Array::from(vec![meta.response_len.map(|l| l as u32)]);
        let context_keys_array = StringArray::from(vec![meta.context_keys.as_deref()]);

        let extra_json = if meta.extra.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&meta.extra)?)
        };
        let extra_array = StringArray::from(vec![extra_json.as_deref()]);

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(id_array),
                Arc::new(document_array),
                Arc::new(vector_array),
                Arc::new(user_id_array),
                Arc::new(title_array),
                Arc::new(category_array),
                Arc::new(tags_array),
                Arc::new(timestamp_array),
                Arc::new(user_message_len_array),
                Arc::new(response_len_array),
                Arc::new(context_keys_array),
                Arc::new(extra_array),
            ],
        )?;

        Ok(batch)
    }

    fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
        batch
            .column_by_name(name)
            .ok_or_else(|| anyhow!("Missing column {}", name))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| anyhow!("Column {} is not StringArray", name))
    }

    fn optional_string(batch: &RecordBatch, name: &str, row: usize) -> Result<Option<String>> {
        let col = Self::string_column(batch, name)?;
        if col.is_null(row) {
            Ok(None)
        } else {
            Ok(Some(col.value(row).to_string()))
        }
    }

    fn optional_u32(batch: &RecordBatch, name: &str, row: usize) -> Result<Option<u32>> {
        let col = batch
            .column_by_name(name)
            .ok_or_else(|| anyhow!("Missing column {}", name))?
            .as_any()
            .downcast_ref::<UInt32Array>()
            .ok_or_else(|| anyhow!("Column {} is not UInt32Array", name))?;
        if col.is_null(row) {
            Ok(None)
        } else {
            Ok(Some(col.value(row)))
        }
    }

    /// Converts a RecordBatch row back to a VectorRecord.
    fn batch_to_record(&self, batch: &RecordBatch, row: usize) -> Result<VectorRecord> {
        let id = Uuid::parse_str(Self::string_column(batch, "id")?.value(row))?;
        let document = Self::string_column(batch, "document")?.value(row).to_string();

        let vector_col = batch
            .column_by_name("vector")
            .ok_or_else(|| anyhow!("Missing column vector"))?
            .as_any()
            .downcast_ref::<arrow_array::FixedSizeListArray>()
            .ok_or_else(|| anyhow!("Vector column is not FixedSizeListArray"))?;
        let embedding = if vector_col.is_null(row) {
            Vec::new()
        } else {
            let array = vector_col.value(row);
            let values = array
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| anyhow!("Vector values are not Float32Array"))?;
            values.iter().map(|x| x.unwrap_or(0.0)).collect()
        };

        let timestamp_raw = Self::string_column(batch, "timestamp")?.value(row).to_string();
        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_raw)?
            .with_timezone(&chrono::Utc);

        let extra = match Self::optional_string(batch, "extra", row)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| anyhow!("Malformed extra metadata JSON: {}", e))?,
            None => Default::default(),
        };

        Ok(VectorRecord {
            id,
            document,
            embedding,
            metadata: RecordMetadata {
                user_id: Self::optional_string(batch, "user_id", row)?,
                timestamp,
                title: Self::optional_string(batch, "title", row)?,
                category: Self::optional_string(batch, "category", row)?,
                tags: Self::optional_string(batch, "tags", row)?,
                user_message_len: Self::optional_u32(batch, "user_message_len", row)?
                    .map(|l| l as usize),
                response_len: Self::optional_u32(batch, "response_len", row)?.map(|l| l as usize),
                context_keys: Self::optional_string(batch, "context_keys", row)?,
                extra,
            },
        })
    }

    /// Reads the `_distance` value Lance appends to query results; 0.0 when absent.
    fn batch_distance(batch: &RecordBatch, row: usize) -> f32 {
        let Some(col) = batch.column_by_name("_distance") else {
            return 0.0;
        };
        let Some(col) = col.as_any().downcast_ref::<Float32Array>() else {
            return 0.0;
        };
        if col.is_null(row) {
            0.0
        } else {
            col.value(row)
        }
    }
}

#[async_trait]
impl VectorStore for LanceVectorStore {
    async fn insert(&self, collection: &str, record: VectorRecord) -> Result<()> {
        self.ensure_table(collection).await?;

        info!(
            collection = %collection,
            id = %record.id,
            dimension = record.embedding.len(),
            "Lance insert record"
        );

        let db = self.db.read().await;
        let table = db
            .open_table(collection)
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to open table {}: {}", collection, e))?;

        let batch = self.record_to_batch(&record)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to add record: {}", e))?;

        Ok(())
    }

    async fn upsert_by_filter(
        &self,
        collection: &str,
        filter: &RecordFilter,
        mut record: VectorRecord,
    ) -> Result<()> {
        self.ensure_table(collection).await?;

        let existing = self.get_by_filter(collection, filter).await?;
        if let Some(found) = existing.into_iter().next() {
            // Lance has no in-place update; delete then re-add under the old id.
            record.id = found.id;
            let db = self.db.read().await;
            let table = db
                .open_table(collection)
                .execute()
                .await
                .map_err(|e| anyhow!("Failed to open table {}: {}", collection, e))?;
            table
                .delete(&format!("id = '{}'", found.id))
                .await
                .map_err(|e| anyhow!("Failed to delete record: {}", e))?;
            drop(db);
        }

        self.insert(collection, record).await
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        if !self.table_exists(collection).await? {
            return Ok(Vec::new());
        }

        info!(
            collection = %collection,
            dimension = embedding.len(),
            limit = limit,
            user_id = ?filter.user_id,
            category = ?filter.category,
            "Lance vector query"
        );

        let db = self.db.read().await;
        let table = db
            .open_table(collection)
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to open table {}: {}", collection, e))?;

        let mut vector_query = table
            .query()
            .nearest_to(embedding)
            .map_err(|e| {
                error!(
                    error = %e,
                    query_dim = embedding.len(),
                    expected_dim = self.config.embedding_dim,
                    "Lance query: failed to create vector query (dimension mismatch?)"
                );
                anyhow!(
                    "Failed to create vector query (query_dim={}, expected_dim={}): {}",
                    embedding.len(),
                    self.config.embedding_dim,
                    e
                )
            })?
            .distance_type(self.config.distance_type.as_lance_metric());

        if let Some(predicate) = Self::filter_predicate(filter) {
            vector_query = vector_query.only_if(predicate);
        }
        if self.config.use_exact_search {
            vector_query = vector_query.bypass_vector_index();
        }

        let results = vector_query
            .limit(limit)
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to execute vector search: {}", e))?;

        let results = results
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| anyhow!("Failed to collect results: {}", e))?;

        let mut scored = Vec::new();
        for batch in results {
            for row in 0..batch.num_rows() {
                scored.push(ScoredRecord {
                    distance: Self::batch_distance(&batch, row),
                    record: self.batch_to_record(&batch, row)?,
                });
            }
        }
        scored.truncate(limit);

        info!(count = scored.len(), "Lance vector query done");
        Ok(scored)
    }

    async fn get_by_filter(
        &self,
        collection: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<VectorRecord>> {
        if !self.table_exists(collection).await? {
            return Ok(Vec::new());
        }

        let db = self.db.read().await;
        let table = db
            .open_table(collection)
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to open table {}: {}", collection, e))?;

        let mut query = table.query();
        if let Some(predicate) = Self::filter_predicate(filter) {
            query = query.only_if(predicate);
        }

        let results = query
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to execute query: {}", e))?;

        let results = results
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| anyhow!("Failed to collect results: {}", e))?;

        let mut records = Vec::new();
        for batch in results {
            for row in 0..batch.num_rows() {
                records.push(self.batch_to_record(&batch, row)?);
            }
        }
        Ok(records)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        if !self.table_exists(collection).await? {
            return Ok(0);
        }

        let db = self.db.read().await;
        let table = db
            .open_table(collection)
            .execute()
            .await
            .map_err(|e| anyhow!("Failed to open table {}: {}", collection, e))?;

        table
            .count_rows(None)
            .await
            .map_err(|e| anyhow!("Failed to count rows: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_record(dim: usize) -> VectorRecord {
        VectorRecord::new(
            "User: hi\nBot: hello".to_string(),
            vec![0.5; dim],
            RecordMetadata {
                user_id: Some("u1".to_string()),
                timestamp: Utc::now(),
                user_message_len: Some(2),
                response_len: Some(5),
                ..RecordMetadata::default()
            },
        )
    }

    #[test]
    fn filter_predicate_escapes_quotes() {
        let filter = RecordFilter::by_user("o'brien");
        let predicate = LanceVectorStore::filter_predicate(&filter).unwrap();
        assert_eq!(predicate, "user_id = 'o''brien'");
    }

    #[test]
    fn filter_predicate_joins_conjunction() {
        let filter = RecordFilter {
            user_id: Some("u1".to_string()),
            category: Some("motivation".to_string()),
        };
        let predicate = LanceVectorStore::filter_predicate(&filter).unwrap();
        assert_eq!(predicate, "user_id = 'u1' AND category = 'motivation'");
        assert!(LanceVectorStore::filter_predicate(&RecordFilter::any()).is_none());
    }

    #[tokio::test]
    async fn record_batch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LanceVectorStore::with_config(LanceConfig {
            db_path: dir.path().to_string_lossy().to_string(),
            embedding_dim: 4,
            ..LanceConfig::default()
        })
        .await
        .unwrap();

        let record = sample_record(4);
        let batch = store.record_to_batch(&record).unwrap();
        let restored = store.batch_to_record(&batch, 0).unwrap();

        assert_eq!(restored.id, record.id);
        assert_eq!(restored.document, record.document);
        assert_eq!(restored.embedding, record.embedding);
        assert_eq!(restored.metadata.user_id, record.metadata.user_id);
        assert_eq!(restored.metadata.user_message_len, Some(2));
    }

    #[tokio::test]
    async fn rejects_mismatched_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let store = LanceVectorStore::with_config(LanceConfig {
            db_path: dir.path().to_string_lossy().to_string(),
            embedding_dim: 8,
            ..LanceConfig::default()
        })
        .await
        .unwrap();

        assert!(store.record_to_batch(&sample_record(4)).is_err());
    }

    #[tokio::test]
    async fn insert_query_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = LanceVectorStore::with_config(LanceConfig {
            db_path: dir.path().to_string_lossy().to_string(),
            embedding_dim: 4,
            ..LanceConfig::default()
        })
        .await
        .unwrap();

        assert_eq!(store.count("conversations").await.unwrap(), 0);

        store
            .insert("conversations", sample_record(4))
            .await
            .unwrap();
        assert_eq!(store.count("conversations").await.unwrap(), 1);

        let hits = store
            .query(
                "conversations",
                &[0.5, 0.5, 0.5, 0.5],
                &RecordFilter::by_user("u1"),
                5,
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].distance < 0.01);

        let other_user = store
            .query(
                "conversations",
                &[0.5, 0.5, 0.5, 0.5],
                &RecordFilter::by_user("someone-else"),
                5,
            )
            .await
            .unwrap();
        assert!(other_user.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_matching_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = LanceVectorStore::with_config(LanceConfig {
            db_path: dir.path().to_string_lossy().to_string(),
            embedding_dim: 4,
            ..LanceConfig::default()
        })
        .await
        .unwrap();

        let filter = RecordFilter::by_user("u1");
        store
            .upsert_by_filter("user_context", &filter, sample_record(4))
            .await
            .unwrap();
        let first = store.get_by_filter("user_context", &filter).await.unwrap();
        assert_eq!(first.len(), 1);
        let original_id = first[0].id;

        let mut updated = sample_record(4);
        updated.document = "{\"grade\": \"11\"}".to_string();
        store
            .upsert_by_filter("user_context", &filter, updated)
            .await
            .unwrap();

        let records = store.get_by_filter("user_context", &filter).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, original_id);
        assert_eq!(records[0].document, "{\"grade\": \"11\"}");
    }
}
