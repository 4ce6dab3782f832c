//! Context Retrieval Service.
//!
//! Wraps the similarity store and the embedding service with the assistant's
//! domain semantics. External interactions: EmbeddingService (query/document
//! vectors), VectorStore (insert/upsert/ANN query).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use embedding::EmbeddingService;
use vector_core::{collections, RecordFilter, RecordMetadata, VectorRecord, VectorStore};

use crate::outcome::{Retrieved, WriteOutcome};
use crate::seed::STUDY_KNOWLEDGE_SEED;

/// Conversations with distance at or above this are not relevant enough to
/// surface (similarity = 1 - distance, so this keeps similarity > 0.2).
pub const MAX_RELEVANT_DISTANCE: f32 = 0.8;

/// Default number of past conversations injected as context.
pub const DEFAULT_CONVERSATION_LIMIT: usize = 3;

/// Default number of knowledge hits returned to callers.
pub const DEFAULT_KNOWLEDGE_LIMIT: usize = 3;

/// A past exchange relevant to the current query.
#[derive(Debug, Clone)]
pub struct RelevantConversation {
    /// The stored combined document ("User: ...\nBot: ...").
    pub content: String,
    /// `1 - distance`, clamped to `[0, 1]`.
    pub similarity: f32,
    pub metadata: RecordMetadata,
}

/// A study-knowledge search hit.
#[derive(Debug, Clone)]
pub struct KnowledgeHit {
    pub title: String,
    /// The stored combined document ("{title}\n{content}").
    pub content: String,
    pub category: String,
    /// `1 - distance`, clamped to `[0, 1]`.
    pub similarity: f32,
    pub tags: Vec<String>,
}

/// Context Retrieval Service over a similarity store and an embedding service.
pub struct ContextRetrievalService {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingService>,
}

impl ContextRetrievalService {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingService>) -> Self {
        Self { store, embedder }
    }

    /// True when the embedding capability is configured, i.e. retrieval can do
    /// real work rather than degrade.
    pub fn is_available(&self) -> bool {
        self.embedder.is_configured()
    }

    /// True when the similarity store answers a probe.
    pub async fn store_reachable(&self) -> bool {
        self.store.count(collections::CONVERSATIONS).await.is_ok()
    }

    fn similarity(distance: f32) -> f32 {
        (1.0 - distance).clamp(0.0, 1.0)
    }

    /// Retrieves past conversations of `user_id` semantically relevant to
    /// `query`, most similar first, at most `limit`.
    ///
    /// Hits with distance at or above [`MAX_RELEVANT_DISTANCE`] are dropped.
    pub async fn get_relevant_conversations(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Retrieved<RelevantConversation> {
        if !self.embedder.is_configured() {
            return Retrieved::Degraded("embedding service not configured".to_string());
        }

        info!(
            user_id = %user_id,
            query_len = query.len(),
            limit = limit,
            "Retrieving relevant conversations"
        );

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Query embedding failed, skipping retrieval");
                return Retrieved::Failed(e);
            }
        };

        let hits = match self
            .store
            .query(
                collections::CONVERSATIONS,
                &query_embedding,
                &RecordFilter::by_user(user_id),
                limit,
            )
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Conversation query failed");
                return Retrieved::Failed(e);
            }
        };

        let total = hits.len();
        let relevant: Vec<RelevantConversation> = hits
            .into_iter()
            .filter(|hit| hit.distance < MAX_RELEVANT_DISTANCE)
            .map(|hit| RelevantConversation {
                content: hit.record.document,
                similarity: Self::similarity(hit.distance),
                metadata: hit.record.metadata,
            })
            .take(limit)
            .collect();

        info!(
            candidates = total,
            relevant = relevant.len(),
            "Relevant conversation retrieval done"
        );
        Retrieved::Hits(relevant)
    }

    /// Searches the study knowledge collection, optionally restricted to an
    /// exact category, at most `limit` hits. No distance threshold: callers
    /// see the raw nearest neighbors.
    pub async fn search_study_knowledge(
        &self,
        query: &str,
        category: Option<&str>,
        limit: usize,
    ) -> Retrieved<KnowledgeHit> {
        if !self.embedder.is_configured() {
            return Retrieved::Degraded("embedding service not configured".to_string());
        }

        info!(
            query_len = query.len(),
            category = ?category,
            limit = limit,
            "Searching study knowledge"
        );

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Query embedding failed, skipping knowledge search");
                return Retrieved::Failed(e);
            }
        };

        let filter = match category {
            Some(category) => RecordFilter::by_category(category),
            None => RecordFilter::any(),
        };

        let hits = match self
            .store
            .query(collections::STUDY_KNOWLEDGE, &query_embedding, &filter, limit)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Knowledge query failed");
                return Retrieved::Failed(e);
            }
        };

        let items = hits
            .into_iter()
            .map(|hit| KnowledgeHit {
                title: hit
                    .record
                    .metadata
                    .title
                    .clone()
                    .unwrap_or_else(|| "Untitled".to_string()),
                content: hit.record.document,
                category: hit
                    .record
                    .metadata
                    .category
                    .clone()
                    .unwrap_or_else(|| "general".to_string()),
                similarity: Self::similarity(hit.distance),
                tags: hit
                    .record
                    .metadata
                    .tags
                    .as_deref()
                    .map(split_tags)
                    .unwrap_or_default(),
            })
            .collect();

        Retrieved::Hits(items)
    }

    /// Stores one completed exchange as a conversation record.
    ///
    /// The embedded document is `"User: {message}\nBot: {response}"`;
    /// caller-supplied context is merged into the record's free-form metadata.
    pub async fn store_conversation(
        &self,
        user_id: &str,
        user_message: &str,
        bot_response: &str,
        context: Option<BTreeMap<String, String>>,
    ) -> WriteOutcome {
        if !self.embedder.is_configured() {
            return WriteOutcome::Degraded("embedding service not configured".to_string());
        }

        let document = format!("User: {}\nBot: {}", user_message, bot_response);

        let embedding = match self.embedder.embed(&document).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Conversation embedding failed, not stored");
                return WriteOutcome::Failed(e);
            }
        };

        let mut extra = BTreeMap::from([(
            "conversation_type".to_string(),
            "chat".to_string(),
        )]);
        if let Some(context) = context {
            extra.extend(context);
        }

        let metadata = RecordMetadata {
            user_id: Some(user_id.to_string()),
            timestamp: Utc::now(),
            user_message_len: Some(user_message.len()),
            response_len: Some(bot_response.len()),
            extra,
            ..RecordMetadata::default()
        };

        match self
            .store
            .insert(
                collections::CONVERSATIONS,
                VectorRecord::new(document, embedding, metadata),
            )
            .await
        {
            Ok(()) => {
                info!(user_id = %user_id, "Stored conversation");
                WriteOutcome::Stored
            }
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Failed to store conversation");
                WriteOutcome::Failed(e)
            }
        }
    }

    /// Stores one study-knowledge item. The embedded document is
    /// `"{title}\n{content}"`.
    pub async fn store_study_knowledge(
        &self,
        title: &str,
        content: &str,
        category: &str,
        tags: &[&str],
    ) -> WriteOutcome {
        if !self.embedder.is_configured() {
            return WriteOutcome::Degraded("embedding service not configured".to_string());
        }

        let document = format!("{}\n{}", title, content);

        let embedding = match self.embedder.embed(&document).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, title = %title, "Knowledge embedding failed, not stored");
                return WriteOutcome::Failed(e);
            }
        };

        let metadata = RecordMetadata {
            timestamp: Utc::now(),
            title: Some(title.to_string()),
            category: Some(category.to_string()),
            tags: if tags.is_empty() {
                None
            } else {
                Some(tags.join(","))
            },
            extra: BTreeMap::from([(
                "content_length".to_string(),
                content.len().to_string(),
            )]),
            ..RecordMetadata::default()
        };

        match self
            .store
            .insert(
                collections::STUDY_KNOWLEDGE,
                VectorRecord::new(document, embedding, metadata),
            )
            .await
        {
            Ok(()) => {
                info!(title = %title, "Stored knowledge item");
                WriteOutcome::Stored
            }
            Err(e) => {
                warn!(error = %e, title = %title, "Failed to store knowledge item");
                WriteOutcome::Failed(e)
            }
        }
    }

    /// Creates or replaces the user's single context record (upsert by
    /// user_id). The JSON map is stored serialized as the record document.
    pub async fn update_user_context(
        &self,
        user_id: &str,
        context: &BTreeMap<String, serde_json::Value>,
    ) -> WriteOutcome {
        if !self.embedder.is_configured() {
            return WriteOutcome::Degraded("embedding service not configured".to_string());
        }

        let document = match serde_json::to_string(context) {
            Ok(document) => document,
            Err(e) => return WriteOutcome::Failed(e.into()),
        };

        let embedding = match self.embedder.embed(&document).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Context embedding failed, not stored");
                return WriteOutcome::Failed(e);
            }
        };

        let metadata = RecordMetadata {
            user_id: Some(user_id.to_string()),
            timestamp: Utc::now(),
            context_keys: Some(
                context
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            ..RecordMetadata::default()
        };

        match self
            .store
            .upsert_by_filter(
                collections::USER_CONTEXT,
                &RecordFilter::by_user(user_id),
                VectorRecord::new(document, embedding, metadata),
            )
            .await
        {
            Ok(()) => {
                info!(user_id = %user_id, "Updated user context");
                WriteOutcome::Stored
            }
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Failed to update user context");
                WriteOutcome::Failed(e)
            }
        }
    }

    /// Reads the user's context blob; `None` when absent.
    pub async fn get_user_context(
        &self,
        user_id: &str,
    ) -> Result<Option<BTreeMap<String, serde_json::Value>>, anyhow::Error> {
        let records = self
            .store
            .get_by_filter(collections::USER_CONTEXT, &RecordFilter::by_user(user_id))
            .await?;

        let Some(record) = records.into_iter().next() else {
            return Ok(None);
        };
        let context = serde_json::from_str(&record.document)?;
        Ok(Some(context))
    }

    /// Populates the study knowledge collection from the built-in seed set.
    ///
    /// A non-empty collection is left untouched. Returns the number of items
    /// stored.
    pub async fn seed_study_knowledge(&self) -> Result<usize, anyhow::Error> {
        let existing = self.store.count(collections::STUDY_KNOWLEDGE).await?;
        if existing > 0 {
            info!(existing = existing, "Study knowledge already seeded");
            return Ok(0);
        }

        let mut stored = 0;
        for item in STUDY_KNOWLEDGE_SEED {
            if self
                .store_study_knowledge(item.title, item.content, item.category, item.tags)
                .await
                .stored()
            {
                stored += 1;
            }
        }

        info!(
            stored = stored,
            total = STUDY_KNOWLEDGE_SEED.len(),
            "Study knowledge seeding done"
        );
        Ok(stored)
    }
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
