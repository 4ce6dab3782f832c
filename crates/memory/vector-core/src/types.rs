//! Core types for the similarity store.
//!
//! A `VectorRecord` is one embedded document with metadata; records live in
//! named collections and are matched by `RecordFilter` equality predicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Names of the logical collections used by the assistant.
pub mod collections {
    /// Student conversation history.
    pub const CONVERSATIONS: &str = "conversations";
    /// Study tips, resources, and educational content.
    pub const STUDY_KNOWLEDGE: &str = "study_knowledge";
    /// User preferences and learning patterns.
    pub const USER_CONTEXT: &str = "user_context";
}

/// Metadata attached to a stored record.
///
/// One struct covers all collections; fields that do not apply stay `None`.
/// `extra` carries free-form caller context (e.g. session id, response type).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Unique identifier of the user. Required for conversation and
    /// user-context records; enforced by the retrieval layer.
    pub user_id: Option<String>,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
    /// Knowledge item title.
    pub title: Option<String>,
    /// Knowledge item category (e.g. "study_techniques").
    pub category: Option<String>,
    /// Comma-joined knowledge tags.
    pub tags: Option<String>,
    /// Length of the user message in a conversation record.
    pub user_message_len: Option<usize>,
    /// Length of the bot response in a conversation record.
    pub response_len: Option<usize>,
    /// Comma-joined keys of a user-context record's JSON document.
    pub context_keys: Option<String>,
    /// Free-form caller-supplied context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// A single embedded record in a collection.
///
/// Invariant: the embedding and the document are always written together — a
/// record never holds a vector without its text or vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// The stored text the embedding was computed from.
    pub document: String,
    /// Vector embedding of `document`.
    pub embedding: Vec<f32>,
    /// Associated metadata.
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    /// Creates a new record with a generated UUID.
    pub fn new(document: String, embedding: Vec<f32>, metadata: RecordMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            document,
            embedding,
            metadata,
        }
    }
}

/// Conjunctive equality predicates over record metadata.
///
/// These are the only predicates the assistant uses: per-user filtering for
/// conversations/user context and exact category match for knowledge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub user_id: Option<String>,
    pub category: Option<String>,
}

impl RecordFilter {
    /// Filter matching every record.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on `user_id` equality.
    pub fn by_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Filter on `category` equality.
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// True when the record satisfies every set predicate.
    pub fn matches(&self, metadata: &RecordMetadata) -> bool {
        if let Some(ref user_id) = self.user_id {
            if metadata.user_id.as_deref() != Some(user_id.as_str()) {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if metadata.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        true
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.category.is_none()
    }
}

/// A query hit: record plus its distance to the query vector.
///
/// Distance is cosine distance (`1 - cosine similarity`); smaller means more
/// similar. Results are ordered ascending by distance.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: VectorRecord,
    pub distance: f32,
}
