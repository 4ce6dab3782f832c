//! # Context Retrieval
//!
//! Domain semantics over the similarity store: per-user conversation recall
//! with a similarity threshold, study-knowledge search with category
//! filtering, and the single-per-user context blob. All operations are
//! best-effort — a missing or failing embedding capability degrades to empty
//! results and skipped writes, never to errors crossing the service boundary.

mod outcome;
mod seed;
mod service;

pub use outcome::{Retrieved, WriteOutcome};
pub use seed::{SeedItem, STUDY_KNOWLEDGE_SEED};
pub use service::{
    ContextRetrievalService, KnowledgeHit, RelevantConversation, DEFAULT_CONVERSATION_LIMIT,
    DEFAULT_KNOWLEDGE_LIMIT, MAX_RELEVANT_DISTANCE,
};
