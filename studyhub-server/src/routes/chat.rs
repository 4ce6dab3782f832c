//! Chat endpoints: message exchange, history, quick responses, knowledge
//! search, and service status.
//!
//! Degraded services never fail these routes: generation falls back to fixed
//! replies and retrieval to empty results, both with HTTP 200.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::header::HeaderMap;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use generation::ReplyOutcome;
use retrieval::{KnowledgeHit, Retrieved, DEFAULT_CONVERSATION_LIMIT};
use session_history::{pair_conversations, ConversationSummary, TurnRole};

use crate::error::ApiError;
use crate::session::{extract_session, with_session_cookie};
use crate::state::AppState;

/// Hard cap on knowledge search results per request.
pub const MAX_KNOWLEDGE_RESULTS: usize = 10;

/// Default knowledge search result count when the client sends no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Number of conversation summaries returned by the history endpoint.
pub const MAX_HISTORY_CONVERSATIONS: usize = 10;

/// Reply for quick-response types the assistant does not know.
pub const UNKNOWN_QUICK_TYPE_REPLY: &str =
    "I'm not sure how to help with that. Could you ask me a specific question?";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    response: String,
    timestamp: DateTime<Utc>,
    conversation_id: usize,
}

/// `POST /api/chat` — one exchange: retrieve context, generate, log, store.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let message = body
        .message
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;
    let message = message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let session = extract_session(&headers);
    let user_id = session.id.to_string();

    let history = state.sessions.history(session.id).await?;

    // Best-effort recall of semantically similar past exchanges for this user.
    match state
        .retrieval
        .get_relevant_conversations(&user_id, &message, DEFAULT_CONVERSATION_LIMIT)
        .await
    {
        Retrieved::Hits(hits) => {
            debug!(count = hits.len(), "Relevant past conversations retrieved")
        }
        Retrieved::Degraded(reason) => debug!(reason = %reason, "Conversation recall degraded"),
        Retrieved::Failed(e) => warn!(error = %e, "Conversation recall failed"),
    }

    let outcome = state.generation.generate_response(&message, &history).await;
    if let ReplyOutcome::Failed(ref e) = outcome {
        warn!(error = %e, "Response generation failed; answering with fixed text");
    }
    let response_text = outcome.into_user_text();

    state
        .sessions
        .append(session.id, TurnRole::User, &message)
        .await?;
    let history_len = state
        .sessions
        .append(session.id, TurnRole::Assistant, &response_text)
        .await?;

    let context = BTreeMap::from([("session_id".to_string(), session.id.to_string())]);
    let stored = state
        .retrieval
        .store_conversation(&user_id, &message, &response_text, Some(context))
        .await;
    if !stored.stored() {
        debug!("Conversation not persisted to the similarity store");
    }

    // Zero-based index of the exchange just completed.
    let conversation_id = (history_len / 2).saturating_sub(1);

    info!(conversation_id = conversation_id, "Chat exchange completed");
    Ok(with_session_cookie(
        session,
        Json(ChatResponse {
            response: response_text,
            timestamp: Utc::now(),
            conversation_id,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    history: Vec<ConversationSummary>,
    total_conversations: usize,
}

/// `GET /api/chat/history` — the session's last formatted exchanges.
pub async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = extract_session(&headers);
    let turns = state.sessions.history(session.id).await?;

    let summaries = pair_conversations(&turns);
    let total_conversations = summaries.len();
    let window_start = total_conversations.saturating_sub(MAX_HISTORY_CONVERSATIONS);
    let history = summaries[window_start..].to_vec();

    Ok(with_session_cookie(
        session,
        Json(HistoryResponse {
            history,
            total_conversations,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct QuickResponseRequest {
    #[serde(rename = "type")]
    response_type: Option<String>,
    subject: Option<String>,
    context: Option<String>,
    challenge: Option<String>,
    technique: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuickResponseResponse {
    response: String,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    response_type: String,
}

/// `POST /api/chat/quick-response` — canned prompt templates behind buttons.
pub async fn quick_response(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<QuickResponseRequest>,
) -> Result<Response, ApiError> {
    let response_type = body
        .response_type
        .ok_or_else(|| ApiError::BadRequest("Response type is required".to_string()))?;

    let session = extract_session(&headers);
    let user_id = session.id.to_string();

    let outcome = match response_type.as_str() {
        "study_tips" => Some(state.generation.study_tips(body.subject.as_deref()).await),
        "motivation" => Some(
            state
                .generation
                .motivation_message(body.context.as_deref())
                .await,
        ),
        "time_management" => Some(
            state
                .generation
                .time_management_help(body.challenge.as_deref())
                .await,
        ),
        "study_technique" => {
            let technique = body.technique.as_deref().unwrap_or("Pomodoro Technique");
            Some(state.generation.explain_study_technique(technique).await)
        }
        _ => None,
    };

    let response_text = match outcome {
        Some(outcome) => {
            if let ReplyOutcome::Failed(ref e) = outcome {
                warn!(error = %e, response_type = %response_type, "Quick response generation failed");
            }
            outcome.into_user_text()
        }
        None => {
            debug!(response_type = %response_type, "Unknown quick response type");
            UNKNOWN_QUICK_TYPE_REPLY.to_string()
        }
    };

    let user_message = format!("Quick request: {}", response_type);
    state
        .sessions
        .append(session.id, TurnRole::User, &user_message)
        .await?;
    state
        .sessions
        .append(session.id, TurnRole::Assistant, &response_text)
        .await?;

    let context = BTreeMap::from([
        ("type".to_string(), "quick_response".to_string()),
        ("response_type".to_string(), response_type.clone()),
    ]);
    let stored = state
        .retrieval
        .store_conversation(&user_id, &user_message, &response_text, Some(context))
        .await;
    if !stored.stored() {
        debug!("Quick response not persisted to the similarity store");
    }

    Ok(with_session_cookie(
        session,
        Json(QuickResponseResponse {
            response: response_text,
            timestamp: Utc::now(),
            response_type,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SearchKnowledgeRequest {
    query: Option<String>,
    category: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeResult {
    title: String,
    content: String,
    category: String,
    similarity: f32,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchKnowledgeResponse {
    results: Vec<KnowledgeResult>,
    query: String,
    total_found: usize,
}

fn format_knowledge_hit(hit: KnowledgeHit) -> KnowledgeResult {
    KnowledgeResult {
        title: hit.title,
        content: hit.content,
        category: hit.category,
        similarity: (hit.similarity * 1000.0).round() / 1000.0,
        tags: hit.tags,
    }
}

/// `POST /api/chat/search-knowledge` — semantic search over the curated
/// knowledge base. The limit is clamped to [`MAX_KNOWLEDGE_RESULTS`].
pub async fn search_knowledge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SearchKnowledgeRequest>,
) -> Result<Response, ApiError> {
    let query = body
        .query
        .ok_or_else(|| ApiError::BadRequest("Search query is required".to_string()))?;
    let query = query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Search query is required".to_string()));
    }

    let session = extract_session(&headers);
    let limit = body
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_KNOWLEDGE_RESULTS);

    let retrieved = state
        .retrieval
        .search_study_knowledge(&query, body.category.as_deref(), limit)
        .await;
    if let Retrieved::Failed(ref e) = retrieved {
        warn!(error = %e, "Knowledge search failed; answering with empty results");
    }

    let results: Vec<KnowledgeResult> = retrieved
        .into_hits()
        .into_iter()
        .map(format_knowledge_hit)
        .collect();
    let total_found = results.len();

    Ok(with_session_cookie(
        session,
        Json(SearchKnowledgeResponse {
            results,
            query,
            total_found,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    message: String,
}

/// `POST /api/chat/clear-history` — drops the session's turn log.
pub async fn clear_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = extract_session(&headers);
    state.sessions.clear(session.id).await?;

    Ok(with_session_cookie(
        session,
        Json(ClearHistoryResponse {
            message: "Chat history cleared successfully".to_string(),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    gemini_configured: bool,
    vector_db_available: bool,
    session_active: bool,
    conversation_count: usize,
}

/// `GET /api/chat/status` — service health for the frontend.
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = extract_session(&headers);
    let turns = state.sessions.history(session.id).await?;

    let vector_db_available =
        state.retrieval.is_available() && state.retrieval.store_reachable().await;

    Ok(with_session_cookie(
        session,
        Json(StatusResponse {
            gemini_configured: state.generation.is_configured(),
            vector_db_available,
            session_active: !session.is_new,
            conversation_count: turns.len() / 2,
        }),
    ))
}
