//! Display formatting: pairs consecutive user/assistant turns into
//! conversation summaries for the history endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Turn;

/// Maximum preview length, in characters, of the user message.
pub const PREVIEW_LEN: usize = 50;

/// One completed user/assistant exchange, shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    /// Zero-based exchange index within the session.
    pub id: usize,
    pub user_message: String,
    pub bot_response: String,
    /// Timestamp of the user message.
    pub timestamp: DateTime<Utc>,
    /// First [`PREVIEW_LEN`] characters of the user message, `...`-suffixed
    /// when truncated.
    pub preview: String,
}

/// Pairs consecutive turns into summaries.
///
/// Turns are consumed two at a time in log order; a trailing unpaired turn
/// (user message still awaiting its reply) is dropped.
pub fn pair_conversations(turns: &[Turn]) -> Vec<ConversationSummary> {
    turns
        .chunks_exact(2)
        .enumerate()
        .map(|(id, pair)| ConversationSummary {
            id,
            user_message: pair[0].content.clone(),
            bot_response: pair[1].content.clone(),
            timestamp: pair[0].timestamp,
            preview: preview(&pair[0].content),
        })
        .collect()
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
