//! # Response Generation
//!
//! Defines the [`TextGenerator`] trait and the [`ResponseService`] built on
//! top of it. The service is a two-state machine: `Unconfigured` (no
//! credential — every call answers with a fixed apology, no external call) and
//! `Ready` (prompt assembled from the persona plus a capped history window and
//! sent to the generator). Generator failures never cross the boundary as
//! errors; they surface as fixed degraded replies.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use session_history::{Turn, TurnRole};

mod gemini;

pub use gemini::{GeminiGenerator, DEFAULT_MODEL};

/// Number of history turns (5 user/assistant exchange pairs) inlined into the
/// generation prompt.
pub const HISTORY_WINDOW_TURNS: usize = 10;

/// Reply when no credential is configured.
pub const UNCONFIGURED_REPLY: &str = "I'm sorry, but I'm not properly configured right now. \
     Please check that the Gemini API key is set correctly.";

/// Reply when the generator produced an empty or malformed response.
pub const EMPTY_REPLY: &str = "I'm having trouble generating a response right now. \
     Could you try rephrasing your question?";

/// Reply when the generation call itself failed.
pub const FAILURE_REPLY: &str = "I'm experiencing some technical difficulties. \
     Please try again in a moment.";

/// Persona/system instructions prepended to every generation request.
pub const PERSONA_PROMPT: &str = "\
You are StudyBot, an AI assistant specifically designed to help high school students with their academics and personal development. Your role is to:

1. Provide study tips, techniques, and learning strategies
2. Help with time management and organization
3. Offer motivation and encouragement
4. Assist with understanding academic concepts (but don't do homework for them)
5. Guide students in developing good study habits
6. Help with stress management and academic pressure

Keep your responses:
- Encouraging and positive
- Age-appropriate for high school students
- Focused on learning and growth
- Practical and actionable
- Concise but comprehensive (aim for 2-4 sentences unless more detail is needed)

Always encourage students to think critically and learn rather than just providing direct answers to homework questions.";

/// Text-generation interface: the seam between the response service and the
/// concrete model client, substitutable in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for the full prompt blob.
    async fn generate(&self, prompt: &str) -> Result<String, anyhow::Error>;
}

/// Outcome of one generation call.
#[derive(Debug)]
pub enum ReplyOutcome {
    /// The model produced a non-empty reply (already trimmed).
    Reply(String),
    /// No credential configured; no call was attempted.
    Unconfigured,
    /// The call succeeded but the response was empty/malformed.
    Empty,
    /// The call failed.
    Failed(anyhow::Error),
}

impl ReplyOutcome {
    /// Maps the outcome onto the user-facing text, degraded arms included.
    pub fn into_user_text(self) -> String {
        match self {
            ReplyOutcome::Reply(text) => text,
            ReplyOutcome::Unconfigured => UNCONFIGURED_REPLY.to_string(),
            ReplyOutcome::Empty => EMPTY_REPLY.to_string(),
            ReplyOutcome::Failed(_) => FAILURE_REPLY.to_string(),
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self, ReplyOutcome::Reply(_))
    }
}

enum ServiceState {
    Unconfigured,
    Ready(Arc<dyn TextGenerator>),
}

/// Response Generation Service.
pub struct ResponseService {
    state: ServiceState,
}

impl ResponseService {
    /// Service without a credential: every call yields the fixed apology.
    pub fn unconfigured() -> Self {
        Self {
            state: ServiceState::Unconfigured,
        }
    }

    /// Service over a ready generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            state: ServiceState::Ready(generator),
        }
    }

    /// Builds the service from credentials: empty API key means unconfigured.
    pub fn from_credentials(api_key: &str, model: &str) -> Self {
        if api_key.trim().is_empty() {
            warn!("GEMINI_API_KEY not set; response generation degraded");
            return Self::unconfigured();
        }
        Self::new(Arc::new(GeminiGenerator::new(
            api_key.to_string(),
            model.to_string(),
        )))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    /// Generates a reply for `user_message` given prior session history.
    ///
    /// The prompt is the persona, the last [`HISTORY_WINDOW_TURNS`] turns as
    /// `Student:`/`StudyBot:` lines, the current message, and the reply cue.
    pub async fn generate_response(&self, user_message: &str, history: &[Turn]) -> ReplyOutcome {
        let generator = match &self.state {
            ServiceState::Ready(generator) => generator,
            ServiceState::Unconfigured => return ReplyOutcome::Unconfigured,
        };

        let window_start = history.len().saturating_sub(HISTORY_WINDOW_TURNS);
        let history_lines: Vec<String> = history[window_start..]
            .iter()
            .map(|turn| match turn.role {
                TurnRole::User => prompt::student_line(&turn.content),
                TurnRole::Assistant => prompt::assistant_line(&turn.content),
            })
            .collect();

        let full_prompt =
            prompt::build_generation_prompt(PERSONA_PROMPT, &history_lines, user_message);

        info!(
            history_turns = history_lines.len(),
            prompt_len = full_prompt.len(),
            "Generating response"
        );

        match generator.generate(&full_prompt).await {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    warn!("Generator returned an empty response");
                    ReplyOutcome::Empty
                } else {
                    ReplyOutcome::Reply(trimmed.to_string())
                }
            }
            Err(e) => {
                warn!(error = %e, "Generation call failed");
                ReplyOutcome::Failed(e)
            }
        }
    }

    /// General or subject-specific study tips.
    pub async fn study_tips(&self, subject: Option<&str>) -> ReplyOutcome {
        let request = match subject {
            Some(subject) => format!(
                "Provide 3-4 specific study tips for high school {}. Make them practical and actionable.",
                subject
            ),
            None => "Provide 4-5 general study tips that would help any high school student improve their learning.".to_string(),
        };
        self.generate_response(&request, &[]).await
    }

    /// A motivational message, optionally tailored to the student's situation.
    pub async fn motivation_message(&self, context: Option<&str>) -> ReplyOutcome {
        let request = match context {
            Some(context) => format!(
                "Provide an encouraging and motivational message for a high school student who is {}. Keep it uplifting and practical.",
                context
            ),
            None => "Provide an encouraging and motivational message for high school students about the importance of perseverance in their studies.".to_string(),
        };
        self.generate_response(&request, &[]).await
    }

    /// Time management advice, optionally for a specific challenge.
    pub async fn time_management_help(&self, challenge: Option<&str>) -> ReplyOutcome {
        let request = match challenge {
            Some(challenge) => format!(
                "Help a high school student with this time management challenge: {}. Provide practical, actionable advice.",
                challenge
            ),
            None => "Provide practical time management tips specifically for high school students balancing multiple subjects and activities.".to_string(),
        };
        self.generate_response(&request, &[]).await
    }

    /// Explains a named study technique.
    pub async fn explain_study_technique(&self, technique: &str) -> ReplyOutcome {
        let request = format!(
            "Explain the {} study method to a high school student. Include how to use it effectively and what subjects it works best for.",
            technique
        );
        self.generate_response(&request, &[]).await
    }
}
