//! # Prompt
//!
//! Formats the persona, conversation history, and current question into a
//! single prompt string for text-generation models that take one text blob
//! (no structured chat API — context is inlined).
//!
//! ## Format
//!
//! Blocks joined by blank lines:
//!
//! - Persona/system instructions
//! - History turns as alternating `Student:` / `StudyBot:` lines
//! - Current question as `Student: {message}`
//! - Trailing `StudyBot:` cue so the model answers in-character

/// Speaker prefix for user turns.
pub const STUDENT_PREFIX: &str = "Student:";

/// Speaker prefix for assistant turns; also used as the trailing cue.
pub const ASSISTANT_PREFIX: &str = "StudyBot:";

/// Renders one user turn as a prompt line.
pub fn student_line(content: &str) -> String {
    format!("{} {}", STUDENT_PREFIX, content)
}

/// Renders one assistant turn as a prompt line.
pub fn assistant_line(content: &str) -> String {
    format!("{} {}", ASSISTANT_PREFIX, content)
}

/// Builds the full generation prompt.
///
/// `history_lines` are already-rendered speaker lines (see [`student_line`] /
/// [`assistant_line`]), oldest first; the caller is responsible for windowing.
///
/// # Returns
///
/// One string, blocks separated by blank lines, ending with the bare
/// `StudyBot:` cue.
pub fn build_generation_prompt<H, L>(persona: &str, history_lines: H, user_message: &str) -> String
where
    H: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut blocks: Vec<String> = vec![persona.to_string()];
    for line in history_lines {
        blocks.push(line.as_ref().to_string());
    }
    blocks.push(student_line(user_message));
    blocks.push(ASSISTANT_PREFIX.to_string());
    blocks.join("\n\n")
}
