use crate::locale::ACKNOWLEDGMENT;
use crate::models::{ConversationTurn, GeminiContent};

/// Separator between the current utterance and its enrichment text.
pub const CONTEXT_SEPARATOR: &str = "\n\nContext: ";

/// Builds the ordered message list for one advice request.
///
/// Layout: persona prompt as a user turn, the fixed model acknowledgment, the
/// caller's history (`user` → user, `assistant` → model, other roles dropped),
/// then the current utterance with [`CONTEXT_SEPARATOR`] and the enrichment.
/// The separator is kept even when `enrichment` is empty.
pub fn assemble(
    system_prompt: &str,
    history: &[ConversationTurn],
    utterance: &str,
    enrichment: &str,
) -> Vec<GeminiContent> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(GeminiContent::user(system_prompt));
    messages.push(GeminiContent::model(ACKNOWLEDGMENT));

    for turn in history {
        match turn.role.as_str() {
            "user" => messages.push(GeminiContent::user(turn.content.as_str())),
            "assistant" => messages.push(GeminiContent::model(turn.content.as_str())),
            other => tracing::debug!("Dropping history turn with role {:?}", other),
        }
    }

    messages.push(GeminiContent::user(format!(
        "{utterance}{CONTEXT_SEPARATOR}{enrichment}"
    )));
    messages
}
