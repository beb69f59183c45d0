//! Conversation context derived from the tail of a chat history.

use serde::{Deserialize, Serialize};

/// Number of trailing turns inspected.
pub const CONTEXT_WINDOW: usize = 3;

/// Topic bias of the recent conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationContext {
    Initial,
    Anxiety,
    Depression,
    Sleep,
    General,
}

impl ConversationContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationContext::Initial => "initial",
            ConversationContext::Anxiety => "anxiety",
            ConversationContext::Depression => "depression",
            ConversationContext::Sleep => "sleep",
            ConversationContext::General => "general",
        }
    }
}

/// One prior message of a conversation as sent by the web client.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Turn {
    #[serde(default)]
    pub text: Option<String>,
}

impl Turn {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Checked in order; the first topic with a hit in any inspected turn wins.
const TOPICS: [(ConversationContext, &[&str]); 3] = [
    // "worri" catches worried/worries, which do not contain "worry".
    (ConversationContext::Anxiety, &["anxiety", "anxious", "worry", "worri"]),
    (ConversationContext::Depression, &["sad", "depress", "down"]),
    (ConversationContext::Sleep, &["sleep", "tired", "insomnia"]),
];

/// Derive the conversation context from the last [`CONTEXT_WINDOW`] turns.
pub fn extract_context(history: &[Turn]) -> ConversationContext {
    if history.is_empty() {
        return ConversationContext::Initial;
    }

    let window: Vec<String> = history
        .iter()
        .rev()
        .take(CONTEXT_WINDOW)
        .map(|turn| turn.text.as_deref().unwrap_or_default().to_lowercase())
        .collect();

    TOPICS
        .iter()
        .find(|(_, keywords)| {
            window
                .iter()
                .any(|text| keywords.iter().any(|k| text.contains(k)))
        })
        .map(|(context, _)| *context)
        .unwrap_or(ConversationContext::General)
}
