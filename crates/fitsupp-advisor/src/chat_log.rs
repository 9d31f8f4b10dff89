use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::openai::Message;

pub const GREETING: &str = "Hi! I'm your AI Supplement Copilot. I can help you understand \
FDA-compliant supplement recommendations, answer questions about timing, dosages, \
interactions, and create personalized supplement plans based on your workout goals. \
What would you like to know?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub message: String,
}

/// Append-only conversation log, opened by the assistant greeting.
///
/// The greeting is shown to the user but never replayed to the model.
#[derive(Debug, Clone)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            entries: vec![ChatEntry {
                role: ChatRole::Assistant,
                message: GREETING.to_string(),
            }],
        }
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn push_user(&mut self, message: impl Into<String>) {
        self.entries.push(ChatEntry {
            role: ChatRole::User,
            message: message.into(),
        });
    }

    pub fn push_assistant(&mut self, message: impl Into<String>) {
        self.entries.push(ChatEntry {
            role: ChatRole::Assistant,
            message: message.into(),
        });
    }

    /// Everything after the greeting, as chat completion messages.
    pub fn replay(&self) -> Vec<Message> {
        self.entries
            .iter()
            .skip(1)
            .map(|e| match e.role {
                ChatRole::User => Message::user(e.message.clone()),
                ChatRole::Assistant => Message::assistant(e.message.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_greeting() {
        let log = ChatLog::new();
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].role, ChatRole::Assistant);
        assert!(log.replay().is_empty());
    }

    #[test]
    fn replay_skips_greeting_and_keeps_order() {
        let mut log = ChatLog::new();
        log.push_user("How much creatine?");
        log.push_assistant("5g daily.");
        log.push_user("When?");
        let replay = log.replay();
        assert_eq!(
            replay,
            vec![
                Message::user("How much creatine?"),
                Message::assistant("5g daily."),
                Message::user("When?"),
            ]
        );
    }
}
