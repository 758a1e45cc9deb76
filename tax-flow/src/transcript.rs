use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One chat entry; never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only, insertion-ordered chat history.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Mutex<Vec<ChatMessage>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: Mutex::new(vec![ChatMessage::assistant(greeting)]),
        }
    }

    pub(crate) fn push(&self, message: ChatMessage) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_messages(&self, n: usize) -> Vec<ChatMessage> {
        let messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        let start = messages.len().saturating_sub(n);
        messages[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let transcript = Transcript::with_greeting("hello");
        transcript.push(ChatMessage::user("one"));
        transcript.push(ChatMessage::assistant("two"));

        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], ChatMessage::assistant("hello"));
        assert_eq!(messages[1], ChatMessage::user("one"));
        assert_eq!(messages[2], ChatMessage::assistant("two"));
    }

    #[test]
    fn last_messages_handles_short_history() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        transcript.push(ChatMessage::user("only"));

        assert_eq!(transcript.last_messages(5), vec![ChatMessage::user("only")]);
        assert!(transcript.last_messages(0).is_empty());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
