//! Conversation state - the append-only message log
//!
//! The log is seeded with one system message and grows monotonically for
//! the life of the session. Messages are never reordered, removed, or
//! mutated after being appended, and no pruning or windowing is applied.

use tracing::debug;

use crate::llm::{ChatMessage, Role};

/// Ordered, append-only message log for one session
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create a conversation seeded with the system message
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// Append a message to the end of the log
    pub fn append(&mut self, message: ChatMessage) {
        debug!(role = ?message.role, len = %self.messages.len(), "Conversation::append: called");
        self.messages.push(message);
    }

    /// Read-only view of the log, in order
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages in the log
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Roles of all messages, in order (handy for assertions and tracing)
    pub fn roles(&self) -> Vec<Role> {
        self.messages.iter().map(|m| m.role).collect()
    }
}
