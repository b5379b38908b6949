// src/conversation.rs

use crate::chat_message::ChatMessage;

/// Ordered message log shown to the view. Insertion order is display order.
#[derive(Debug, Default)]
pub struct ChatSessionStore {
    messages: Vec<ChatMessage>,
    greeting: Option<String>,
}

impl ChatSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the log with a bot greeting that `clear` puts back.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut store = Self {
            messages: Vec::new(),
            greeting: Some(greeting.into()),
        };
        store.clear();
        store
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) -> ChatMessage {
        self.push(ChatMessage::user(content))
    }

    pub fn add_bot_message(&mut self, content: impl Into<String>) -> ChatMessage {
        self.push(ChatMessage::bot(content))
    }

    fn push(&mut self, message: ChatMessage) -> ChatMessage {
        self.messages.push(message.clone());
        message
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        if let Some(greeting) = self.greeting.clone() {
            self.messages.push(ChatMessage::bot(greeting));
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
