use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// One entry of the conversation log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    id: String,
    content: String,
    is_user: bool,
    timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(content: impl Into<String>, is_user: bool) -> Self {
        let timestamp = Local::now();
        let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("{}-{}", timestamp.timestamp_millis(), seq),
            content: content.into(),
            is_user,
            timestamp,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}
