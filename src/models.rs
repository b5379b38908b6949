// src/models.rs

use crate::constants::{STATUS_ERROR, STATUS_READY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connectivity of the chat backend as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Checking,
    WarmingUp,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::WarmingUp => write!(f, "warming_up"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Outcome of a single health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub ready: bool,
    pub status: String,
}

impl ProbeResult {
    pub fn ready(status: Option<String>) -> Self {
        Self {
            ready: true,
            status: status.unwrap_or_else(|| STATUS_READY.to_string()),
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            status: STATUS_ERROR.to_string(),
        }
    }
}

/// Optional body of the health endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct HealthBody {
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /api/v1/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: None,
            section: None,
        }
    }
}

/// A document chunk the backend used to ground its answer.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub score: f64,
}

/// Response of `POST /api/v1/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub is_fallback: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub search_results: Option<Vec<SearchResult>>,
}

/// Result of `MessageGateway::send`. `response` carries either the answer or
/// the failure text to show as a bot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub success: bool,
    pub response: Option<String>,
    pub is_fallback: bool,
}

impl SendOutcome {
    pub fn rejected() -> Self {
        Self {
            success: false,
            response: None,
            is_fallback: false,
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            success: false,
            response: Some(text.into()),
            is_fallback: false,
        }
    }

    pub fn answered(reply: ChatReply) -> Self {
        Self {
            success: true,
            response: Some(reply.answer),
            is_fallback: reply.is_fallback,
        }
    }
}

/// Logs details of each API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}
