// src/lib.rs

pub mod api;
pub mod chat;
pub mod chat_message;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod errors;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod probe;
pub mod retry;

#[cfg(test)]
mod test_support;

pub use api::ApiClient;
pub use chat::ChatSession;
pub use chat_message::ChatMessage;
pub use config::Config;
pub use conversation::ChatSessionStore;
pub use errors::{HotelbotError, HotelbotResult};
pub use gateway::{ChatTransport, MessageGateway};
pub use models::{ConnectionState, ProbeResult, SendOutcome};
pub use monitor::ConnectionMonitor;
pub use probe::HealthProbe;
pub use retry::{run_with_retry, RetryPolicy};
