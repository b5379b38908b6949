// API Constants
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const HEALTH_PATH: &str = "/health";
pub const CHAT_PATH: &str = "/api/v1/chat";

// Connection timing defaults (milliseconds)
pub const QUICK_PROBE_TIMEOUT_MS: u64 = 3_000;
pub const HEALTH_CHECK_TIMEOUT_MS: u64 = 10_000;
pub const EXTENDED_TIMEOUT_MS: u64 = 30_000;
pub const CHAT_TIMEOUT_MS: u64 = 60_000;
pub const BASE_RETRY_DELAY_MS: u64 = 1_000;
pub const EXTENDED_RETRY_DELAY_MS: u64 = 3_000;
pub const MAX_RETRY_DELAY_MS: u64 = 8_000;
pub const HEALTH_CHECK_INTERVAL_MS: u64 = 30_000;
pub const RECONNECT_DELAY_MS: u64 = 2_000;

pub const MAX_RETRIES: u32 = 4;
pub const RECONNECT_RETRIES: u32 = 2;

// Probe status strings
pub const STATUS_READY: &str = "ready";
pub const STATUS_ERROR: &str = "error";

// User-facing copy
pub const DEFAULT_GREETING: &str =
    "Hello! I'm the hotel concierge bot. Ask me anything about check-in, amenities, or hotel policies.";
pub const SEND_FAILED_TITLE: &str = "Failed to send message";
pub const FAILED_REPLY_TEXT: &str =
    "Sorry, I couldn't reach the server just now. Please try again in a moment.";
