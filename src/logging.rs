// src/logging.rs

use crate::models::ApiCallLog;
use env_logger::{Builder, Env};
use log::debug;

pub const API_LOG_TARGET: &str = "hotelbot::api";

/// Installs the global logger. `RUST_LOG` wins over the configured level.
pub fn init_logging(default_level: &str) {
    let env = Env::default().default_filter_or(default_level);
    // A second call (tests, embedding apps) keeps the first logger.
    let _ = Builder::from_env(env).format_timestamp_millis().try_init();
}

/// Logs an API call under the `hotelbot::api` target.
pub fn log_api_call(log: &ApiCallLog) {
    debug!(
        target: API_LOG_TARGET,
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms
    );
}
