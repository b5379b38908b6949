use crate::constants::*;
use crate::errors::{HotelbotError, HotelbotResult};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub health_path: String,
    pub chat_path: String,
    pub quick_probe_timeout_ms: u64,
    pub health_check_timeout_ms: u64,
    pub extended_timeout_ms: u64,
    pub chat_timeout_ms: u64,
    pub max_retries: u32,
    pub reconnect_retries: u32,
    pub base_retry_delay_ms: u64,
    pub extended_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
    pub health_check_interval_ms: u64,
    pub reconnect_delay_ms: u64,
    pub reconnect_after_health_failure: bool,
    pub greeting: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            health_path: HEALTH_PATH.to_string(),
            chat_path: CHAT_PATH.to_string(),
            quick_probe_timeout_ms: QUICK_PROBE_TIMEOUT_MS,
            health_check_timeout_ms: HEALTH_CHECK_TIMEOUT_MS,
            extended_timeout_ms: EXTENDED_TIMEOUT_MS,
            chat_timeout_ms: CHAT_TIMEOUT_MS,
            max_retries: MAX_RETRIES,
            reconnect_retries: RECONNECT_RETRIES,
            base_retry_delay_ms: BASE_RETRY_DELAY_MS,
            extended_retry_delay_ms: EXTENDED_RETRY_DELAY_MS,
            max_retry_delay_ms: MAX_RETRY_DELAY_MS,
            health_check_interval_ms: HEALTH_CHECK_INTERVAL_MS,
            reconnect_delay_ms: RECONNECT_DELAY_MS,
            reconnect_after_health_failure: false,
            greeting: Some(DEFAULT_GREETING.to_string()),
            log_level: "info".to_string(),
        }
    }
}

/// Timing knobs consumed by `ConnectionMonitor`.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub quick_probe_timeout: Duration,
    pub health_check_timeout: Duration,
    pub health_check_interval: Duration,
    pub reconnect_delay: Duration,
    pub startup_policy: RetryPolicy,
    pub reconnect_policy: RetryPolicy,
    pub reconnect_after_health_failure: bool,
}

impl Config {
    pub fn monitor_settings(&self) -> MonitorSettings {
        let max_delay = Duration::from_millis(self.max_retry_delay_ms);
        MonitorSettings {
            quick_probe_timeout: Duration::from_millis(self.quick_probe_timeout_ms),
            health_check_timeout: Duration::from_millis(self.health_check_timeout_ms),
            health_check_interval: Duration::from_millis(self.health_check_interval_ms),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            startup_policy: RetryPolicy {
                max_retries: self.max_retries,
                base_delay: Duration::from_millis(self.base_retry_delay_ms),
                timeout: Duration::from_millis(self.extended_timeout_ms),
                max_delay,
            },
            reconnect_policy: RetryPolicy {
                max_retries: self.reconnect_retries,
                base_delay: Duration::from_millis(self.extended_retry_delay_ms),
                timeout: Duration::from_millis(self.health_check_timeout_ms),
                max_delay,
            },
            reconnect_after_health_failure: self.reconnect_after_health_failure,
        }
    }

    /// Reads a config file, falling back to defaults for missing keys.
    pub fn from_path(path: &Path) -> HotelbotResult<Self> {
        let config_str = fs::read_to_string(path).map_err(|e| {
            HotelbotError::config_error(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&config_str)
            .map_err(|e| HotelbotError::config_error(format!("Failed to parse config: {}", e)))
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> HotelbotResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                HotelbotError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_str = serde_json::to_string_pretty(self).map_err(|e| {
            HotelbotError::config_error(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, config_str)
            .map_err(|e| HotelbotError::config_error(format!("Failed to write config file: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("HOTELBOT_API_URL") {
            self.api_base_url = url;
        }
        if let Ok(level) = env::var("HOTELBOT_LOG_LEVEL") {
            self.log_level = level;
        }
    }
}

/// Loads `~/.config/hotelbot/config.json`, creating it with defaults on first
/// run, and applies environment overrides.
pub fn initialize_config() -> HotelbotResult<Config> {
    let config_path = get_config_path()?;
    load_config_from(&config_path)
}

pub fn load_config_from(config_path: &Path) -> HotelbotResult<Config> {
    let mut config = if config_path.exists() {
        Config::from_path(config_path)?
    } else {
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    config.apply_env_overrides();
    validate_config(&config)?;

    Ok(config)
}

fn get_config_path() -> HotelbotResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| HotelbotError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("hotelbot").join("config.json"))
}

pub fn validate_config(config: &Config) -> HotelbotResult<()> {
    // Check base URL
    let base = config.api_base_url.trim();
    if base.is_empty() {
        return Err(HotelbotError::config_error("api_base_url is required"));
    }
    reqwest::Url::parse(base).map_err(|e| {
        HotelbotError::config_error(format!("api_base_url is not a valid URL: {}", e))
    })?;

    // Check timeouts
    if config.quick_probe_timeout_ms == 0
        || config.health_check_timeout_ms == 0
        || config.extended_timeout_ms == 0
        || config.chat_timeout_ms == 0
    {
        return Err(HotelbotError::config_error("Timeouts must be greater than 0"));
    }

    if config.max_retries == 0 {
        return Err(HotelbotError::config_error("max_retries must be greater than 0"));
    }

    if config.health_check_interval_ms == 0 {
        return Err(HotelbotError::config_error(
            "health_check_interval_ms must be greater than 0",
        ));
    }

    if config.max_retry_delay_ms < config.base_retry_delay_ms {
        return Err(HotelbotError::config_error(
            "max_retry_delay_ms must not be less than base_retry_delay_ms",
        ));
    }

    Ok(())
}
