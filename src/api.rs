use crate::{
    config::Config,
    errors::{HotelbotError, HotelbotResult},
    gateway::ChatTransport,
    logging::log_api_call,
    models::{ApiCallLog, ChatReply, ChatRequest, HealthBody, ProbeResult},
    probe::HealthProbe,
};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use std::time::{Duration, Instant};

/// HTTP client for the hotel bot backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    health_path: String,
    chat_path: String,
    chat_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let config = Config {
            api_base_url: base_url.into(),
            ..Config::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            health_path: config.health_path.clone(),
            chat_path: config.chat_path.clone(),
            chat_timeout: Duration::from_millis(config.chat_timeout_ms),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn record(&self, endpoint: &str, summary: &str, status: u16, started: Instant) {
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            request_summary: summary.to_string(),
            response_status: status,
            response_time_ms: started.elapsed().as_millis(),
        });
    }
}

#[async_trait]
impl HealthProbe for ApiClient {
    async fn probe(&self, timeout: Duration) -> ProbeResult {
        if timeout.is_zero() {
            return ProbeResult::not_ready();
        }

        let url = self.endpoint(&self.health_path);
        let started = Instant::now();

        // The per-request timeout covers the body read and drops the
        // connection when it fires.
        let response = match self.client.get(&url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("health probe to {} failed: {}", url, e);
                self.record(&url, "health probe", 0, started);
                return ProbeResult::not_ready();
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.record(&url, "health probe", status.as_u16(), started);
            return ProbeResult::not_ready();
        }

        let body = response.json::<HealthBody>().await.unwrap_or_default();
        self.record(&url, "health probe", status.as_u16(), started);

        ProbeResult::ready(body.status)
    }
}

#[async_trait]
impl ChatTransport for ApiClient {
    async fn send_chat(&self, request: &ChatRequest) -> HotelbotResult<ChatReply> {
        let url = self.endpoint(&self.chat_path);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .timeout(self.chat_timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        self.record(&url, "chat", status.as_u16(), started);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(HotelbotError::api_error(format!(
                "API returned error: {} - {}",
                status, error_text
            )));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| HotelbotError::api_error(format!("Failed to parse API response: {}", e)))
    }
}
