// src/gateway.rs

use crate::{
    constants::{FAILED_REPLY_TEXT, SEND_FAILED_TITLE},
    errors::HotelbotResult,
    models::{ChatReply, ChatRequest, ConnectionState, SendOutcome},
    monitor::ConnectionMonitor,
};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

pub type ErrorCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Transport for `POST /api/v1/chat`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> HotelbotResult<ChatReply>;
}

/// Why a message never left the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyMessage,
    NotConnected(ConnectionState),
}

/// Toast title and body shown when sending is refused in `state`. `None`
/// while connected.
pub fn rejection_copy(state: ConnectionState) -> Option<(&'static str, &'static str)> {
    match state {
        ConnectionState::Checking => Some((
            "Checking connection",
            "Still checking the connection to the assistant. Please wait a moment.",
        )),
        ConnectionState::WarmingUp => Some((
            "Server is warming up",
            "The assistant is starting up. Please try again in a few seconds.",
        )),
        ConnectionState::Disconnected => Some((
            "Server disconnected",
            "Cannot reach the assistant. Use /reconnect to try again.",
        )),
        ConnectionState::Connected => None,
    }
}

#[derive(Debug)]
struct PendingSend<'a> {
    content: &'a str,
    resolved_via: ConnectionState,
}

pub struct MessageGateway {
    transport: Arc<dyn ChatTransport>,
    monitor: Arc<ConnectionMonitor>,
    on_error: ErrorCallback,
    category: Option<String>,
    section: Option<String>,
}

impl MessageGateway {
    pub fn new<F>(transport: Arc<dyn ChatTransport>, monitor: Arc<ConnectionMonitor>, on_error: F) -> Self
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        Self {
            transport,
            monitor,
            on_error: Arc::new(on_error),
            category: None,
            section: None,
        }
    }

    /// Restricts answers to one document category/section of the backend.
    pub fn with_filters(mut self, category: Option<String>, section: Option<String>) -> Self {
        self.category = category;
        self.section = section;
        self
    }

    /// Checks whether `content` may be sent while in `state`. Reports
    /// state rejections through the error callback; empty input is
    /// rejected silently.
    pub fn preflight(&self, content: &str, state: ConnectionState) -> Result<(), Rejection> {
        if content.trim().is_empty() {
            return Err(Rejection::EmptyMessage);
        }

        if let Some((title, message)) = rejection_copy(state) {
            debug!("refusing to send while {}", state);
            (self.on_error)(title, message);
            return Err(Rejection::NotConnected(state));
        }

        Ok(())
    }

    /// Sends a message that already passed `preflight`. A failure is reported,
    /// triggers a connection re-check and is never retried.
    pub async fn dispatch(&self, content: &str) -> SendOutcome {
        let request = ChatRequest {
            message: content.trim().to_string(),
            category: self.category.clone(),
            section: self.section.clone(),
        };

        match self.transport.send_chat(&request).await {
            Ok(reply) => SendOutcome::answered(reply),
            Err(e) => {
                warn!("chat request failed: {}", e);
                (self.on_error)(SEND_FAILED_TITLE, &e.to_string());
                self.monitor.recheck();
                SendOutcome::failed(FAILED_REPLY_TEXT)
            }
        }
    }

    pub async fn send(&self, content: &str, current_state: ConnectionState) -> SendOutcome {
        let pending = PendingSend {
            content,
            resolved_via: current_state,
        };

        if self.preflight(pending.content, pending.resolved_via).is_err() {
            return SendOutcome::rejected();
        }

        debug!("sending {:?}", pending);
        self.dispatch(pending.content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        test_support::{ErrorRecorder, ScriptedProbe, ScriptedTransport, StateRecorder},
    };
    use std::time::Duration;

    fn idle_monitor(ready: bool) -> (Arc<ConnectionMonitor>, Arc<ScriptedProbe>, StateRecorder) {
        let probe = ScriptedProbe::always(ready);
        let recorder = StateRecorder::default();
        let monitor = ConnectionMonitor::new(
            probe.clone(),
            Config::default().monitor_settings(),
            recorder.callback(),
        );
        (Arc::new(monitor), probe, recorder)
    }

    fn gateway(transport: Arc<ScriptedTransport>, monitor: Arc<ConnectionMonitor>) -> (MessageGateway, ErrorRecorder) {
        let errors = ErrorRecorder::default();
        (MessageGateway::new(transport, monitor, errors.callback()), errors)
    }

    #[tokio::test]
    async fn test_blank_messages_never_reach_the_network() {
        let transport = ScriptedTransport::answering("hi");
        let (monitor, _, _) = idle_monitor(true);
        let (gateway, errors) = gateway(transport.clone(), monitor);

        for content in ["", "   ", "\n\t"] {
            let outcome = gateway.send(content, ConnectionState::Connected).await;
            assert_eq!(outcome, SendOutcome::rejected());
        }

        assert_eq!(transport.call_count(), 0);
        assert!(errors.titles().is_empty());
    }

    #[tokio::test]
    async fn test_not_connected_reports_state_specific_title() {
        let transport = ScriptedTransport::answering("hi");
        let (monitor, _, _) = idle_monitor(true);
        let (gateway, errors) = gateway(transport.clone(), monitor);

        for state in [
            ConnectionState::Checking,
            ConnectionState::WarmingUp,
            ConnectionState::Disconnected,
        ] {
            let outcome = gateway.send("Where is the gym?", state).await;
            assert!(!outcome.success);
            assert!(outcome.response.is_none());
        }

        assert_eq!(transport.call_count(), 0);
        assert_eq!(
            errors.titles(),
            vec!["Checking connection", "Server is warming up", "Server disconnected"]
        );
    }

    #[test]
    fn test_rejection_copy_only_for_unconnected_states() {
        assert_eq!(rejection_copy(ConnectionState::Connected), None);
        assert_eq!(
            rejection_copy(ConnectionState::Disconnected).map(|(title, _)| title),
            Some("Server disconnected")
        );
    }

    #[tokio::test]
    async fn test_successful_send_returns_answer() {
        let transport = ScriptedTransport::answering("The pool opens at 6 AM.");
        let (monitor, _, _) = idle_monitor(true);
        let (gateway, errors) = gateway(transport.clone(), monitor);

        let outcome = gateway.send("Pool hours?", ConnectionState::Connected).await;

        assert!(outcome.success);
        assert_eq!(outcome.response.as_deref(), Some("The pool opens at 6 AM."));
        assert_eq!(transport.call_count(), 1);
        assert!(errors.titles().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_reports_and_rechecks_without_resending() {
        let transport = ScriptedTransport::failing();
        let (monitor, probe, states) = idle_monitor(false);
        let (gateway, errors) = gateway(transport.clone(), monitor.clone());

        let outcome = gateway.send("Late checkout?", ConnectionState::Connected).await;

        assert!(!outcome.success);
        assert_eq!(outcome.response.as_deref(), Some(FAILED_REPLY_TEXT));
        assert_eq!(errors.titles(), vec![SEND_FAILED_TITLE]);
        assert_eq!(monitor.state(), ConnectionState::Checking);

        // Nothing probes before the reconnect delay, then the reduced pass runs.
        tokio::time::sleep(Duration::from_millis(1_999)).await;
        assert_eq!(probe.call_count(), 0);
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(probe.call_count(), 2);
        assert_eq!(states.states(), vec![ConnectionState::Disconnected]);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_filters_are_forwarded_to_the_backend() {
        use crate::api::ApiClient;
        use serde_json::json;
        use wiremock::{
            matchers::{body_json, method, path},
            Mock, MockServer, ResponseTemplate,
        };

        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .and(body_json(json!({
                "message": "Spa hours?",
                "category": "amenities",
                "section": "spa"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "The spa is open 10 AM to 9 PM.",
                "is_fallback": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (monitor, _, _) = idle_monitor(true);
        let gateway = MessageGateway::new(Arc::new(ApiClient::new(mock_server.uri())), monitor, |_, _| {})
            .with_filters(Some("amenities".to_string()), Some("spa".to_string()));

        let outcome = gateway.send("  Spa hours?  ", ConnectionState::Connected).await;

        assert!(outcome.success);
        assert!(outcome.is_fallback);
    }
}
