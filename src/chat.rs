use crate::{
    api::ApiClient,
    config::Config,
    conversation::ChatSessionStore,
    gateway::MessageGateway,
    models::{ConnectionState, SendOutcome},
    monitor::ConnectionMonitor,
};
use std::sync::Arc;

/// Conversation log plus the connection plumbing behind it.
pub struct ChatSession {
    store: ChatSessionStore,
    gateway: MessageGateway,
    monitor: Arc<ConnectionMonitor>,
}

impl ChatSession {
    pub fn new(store: ChatSessionStore, gateway: MessageGateway, monitor: Arc<ConnectionMonitor>) -> Self {
        Self {
            store,
            gateway,
            monitor,
        }
    }

    /// Wires an HTTP client, monitor and gateway from `config` and starts
    /// the connection check. Must run inside a tokio runtime.
    pub fn connect<S, E>(config: &Config, on_status_change: S, on_error: E) -> Self
    where
        S: Fn(ConnectionState) + Send + Sync + 'static,
        E: Fn(&str, &str) + Send + Sync + 'static,
    {
        let client = Arc::new(ApiClient::from_config(config));
        let monitor = Arc::new(ConnectionMonitor::new(
            client.clone(),
            config.monitor_settings(),
            on_status_change,
        ));
        let gateway = MessageGateway::new(client, monitor.clone(), on_error);
        let store = match &config.greeting {
            Some(greeting) => ChatSessionStore::with_greeting(greeting.clone()),
            None => ChatSessionStore::new(),
        };

        monitor.initialize();
        Self::new(store, gateway, monitor)
    }

    /// Sends `content` if the connection allows it. On a real send the log
    /// grows by the user message and exactly one bot message.
    pub async fn submit(&mut self, content: &str) -> SendOutcome {
        let content = content.trim();
        if self.gateway.preflight(content, self.monitor.state()).is_err() {
            return SendOutcome::rejected();
        }

        self.store.add_user_message(content);
        let outcome = self.gateway.dispatch(content).await;
        if let Some(text) = &outcome.response {
            self.store.add_bot_message(text.clone());
        }
        outcome
    }

    pub fn store(&self) -> &ChatSessionStore {
        &self.store
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn state(&self) -> ConnectionState {
        self.monitor.state()
    }

    /// Manual reconnect: reruns the startup sequence.
    pub fn reconnect(&self) {
        self.monitor.initialize();
    }

    pub fn shutdown(&self) {
        self.monitor.destroy();
    }
}
