//! Scripted fakes shared by the unit tests.

use crate::{
    errors::{HotelbotError, HotelbotResult},
    gateway::ChatTransport,
    models::{ChatReply, ChatRequest, ConnectionState, ProbeResult},
    probe::HealthProbe,
};
use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::time::Instant;

/// Replays a fixed sequence of ready/not-ready answers, then repeats
/// `fallback` forever.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<bool>>,
    fallback: bool,
    latency: Duration,
    calls: Mutex<Vec<(Instant, Duration)>>,
}

impl ScriptedProbe {
    pub fn new(script: &[bool], fallback: bool) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.iter().copied().collect()),
            fallback,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_latency(script: &[bool], fallback: bool, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.iter().copied().collect()),
            fallback,
            latency,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn always(ready: bool) -> Arc<Self> {
        Self::new(&[], ready)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self, timeout: Duration) -> ProbeResult {
        self.calls.lock().unwrap().push((Instant::now(), timeout));
        let ready = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if ready {
            ProbeResult::ready(None)
        } else {
            ProbeResult::not_ready()
        }
    }
}

/// Chat transport that either answers with a fixed reply or fails.
pub struct ScriptedTransport {
    answer: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send_chat(&self, _request: &ChatRequest) -> HotelbotResult<ChatReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(answer) => Ok(ChatReply {
                answer: answer.clone(),
                is_fallback: false,
                timestamp: None,
                search_results: None,
            }),
            None => Err(HotelbotError::api_error("Request failed: connection refused")),
        }
    }
}

/// Collects every state the monitor reports.
#[derive(Clone, Default)]
pub struct StateRecorder {
    seen: Arc<Mutex<Vec<ConnectionState>>>,
}

impl StateRecorder {
    pub fn callback(&self) -> impl Fn(ConnectionState) + Send + Sync + 'static {
        let seen = self.seen.clone();
        move |state| seen.lock().unwrap().push(state)
    }

    pub fn states(&self) -> Vec<ConnectionState> {
        self.seen.lock().unwrap().clone()
    }
}

/// Collects every `(title, message)` the gateway reports.
#[derive(Clone, Default)]
pub struct ErrorRecorder {
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

impl ErrorRecorder {
    pub fn callback(&self) -> impl Fn(&str, &str) + Send + Sync + 'static {
        let seen = self.seen.clone();
        move |title: &str, message: &str| {
            seen.lock()
                .unwrap()
                .push((title.to_string(), message.to_string()))
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }
}
