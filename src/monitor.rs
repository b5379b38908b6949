//! Connection-health state machine.
//!
//! ```text
//! Checking ──quick probe ok──────────────────────────▶ Connected
//!    │                                                    │
//!    └─quick probe failed─▶ WarmingUp ─retries ok────────▶│
//!                               │                         │ periodic probe failed
//!                               └─retries exhausted─▶ Disconnected ◀┘
//! ```
//!
//! The monitor is the only writer of [`ConnectionState`]. Readers get a
//! snapshot through [`ConnectionMonitor::state`], a `watch` subscription, or
//! the status callback, which fires exactly once per actual transition.

use crate::{
    config::MonitorSettings,
    models::ConnectionState,
    probe::{probe_guarded, HealthProbe},
    retry::run_with_retry,
};
use log::{debug, info, warn};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};

pub type StatusCallback = Arc<dyn Fn(ConnectionState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Quick probe, then the startup retry policy.
    Startup,
    /// Settle delay, then the reduced reconnect policy.
    Reconnect,
}

struct Inner {
    state: ConnectionState,
    alive: bool,
    /// Bumped whenever a connection task is replaced. Results from an older
    /// task are dropped.
    epoch: u64,
}

struct Shared {
    probe: Arc<dyn HealthProbe>,
    settings: MonitorSettings,
    inner: Mutex<Inner>,
    tx: watch::Sender<ConnectionState>,
    on_change: StatusCallback,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, epoch: u64) -> bool {
        let inner = self.lock();
        inner.alive && inner.epoch == epoch
    }

    /// Applies a transition on behalf of task `epoch`. The callback runs
    /// under the state lock so `destroy` cannot return while one is running.
    fn transition(&self, epoch: u64, next: ConnectionState) -> bool {
        let mut inner = self.lock();
        if !inner.alive || inner.epoch != epoch || inner.state == next {
            return false;
        }

        let prev = inner.state;
        inner.state = next;
        self.tx.send_replace(next);
        info!("connection state {} -> {}", prev, next);
        (self.on_change)(next);
        true
    }
}

/// Owns the connection state and the background task that keeps it fresh.
///
/// `initialize` and `recheck` spawn onto the current tokio runtime.
pub struct ConnectionMonitor {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionMonitor {
    pub fn new<F>(probe: Arc<dyn HealthProbe>, settings: MonitorSettings, on_change: F) -> Self
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        let (tx, _rx) = watch::channel(ConnectionState::Checking);
        Self {
            shared: Arc::new(Shared {
                probe,
                settings,
                inner: Mutex::new(Inner {
                    state: ConnectionState::Checking,
                    alive: true,
                    epoch: 0,
                }),
                tx,
                on_change: Arc::new(on_change),
            }),
            task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.shared.tx.subscribe()
    }

    /// Runs the startup sequence, replacing whatever task was running.
    pub fn initialize(&self) {
        self.begin(Phase::Startup);
    }

    /// Re-evaluates the connection after a failed send: Checking now, then a
    /// reduced retry pass after the reconnect delay.
    pub fn recheck(&self) {
        self.begin(Phase::Reconnect);
    }

    /// Stops the monitor. No callback fires once this returns.
    pub fn destroy(&self) {
        self.shared.lock().alive = false;
        if let Some(handle) = self.task_slot().take() {
            handle.abort();
        }
        debug!("connection monitor destroyed");
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, phase: Phase) {
        let mut slot = self.task_slot();

        let epoch = {
            let mut inner = self.shared.lock();
            if !inner.alive {
                return;
            }
            inner.epoch += 1;
            inner.epoch
        };

        if let Some(handle) = slot.take() {
            handle.abort();
        }

        self.shared.transition(epoch, ConnectionState::Checking);
        *slot = Some(tokio::spawn(drive(self.shared.clone(), epoch, phase)));
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.destroy();
    }
}

async fn drive(shared: Arc<Shared>, epoch: u64, mut phase: Phase) {
    loop {
        let connected = match phase {
            Phase::Startup => establish(&shared, epoch).await,
            Phase::Reconnect => reestablish(&shared, epoch).await,
        };

        let next = if connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        shared.transition(epoch, next);

        if !connected || !shared.is_current(epoch) {
            return;
        }

        watch_health(&shared, epoch).await;

        if !shared.settings.reconnect_after_health_failure || !shared.is_current(epoch) {
            return;
        }
        phase = Phase::Reconnect;
    }
}

async fn establish(shared: &Shared, epoch: u64) -> bool {
    let quick = probe_guarded(shared.probe.as_ref(), shared.settings.quick_probe_timeout).await;
    if quick.ready {
        return true;
    }

    debug!("quick probe not ready ({}), starting retries", quick.status);
    shared.transition(epoch, ConnectionState::WarmingUp);
    run_with_retry(shared.probe.as_ref(), &shared.settings.startup_policy).await
}

async fn reestablish(shared: &Shared, epoch: u64) -> bool {
    shared.transition(epoch, ConnectionState::Checking);
    sleep(shared.settings.reconnect_delay).await;
    run_with_retry(shared.probe.as_ref(), &shared.settings.reconnect_policy).await
}

/// Re-probes on a fixed interval while connected. Returns after the first
/// failed probe, with the state set to Disconnected. Each probe is awaited
/// before the next tick and missed ticks are skipped, so probes never
/// overlap.
async fn watch_health(shared: &Shared, epoch: u64) {
    // interval_at panics on a zero period.
    let period = shared.settings.health_check_interval.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if !shared.is_current(epoch) {
            return;
        }

        let result = probe_guarded(shared.probe.as_ref(), shared.settings.health_check_timeout).await;
        if result.ready {
            debug!("periodic health check ok ({})", result.status);
            continue;
        }

        warn!("periodic health check failed, marking backend disconnected");
        shared.transition(epoch, ConnectionState::Disconnected);
        return;
    }
}
