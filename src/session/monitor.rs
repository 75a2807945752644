// Inactivity monitor: signs the user out after a quiet period
//
// One background task per attachment. It owns the only timer and the only
// interaction listener, so resetting the deadline never leaves a second
// timer running.

use super::store::SessionStore;
use super::types::{
    InteractionEvent, InteractionKind, LogoutReason, MAX_SESSION_TIMEOUT, MonitorState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

const EVENT_BUFFER: usize = 64;

/// Entry point for interaction signals coming from the UI layer
#[derive(Clone)]
pub struct ActivityTracker {
    events: broadcast::Sender<InteractionEvent>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self { events }
    }

    /// Report an interaction happening now
    pub fn record(&self, kind: InteractionKind) {
        let event = InteractionEvent {
            kind,
            at: Instant::now(),
        };

        // No listener means no armed session; the signal is irrelevant
        if self.events.send(event).is_err() {
            trace!("Dropped {} with no armed monitor", kind.as_str());
        }
    }

    /// Number of monitors currently listening for interactions
    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn listen(&self) -> broadcast::Receiver<InteractionEvent> {
        self.events.subscribe()
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Attaches inactivity monitoring to a session store
pub struct InactivityMonitor;

impl InactivityMonitor {
    /// Start monitoring. The window is the store's configured timeout.
    ///
    /// Monitoring stops when the returned handle is detached or dropped.
    pub fn attach(store: SessionStore, tracker: ActivityTracker) -> MonitorHandle {
        let window = store.config().timeout.min(MAX_SESSION_TIMEOUT);
        let state = Arc::new(watch::channel(MonitorState::Disarmed).0);

        let task = tokio::spawn(run(store, tracker, window, state.clone()));
        debug!("Inactivity monitor attached (window {:?})", window);

        MonitorHandle {
            task: Some(task),
            state,
        }
    }
}

/// Owner of a running monitor
pub struct MonitorHandle {
    task: Option<JoinHandle<()>>,
    state: Arc<watch::Sender<MonitorState>>,
}

impl MonitorHandle {
    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    /// Stop monitoring; no logout is triggered by this monitor afterwards.
    /// Safe to call after the timer already fired.
    pub fn detach(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.state.send_replace(MonitorState::Disarmed);
            debug!("Inactivity monitor detached");
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn run(
    store: SessionStore,
    tracker: ActivityTracker,
    window: Duration,
    state: Arc<watch::Sender<MonitorState>>,
) {
    let mut session = store.subscribe();

    loop {
        // Disarmed until someone signs in
        let mut armed_for = match session.wait_for(|current| current.is_some()).await {
            Ok(current) => current
                .as_ref()
                .map(|identity| identity.id.clone())
                .unwrap_or_default(),
            Err(_) => return,
        };

        let mut events = tracker.listen();
        let mut listening = true;
        let mut last_activity = Instant::now();
        let sleep = tokio::time::sleep_until(deadline_after(last_activity, window));
        tokio::pin!(sleep);

        arm(&state, last_activity, window);
        debug!("Inactivity timer armed for {}", armed_for);

        let expired = loop {
            tokio::select! {
                () = &mut sleep => break true,

                changed = session.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let current = session
                        .borrow_and_update()
                        .as_ref()
                        .map(|identity| identity.id.clone());
                    let Some(id) = current else {
                        break false;
                    };
                    // Identity replaced: fresh window
                    armed_for = id;
                    last_activity = Instant::now();
                    sleep.as_mut().reset(deadline_after(last_activity, window));
                    arm(&state, last_activity, window);
                }

                event = events.recv(), if listening => match event {
                    Ok(event) => {
                        last_activity = event.at;
                        sleep.as_mut().reset(deadline_after(last_activity, window));
                        arm(&state, last_activity, window);
                        trace!("Inactivity timer reset by {}", event.kind.as_str());
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        last_activity = Instant::now();
                        sleep.as_mut().reset(deadline_after(last_activity, window));
                        arm(&state, last_activity, window);
                        trace!("Inactivity timer reset after {} coalesced events", skipped);
                    }
                    Err(RecvError::Closed) => listening = false,
                },
            }
        };

        drop(events);
        state.send_replace(MonitorState::Disarmed);

        if expired {
            info!("Session {} idle for {:?}, signing out", armed_for, window);

            // Detached so that tearing the monitor down mid-logout cannot
            // leave the purge half done. Only the expired identity is
            // signed out; a login that won the lock keeps its session.
            let store = store.clone();
            let logout = tokio::spawn(async move {
                store.logout_if(&armed_for, LogoutReason::Inactivity).await
            });
            if let Err(e) = logout.await {
                warn!("Inactivity logout task failed: {}", e);
            }
        } else {
            debug!("Inactivity timer disarmed");
        }
    }
}

fn deadline_after(from: Instant, window: Duration) -> Instant {
    from.checked_add(window).unwrap_or_else(|| from + MAX_SESSION_TIMEOUT)
}

fn arm(state: &watch::Sender<MonitorState>, last_activity: Instant, window: Duration) {
    state.send_replace(MonitorState::Armed {
        deadline: deadline_after(last_activity, window),
        last_activity,
    });
}
