//! The per-slice lifecycle state machine.
//!
//! A mailbox-style internal queue (`tokio::mpsc`) decouples callers sending
//! events from listener dispatch, and a `parking_lot::Mutex` serializes
//! state transitions. There is exactly one state machine shape
//! (`SliceState`/`SliceEvent`) per slice, so no bundle, transport, or
//! supervision machinery is needed beyond the dispatcher and watchdog tasks.

use crate::transitions::{next_state, timeout_event, SliceEvent};
use mano_config::RetryPolicy;
use mano_types::{ErrorKind, ManoError, Result, SliceRuntimeState, SliceState};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
pub struct TransitionRecord {
    pub from: SliceState,
    pub to: SliceState,
    pub event: SliceEvent,
    pub at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct EventRecord {
    pub event: SliceEvent,
    pub at: chrono::DateTime<chrono::Utc>,
    pub accepted: bool,
}

/// Listener callbacks invoked asynchronously off the calling task (spec
/// §4.5: "the state machine never waits for listener completion").
pub trait SliceListener: Send + Sync {
    fn on_state_change(&self, from: SliceState, to: SliceState);
    fn on_error(&self, error: &ManoError);
}

enum Dispatch {
    StateChange(SliceState, SliceState),
    Error(ManoError),
}

pub struct SliceLifecycle {
    slice_id: uuid::Uuid,
    state: Mutex<SliceState>,
    state_watch: watch::Sender<SliceState>,
    history: Mutex<Vec<TransitionRecord>>,
    event_history: Mutex<Vec<EventRecord>>,
    listeners: RwLock<Vec<Arc<dyn SliceListener>>>,
    dispatch_tx: mpsc::UnboundedSender<Dispatch>,
}

impl SliceLifecycle {
    /// Build a new lifecycle in `Initializing` and start its listener
    /// dispatcher and timeout watchdog. Returns the lifecycle plus the
    /// handles of both background tasks, which the owner should abort on
    /// slice teardown.
    pub fn spawn(slice_id: uuid::Uuid, state_timeout: Duration) -> (Arc<Self>, JoinHandle<()>, JoinHandle<()>) {
        Self::spawn_from(slice_id, SliceState::Initializing, state_timeout)
    }

    /// Rebuild a lifecycle from a checkpointed `SliceRuntimeState` and replay
    /// any events that were accepted by the caller but not yet reflected in
    /// the checkpoint. Used to recover a slice's state machine (e.g. after a
    /// process restart) without losing events queued at the moment of the
    /// checkpoint.
    pub fn restore(
        state: SliceRuntimeState,
        pending_events: Vec<SliceEvent>,
        state_timeout: Duration,
    ) -> (Arc<Self>, JoinHandle<()>, JoinHandle<()>) {
        let (lifecycle, dispatcher, watchdog) = Self::spawn_from(state.slice_id, state.state, state_timeout);
        for event in pending_events {
            let _ = lifecycle.send(event);
        }
        (lifecycle, dispatcher, watchdog)
    }

    fn spawn_from(slice_id: uuid::Uuid, initial_state: SliceState, state_timeout: Duration) -> (Arc<Self>, JoinHandle<()>, JoinHandle<()>) {
        let (dispatch_tx, mut dispatch_rx) = mpsc::unbounded_channel::<Dispatch>();
        let (state_watch, mut state_rx) = watch::channel(initial_state);

        let lifecycle = Arc::new(Self {
            slice_id,
            state: Mutex::new(initial_state),
            state_watch,
            history: Mutex::new(Vec::new()),
            event_history: Mutex::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
            dispatch_tx,
        });

        let dispatch_listeners = lifecycle.clone();
        let dispatcher = tokio::spawn(async move {
            // Single consumer: processing order equals send order, so
            // dispatch order always matches transition order.
            while let Some(msg) = dispatch_rx.recv().await {
                let snapshot = dispatch_listeners.listeners.read().clone();
                for listener in snapshot {
                    match &msg {
                        Dispatch::StateChange(from, to) => listener.on_state_change(*from, *to),
                        Dispatch::Error(err) => listener.on_error(err),
                    }
                }
            }
        });

        let watchdog_lifecycle = lifecycle.clone();
        let watchdog = tokio::spawn(async move {
            loop {
                let current = *state_rx.borrow();
                tokio::select! {
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                    _ = tokio::time::sleep(state_timeout) => {
                        if let Some(event) = timeout_event(current) {
                            tracing::warn!(slice_id = %watchdog_lifecycle.slice_id, ?current, ?event, "state timed out, raising escape event");
                            let _ = watchdog_lifecycle.send(event);
                        }
                    }
                }
            }
        });

        (lifecycle, dispatcher, watchdog)
    }

    pub fn slice_id(&self) -> uuid::Uuid {
        self.slice_id
    }

    pub fn current_state(&self) -> SliceState {
        *self.state.lock()
    }

    pub fn add_listener(&self, listener: Arc<dyn SliceListener>) {
        self.listeners.write().push(listener);
    }

    /// Apply `event` to the current state. Serialized per slice: under
    /// concurrent calls exactly one observes its event accepted against a
    /// given `(state, event)` pair, the rest fail with `invalid-transition`.
    pub fn send(&self, event: SliceEvent) -> Result<()> {
        let mut state = self.state.lock();
        let from = *state;

        match next_state(from, event) {
            Some(to) => {
                *state = to;
                drop(state);
                let _ = self.state_watch.send(to);

                self.history.lock().push(TransitionRecord { from, to, event, at: chrono::Utc::now() });
                self.event_history.lock().push(EventRecord { event, at: chrono::Utc::now(), accepted: true });
                let _ = self.dispatch_tx.send(Dispatch::StateChange(from, to));
                Ok(())
            }
            None => {
                drop(state);
                self.event_history.lock().push(EventRecord { event, at: chrono::Utc::now(), accepted: false });
                let err = ManoError::new(
                    ErrorKind::InvalidTransition,
                    format!("event {event:?} is not valid from state {from:?}"),
                );
                let _ = self.dispatch_tx.send(Dispatch::Error(err.clone()));
                Err(err)
            }
        }
    }

    pub fn history(&self) -> Vec<TransitionRecord> {
        self.history.lock().clone()
    }

    pub fn event_history(&self) -> Vec<EventRecord> {
        self.event_history.lock().clone()
    }

    pub async fn retry_with_backoff<F, Fut>(&self, policy: &RetryPolicy, op: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<()>>,
    {
        crate::retry::retry_with_backoff(policy, op).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    struct RecordingListener {
        transitions: StdMutex<Vec<(SliceState, SliceState)>>,
        errors: AtomicUsize,
    }

    impl SliceListener for RecordingListener {
        fn on_state_change(&self, from: SliceState, to: SliceState) {
            self.transitions.lock().unwrap().push((from, to));
        }
        fn on_error(&self, _error: &ManoError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn happy_path_reaches_active_with_full_history() {
        let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(uuid::Uuid::new_v4(), Duration::from_secs(300));

        for event in [
            SliceEvent::Validate,
            SliceEvent::ValidationSuccess,
            SliceEvent::Plan,
            SliceEvent::PlanningSuccess,
            SliceEvent::Deploy,
            SliceEvent::DeploymentSuccess,
            SliceEvent::Activate,
        ] {
            lifecycle.send(event).unwrap();
        }

        assert_eq!(lifecycle.current_state(), SliceState::Active);
        assert_eq!(lifecycle.history().len(), 7);

        dispatcher.abort();
        watchdog.abort();
    }

    #[tokio::test]
    async fn invalid_transition_leaves_state_unchanged() {
        let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(uuid::Uuid::new_v4(), Duration::from_secs(300));

        let err = lifecycle.send(SliceEvent::Deploy).unwrap_err();
        assert!(err.is_kind(ErrorKind::InvalidTransition));
        assert_eq!(lifecycle.current_state(), SliceState::Initializing);

        dispatcher.abort();
        watchdog.abort();
    }

    #[tokio::test]
    async fn listener_sees_every_transition_in_order() {
        let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(uuid::Uuid::new_v4(), Duration::from_secs(300));
        let listener = Arc::new(RecordingListener { transitions: StdMutex::new(Vec::new()), errors: AtomicUsize::new(0) });
        lifecycle.add_listener(listener.clone());

        lifecycle.send(SliceEvent::Validate).unwrap();
        lifecycle.send(SliceEvent::ValidationSuccess).unwrap();
        let _ = lifecycle.send(SliceEvent::Deploy); // rejected, should fire on_error

        // Give the dispatcher task a chance to drain the queue.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let seen = listener.transitions.lock().unwrap().clone();
        assert_eq!(seen, vec![(SliceState::Initializing, SliceState::Validating), (SliceState::Validating, SliceState::Pending)]);
        assert_eq!(listener.errors.load(Ordering::SeqCst), 1);

        dispatcher.abort();
        watchdog.abort();
    }

    #[tokio::test]
    async fn restore_seeds_state_and_replays_pending_events() {
        let slice_id = uuid::Uuid::new_v4();
        let mut checkpoint = SliceRuntimeState::new(slice_id, mano_types::QosProfile::default());
        checkpoint.state = SliceState::Planned;

        let (lifecycle, dispatcher, watchdog) =
            SliceLifecycle::restore(checkpoint, vec![SliceEvent::Deploy, SliceEvent::DeploymentSuccess], Duration::from_secs(300));

        assert_eq!(lifecycle.slice_id(), slice_id);
        assert_eq!(lifecycle.current_state(), SliceState::Deployed);
        assert_eq!(lifecycle.history().len(), 2);

        dispatcher.abort();
        watchdog.abort();
    }
}
