//! Readiness gate for the lazily-loaded library.
//!
//! Consumers register callbacks before the collection is loaded; the loader
//! drives exactly one terminal transition, which replays every pending
//! callback in registration order. Commit and replay share one critical
//! section so a callback registered concurrently with the transition is
//! never skipped and never runs twice.

use musictime_core::ReadyCallback;
use std::sync::Mutex;

/// Initialization state of a music source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Created,
    Initializing,
    Initialized,
    Error,
}

impl SourceState {
    /// `Initialized` and `Error` are terminal: no transition follows either.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SourceState::Initialized | SourceState::Error)
    }
}

struct GateInner {
    state: SourceState,
    listeners: Vec<ReadyCallback>,
}

pub struct ReadyGate {
    inner: Mutex<GateInner>,
}

impl ReadyGate {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(GateInner {
                state: SourceState::Created,
                listeners: Vec::new(),
            }),
        }
    }

    pub fn state(&self) -> SourceState {
        self.inner.lock().expect("gate poisoned").state
    }

    /// Commit a state transition.
    ///
    /// A terminal `next` commits the state first, then drains and invokes
    /// every pending listener, in registration order, with
    /// `next == Initialized`, all inside the same critical section. Once a
    /// terminal state is reached further calls are ignored, so a loader that
    /// completes twice cannot re-notify anyone.
    pub fn set_state(&self, next: SourceState) {
        let mut inner = self.inner.lock().expect("gate poisoned");
        if inner.state.is_terminal() {
            tracing::warn!(current = ?inner.state, rejected = ?next, "ignoring transition past terminal state");
            return;
        }
        inner.state = next;
        if next.is_terminal() {
            let success = next == SourceState::Initialized;
            let listeners = std::mem::take(&mut inner.listeners);
            tracing::debug!(success, count = listeners.len(), "replaying ready listeners");
            for listener in listeners {
                listener(success);
            }
        }
    }

    /// Claim the `Created → Initializing` transition. Returns `false` when a
    /// load attempt already claimed it, so concurrent loaders cannot scan
    /// twice.
    pub fn try_begin(&self) -> bool {
        let mut inner = self.inner.lock().expect("gate poisoned");
        if inner.state == SourceState::Created {
            inner.state = SourceState::Initializing;
            true
        } else {
            false
        }
    }

    /// Run `callback` once a terminal state is reached.
    ///
    /// Before the terminal transition the callback is parked and `false` is
    /// returned; afterwards it runs synchronously, before this call returns,
    /// with `state == Initialized`, and the call returns `true`.
    pub fn when_ready(&self, callback: ReadyCallback) -> bool {
        let mut inner = self.inner.lock().expect("gate poisoned");
        match inner.state {
            SourceState::Created | SourceState::Initializing => {
                inner.listeners.push(callback);
                false
            }
            state => {
                let success = state == SourceState::Initialized;
                drop(inner);
                callback(success);
                true
            }
        }
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn pending_listeners_fire_once_on_success() {
        let gate = ReadyGate::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            let pending = gate.when_ready(Box::new(move |ok| {
                assert!(ok);
                hits.fetch_add(1, Ordering::SeqCst);
            }));
            assert!(!pending);
        }

        gate.set_state(SourceState::Initializing);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        gate.set_state(SourceState::Initialized);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn listeners_receive_false_on_error() {
        let gate = ReadyGate::new();
        let outcome = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&outcome);
        gate.when_ready(Box::new(move |ok| {
            *seen.lock().unwrap() = Some(ok);
        }));

        gate.set_state(SourceState::Error);
        assert_eq!(*outcome.lock().unwrap(), Some(false));
    }

    #[test]
    fn listeners_replay_in_registration_order() {
        let gate = ReadyGate::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..4 {
            let order = Arc::clone(&order);
            gate.when_ready(Box::new(move |_| order.lock().unwrap().push(i)));
        }

        gate.set_state(SourceState::Initialized);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn registration_after_terminal_runs_synchronously() {
        let gate = ReadyGate::new();
        gate.set_state(SourceState::Initialized);

        let ran = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&ran);
        let handled = gate.when_ready(Box::new(move |ok| {
            assert!(ok);
            hits.fetch_add(1, Ordering::SeqCst);
        }));
        // Synchronous: already invoked by the time when_ready returns.
        assert!(handled);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transitions_past_terminal_are_ignored() {
        let gate = ReadyGate::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        gate.when_ready(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        gate.set_state(SourceState::Error);
        gate.set_state(SourceState::Initialized);
        gate.set_state(SourceState::Initializing);

        assert_eq!(gate.state(), SourceState::Error);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn direct_jump_to_terminal_is_allowed() {
        let gate = ReadyGate::new();
        assert_eq!(gate.state(), SourceState::Created);
        gate.set_state(SourceState::Initialized);
        assert_eq!(gate.state(), SourceState::Initialized);
    }

    #[test]
    fn try_begin_claims_the_load_once() {
        let gate = ReadyGate::new();
        assert!(gate.try_begin());
        assert_eq!(gate.state(), SourceState::Initializing);
        assert!(!gate.try_begin());

        gate.set_state(SourceState::Initialized);
        assert!(!gate.try_begin());
    }

    #[test]
    fn concurrent_registration_never_skips_or_doubles() {
        for _ in 0..50 {
            let gate = Arc::new(ReadyGate::new());
            gate.set_state(SourceState::Initializing);
            let hits = Arc::new(AtomicUsize::new(0));
            let registered = Arc::new(AtomicUsize::new(0));

            let mut handles = Vec::new();
            for _ in 0..4 {
                let gate = Arc::clone(&gate);
                let hits = Arc::clone(&hits);
                let registered = Arc::clone(&registered);
                handles.push(std::thread::spawn(move || {
                    for _ in 0..25 {
                        let hits = Arc::clone(&hits);
                        registered.fetch_add(1, Ordering::SeqCst);
                        gate.when_ready(Box::new(move |ok| {
                            assert!(ok);
                            hits.fetch_add(1, Ordering::SeqCst);
                        }));
                    }
                }));
            }

            let completer = {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || gate.set_state(SourceState::Initialized))
            };

            for handle in handles {
                handle.join().unwrap();
            }
            completer.join().unwrap();

            // Every registered listener fired exactly once, whether it was
            // parked before the transition or invoked synchronously after.
            assert_eq!(
                hits.load(Ordering::SeqCst),
                registered.load(Ordering::SeqCst)
            );
        }
    }
}
