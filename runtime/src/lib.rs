//! # Checkin Runtime
//!
//! Runtime for the check-in client.
//!
//! This crate provides the [`Store`] that owns a feature's state, runs its
//! reducer one action at a time and executes the effects the reducer returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns state behind an `RwLock` and serialises reducer calls
//! - **Effect Executor**: Spawns effect futures and feeds produced actions back
//! - **Teardown**: Abandons every in-flight effect when the owning view goes away
//!
//! ## Example
//!
//! ```ignore
//! use checkin_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait for everything it triggered
//! let mut handle = store.send(Action::Scanned { code }).await?;
//! handle.wait().await;
//!
//! // Read state
//! let locked = store.state(|s| s.session.is_locked()).await;
//!
//! // View unmounted: drop in-flight requests on the floor
//! store.teardown().await;
//! ```

use checkin_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

pub use error::StoreError;
pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// The store has been torn down and no longer accepts actions
        ///
        /// Returned by `send()` after `teardown()`. Actions produced by
        /// effects that finish after teardown are discarded with this error.
        #[error("Store has been torn down")]
        TornDown,
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. Waiting on it blocks until every effect
/// started by the action has finished, including the effects of actions
/// those effects fed back into the store. A scan therefore completes only
/// after the redemption reply and the roster refetch it triggers.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of effects still running for this handle
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, nothing can still be running
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    #[allow(clippy::result_unit_err)] // Mirrors tokio::time::timeout's "elapsed" with no payload
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: tracking context shared by every effect of one `send()`
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Runs even when the effect future panics or is abandoned at teardown.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements the store-wide in-flight counter on drop
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - the runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Effect, EffectHandle,
        EffectTracking, Ordering, Reducer, RwLock, StoreError, watch,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, written only by the reducer)
    /// 2. Reducer (feature logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Reducer calls are serialised by the write lock, so a state change made
    /// while handling one action is visible to the next action before any
    /// effect of the first one has started. The scan gate relies on this to
    /// lock itself before its redemption request is issued.
    ///
    /// Effects are bound to the store's lifetime: after [`Store::teardown`]
    /// in-flight effects are abandoned and whatever they would have produced
    /// is discarded without touching state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        torn_down: Arc<AtomicBool>,
        teardown_signal: Arc<watch::Sender<bool>>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (teardown_signal, _) = watch::channel(false);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                torn_down: Arc::new(AtomicBool::new(false)),
                teardown_signal: Arc::new(teardown_signal),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Starts the returned effects on background tasks
        ///
        /// Returns once the effects are started, not finished. Use the
        /// returned [`EffectHandle`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::TornDown`] if the store has been torn down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            let (handle, tracking) = EffectHandle::new();
            self.dispatch(action, tracking).await?;
            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let visible = store.state(|s| s.roster.visible().count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Tear the store down
        ///
        /// Stops accepting actions and abandons every in-flight effect. An
        /// effect that already finished but whose action has not been reduced
        /// yet is discarded as well. Calling this more than once is a no-op.
        pub async fn teardown(&self) {
            // Holding the write lock guarantees no reducer call is mid-flight
            let _state = self.state.write().await;

            if self.torn_down.swap(true, Ordering::AcqRel) {
                return;
            }

            self.teardown_signal.send_replace(true);
            tracing::info!(
                pending_effects = self.pending_effects.load(Ordering::Acquire),
                "Store torn down, abandoning in-flight effects"
            );
        }

        /// Whether [`Store::teardown`] has been called
        #[must_use]
        pub fn is_torn_down(&self) -> bool {
            self.torn_down.load(Ordering::Acquire)
        }

        /// Number of effects currently running across all sends
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        async fn dispatch(&self, action: A, tracking: EffectTracking) -> Result<(), StoreError> {
            let effects = {
                let mut state = self.state.write().await;

                // Checked under the lock so teardown cannot interleave
                if self.is_torn_down() {
                    metrics::counter!("store.actions.rejected").increment(1);
                    return Err(StoreError::TornDown);
                }

                metrics::counter!("store.commands.total").increment(1);
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(())
        }

        /// Execute an effect
        ///
        /// - `None`: No-op
        /// - `Parallel`: Executes each inner effect independently
        /// - `Future`: Spawns the future; a produced action is sent back to the
        ///   store under the same tracking, so the original handle also waits
        ///   for the follow-up work
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking = tracking.clone();
                    let mut teardown = self.teardown_signal.subscribe();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking.clone());
                        let _pending_guard = pending_guard;

                        let produced = tokio::select! {
                            biased;
                            _ = teardown.wait_for(|torn_down| *torn_down) => {
                                tracing::debug!("Effect abandoned at teardown");
                                metrics::counter!("store.effects.discarded").increment(1);
                                return;
                            }
                            produced = fut => produced,
                        };

                        if let Some(action) = produced {
                            if let Err(error) = store.dispatch(action, tracking).await {
                                tracing::debug!(%error, "Discarded action produced by effect");
                                metrics::counter!("store.effects.discarded").increment(1);
                            }
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                torn_down: Arc::clone(&self.torn_down),
                teardown_signal: Arc::clone(&self.teardown_signal),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use checkin_core::{smallvec, SmallVec};
    use tokio::sync::Notify;

    // A turnstile: counts admissions, some of which need a remote round-trip
    #[derive(Debug, Clone, Default)]
    struct Turnstile {
        admitted: u32,
    }

    #[derive(Debug, Clone)]
    enum TurnstileAction {
        Admit,
        RequestAdmission,
        RequestTwice,
        AwaitOperator,
    }

    #[derive(Clone, Default)]
    struct TurnstileEnv {
        operator: Arc<Notify>,
    }

    struct TurnstileReducer;

    impl Reducer for TurnstileReducer {
        type State = Turnstile;
        type Action = TurnstileAction;
        type Environment = TurnstileEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TurnstileAction::Admit => {
                    state.admitted += 1;
                    smallvec![Effect::None]
                },
                TurnstileAction::RequestAdmission => {
                    smallvec![Effect::future(async { Some(TurnstileAction::Admit) })]
                },
                TurnstileAction::RequestTwice => smallvec![Effect::merge(vec![
                    Effect::future(async { Some(TurnstileAction::RequestAdmission) }),
                    Effect::future(async { Some(TurnstileAction::RequestAdmission) }),
                ])],
                TurnstileAction::AwaitOperator => {
                    let operator = Arc::clone(&env.operator);
                    smallvec![Effect::future(async move {
                        operator.notified().await;
                        Some(TurnstileAction::Admit)
                    })]
                },
            }
        }
    }

    fn store() -> Store<Turnstile, TurnstileAction, TurnstileEnv, TurnstileReducer> {
        Store::new(Turnstile::default(), TurnstileReducer, TurnstileEnv::default())
    }

    #[tokio::test]
    async fn test_send_updates_state() {
        let store = store();

        let _ = store.send(TurnstileAction::Admit).await.unwrap();
        assert_eq!(store.state(|s| s.admitted).await, 1);
    }

    #[tokio::test]
    async fn test_future_feeds_action_back() {
        let store = store();

        let mut handle = store.send(TurnstileAction::RequestAdmission).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.admitted).await, 1);
    }

    #[tokio::test]
    async fn test_handle_waits_for_cascading_effects() {
        let store = store();

        let mut handle = store.send(TurnstileAction::RequestTwice).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(handle.pending(), 0);
        assert_eq!(store.state(|s| s.admitted).await, 2);
    }

    #[tokio::test]
    async fn test_completed_handle_does_not_block() {
        let mut handle = EffectHandle::completed();
        handle.wait_with_timeout(Duration::from_millis(50)).await.unwrap();
    }

    #[tokio::test]
    async fn test_teardown_rejects_new_actions() {
        let store = store();
        store.teardown().await;

        assert!(store.is_torn_down());
        assert_eq!(
            store.send(TurnstileAction::Admit).await.unwrap_err(),
            StoreError::TornDown
        );
    }

    #[tokio::test]
    async fn test_teardown_discards_in_flight_results() {
        let env = TurnstileEnv::default();
        let operator = Arc::clone(&env.operator);
        let store = Store::new(Turnstile::default(), TurnstileReducer, env);

        let mut handle = store.send(TurnstileAction::AwaitOperator).await.unwrap();
        assert_eq!(handle.pending(), 1);

        store.teardown().await;
        operator.notify_waiters();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.admitted).await, 0);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let store = store();
        store.teardown().await;
        store.teardown().await;
        assert!(store.is_torn_down());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = store();
        let other = store.clone();

        let _ = other.send(TurnstileAction::Admit).await.unwrap();
        assert_eq!(store.state(|s| s.admitted).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_sends_are_serialised() {
        let store = store();

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TurnstileAction::Admit).await;
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.state(|s| s.admitted).await, 10);
    }
}
