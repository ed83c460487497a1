//! # Checkin Core
//!
//! Core traits and types for the check-in client.
//!
//! Every stateful part of the client (the scan gate, the roster, the app that
//! composes them) is written as a reducer:
//!
//! - **State**: Owned data for one feature (e.g. the scan session)
//! - **Action**: Every input the feature reacts to (scans, taps, server replies)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of I/O to run (not the I/O itself)
//! - **Environment**: Injected dependencies (remote service, clock)
//!
//! The runtime crate owns the state, runs reducers one action at a time and
//! executes the returned effects, feeding the actions they produce back in.
//!
//! ## Example
//!
//! ```ignore
//! use checkin_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for GateReducer {
//!     type State = GateState;
//!     type Action = GateAction;
//!     type Environment = GateEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut GateState,
//!         action: GateAction,
//!         env: &GateEnvironment,
//!     ) -> SmallVec<[Effect<GateAction>; 4]> {
//!         match action {
//!             GateAction::Scanned { code } if !state.locked => {
//!                 state.locked = true;
//!                 let service = env.service.clone();
//!                 smallvec![Effect::future(async move {
//!                     Some(GateAction::Resolved(service.redeem(code).await))
//!                 })]
//!             }
//!             _ => smallvec![Effect::None],
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the trait every feature implements
///
/// Reducers are pure: given the same state, action and environment they make
/// the same state change and return the same effect descriptions. All I/O is
/// deferred to the effects they return.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for feature logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer owns
    /// - `Action`: The inputs this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Most actions produce zero or one effect, so the result is a
        /// `SmallVec` that stays on the stack in the common case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned from reducers and executed by the Store.
/// An effect may produce a follow-up action that is fed back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future produced by an [`Effect::Future`]
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an effect
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }

        /// Lift the actions this effect produces into a parent action type
        ///
        /// Used when a parent reducer delegates to a child reducer: the
        /// child's effects produce child actions, which the parent wraps in
        /// its own enum (usually with a tuple-variant constructor).
        #[must_use]
        pub fn map<B>(self, f: fn(Action) -> B) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(f)).collect())
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Scan outcomes are stamped with the time they resolved; tests inject a
    /// fixed clock so those stamps are deterministic.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[derive(Debug, Clone, PartialEq)]
    enum Child {
        Done(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn none_and_empty_parallel_are_none() {
        assert!(Effect::<Child>::None.is_none());
        assert!(Effect::<Child>::Parallel(vec![Effect::None]).is_none());
        assert!(!Effect::<Child>::future(async { None }).is_none());
    }

    #[tokio::test]
    async fn map_lifts_future_output() {
        let effect = Effect::future(async { Some(Child::Done(7)) }).map(Parent::Child);

        let Effect::Future(fut) = effect else {
            unreachable!("mapping keeps the variant");
        };
        assert_eq!(fut.await, Some(Parent::Child(Child::Done(7))));
    }

    #[test]
    fn map_preserves_parallel_shape() {
        let effect = Effect::merge(vec![Effect::None, Effect::future(async { None::<Child> })])
            .map(Parent::Child);

        match effect {
            Effect::Parallel(inner) => assert_eq!(inner.len(), 2),
            other => unreachable!("expected parallel, got {other:?}"),
        }
    }
}
