//! Integration tests for effect cascades through the Store
//!
//! A lookup desk resolves several codes in parallel; each resolution feeds
//! an action back, which may start more work. The handle returned by `send`
//! must cover the whole cascade.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use checkin_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use checkin_runtime::{Store, StoreError};
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum DeskAction {
    /// Resolve every code concurrently
    ResolveAll { codes: Vec<String> },
    /// One code resolved
    Resolved { code: String },
    /// Resolve, then confirm once resolved
    ResolveAndConfirm { code: String },
    /// Confirmation step
    Confirmed { code: String },
}

#[derive(Debug, Clone, Default)]
struct DeskState {
    resolved: Vec<String>,
    confirmed: Vec<String>,
}

#[derive(Clone)]
struct DeskEnvironment {
    latency: Duration,
}

struct DeskReducer;

impl Reducer for DeskReducer {
    type State = DeskState;
    type Action = DeskAction;
    type Environment = DeskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DeskAction::ResolveAll { codes } => {
                let latency = env.latency;
                let lookups = codes
                    .into_iter()
                    .map(|code| {
                        Effect::future(async move {
                            tokio::time::sleep(latency).await;
                            Some(DeskAction::Resolved { code })
                        })
                    })
                    .collect();
                smallvec![Effect::Parallel(lookups)]
            },

            DeskAction::Resolved { code } => {
                state.resolved.push(code);
                smallvec![Effect::None]
            },

            DeskAction::ResolveAndConfirm { code } => {
                let latency = env.latency;
                smallvec![Effect::future(async move {
                    tokio::time::sleep(latency).await;
                    Some(DeskAction::Confirmed { code })
                })]
            },

            DeskAction::Confirmed { code } => {
                state.confirmed.push(code.clone());
                let latency = env.latency;
                smallvec![Effect::future(async move {
                    tokio::time::sleep(latency).await;
                    // Terminal step: records the confirmation
                    Some(DeskAction::Resolved {
                        code: format!("{code}:confirmed"),
                    })
                })]
            },
        }
    }
}

fn store(latency: Duration) -> Store<DeskState, DeskAction, DeskEnvironment, DeskReducer> {
    Store::new(DeskState::default(), DeskReducer, DeskEnvironment { latency })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_parallel_effects_all_feed_back() {
    let store = store(Duration::from_millis(5));

    let mut handle = store
        .send(DeskAction::ResolveAll {
            codes: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        })
        .await
        .unwrap();
    handle.wait().await;

    let mut resolved = store.state(|s| s.resolved.clone()).await;
    resolved.sort();
    assert_eq!(resolved, vec!["a", "b", "c"]);
    assert_eq!(store.pending_effects(), 0);
}

#[tokio::test]
async fn test_handle_covers_multi_step_cascade() {
    let store = store(Duration::from_millis(5));

    let mut handle = store
        .send(DeskAction::ResolveAndConfirm {
            code: "x".to_string(),
        })
        .await
        .unwrap();
    handle.wait().await;

    assert_eq!(store.state(|s| s.confirmed.clone()).await, vec!["x".to_string()]);
    assert_eq!(
        store.state(|s| s.resolved.clone()).await,
        vec!["x:confirmed".to_string()]
    );
}

#[tokio::test]
async fn test_empty_parallel_completes_immediately() {
    let store = store(Duration::from_millis(5));

    let mut handle = store
        .send(DeskAction::ResolveAll { codes: Vec::new() })
        .await
        .unwrap();

    assert!(handle.wait_with_timeout(Duration::from_millis(100)).await.is_ok());
    assert!(store.state(|s| s.resolved.is_empty()).await);
}

#[tokio::test]
async fn test_teardown_mid_cascade_stops_follow_up_work() {
    let store = store(Duration::from_millis(50));

    let mut handle = store
        .send(DeskAction::ResolveAll {
            codes: vec!["a".to_string(), "b".to_string()],
        })
        .await
        .unwrap();
    store.teardown().await;

    assert!(handle.wait_with_timeout(Duration::from_secs(2)).await.is_ok());
    assert!(store.state(|s| s.resolved.is_empty()).await);
    assert!(store.state(|s| s.confirmed.is_empty()).await);
    assert_eq!(
        store
            .send(DeskAction::Resolved {
                code: "late".to_string()
            })
            .await
            .err(),
        Some(StoreError::TornDown)
    );
}
