//! Unit tests for the root reducer and its reconciliation policy.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use super::*;
use crate::api::MockCheckinApi;
use crate::environment::CheckinEnvironment;
use crate::normalize::CodeNormalizer;
use crate::roster::RosterAction;
use crate::scan_gate::{ScanEvent, ScanGateAction, ScanPhase};
use crate::types::{Mutation, MutationOutcome, TicketId};
use checkin_testing::{ReducerTest, assertions, test_clock};
use std::sync::Arc;

fn env() -> CheckinEnvironment {
    CheckinEnvironment::new(
        Arc::new(MockCheckinApi::new()),
        CodeNormalizer::default(),
        true,
        Arc::new(test_clock()),
    )
}

#[test]
fn test_start_arms_gate_and_loads_roster() {
    ReducerTest::new(CheckinReducer::new())
        .with_env(env())
        .given_state(CheckinState::new())
        .when_action(CheckinAction::Start)
        .then_state(|s| {
            assert_eq!(s.session.phase, ScanPhase::Armed);
            assert_eq!(s.roster.generation, 1);
            assert!(s.roster.loading);
        })
        .then_effects(|effects| assert_eq!(assertions::count_future_effects(effects), 1))
        .run();
}

#[test]
fn test_stop_idles_gate_without_effects() {
    ReducerTest::new(CheckinReducer::new())
        .with_env(env())
        .given_state(CheckinState::new())
        .when_action(CheckinAction::Start)
        .when_action(CheckinAction::Stop)
        .then_state(|s| assert_eq!(s.session.phase, ScanPhase::Idle))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn test_scan_does_not_refresh_before_reply() {
    ReducerTest::new(CheckinReducer::new())
        .with_env(env())
        .given_state(CheckinState::new())
        .when_action(CheckinAction::Start)
        .when_action(CheckinAction::Gate(ScanGateAction::Scanned(ScanEvent::new(
            "qr",
            "0477GROUP:abc123",
        ))))
        .then_state(|s| assert_eq!(s.roster.generation, 1))
        .then_effects(|effects| assert_eq!(assertions::count_future_effects(effects), 1))
        .run();
}

#[test]
fn test_redemption_reply_triggers_refresh_on_rejection() {
    ReducerTest::new(CheckinReducer::new())
        .with_env(env())
        .given_state(CheckinState::new())
        .when_action(CheckinAction::Start)
        .when_action(CheckinAction::Gate(ScanGateAction::Scanned(ScanEvent::new(
            "qr", "xyz999",
        ))))
        .when_action(CheckinAction::Gate(ScanGateAction::RedemptionResolved {
            scan_id: 0,
            outcome: MutationOutcome::transport_failure(),
        }))
        .then_state(|s| {
            assert_eq!(s.session.phase, ScanPhase::Resolved);
            assert_eq!(s.roster.generation, 2);
        })
        .then_effects(|effects| assert_eq!(assertions::count_future_effects(effects), 1))
        .run();
}

#[test]
fn test_list_action_completion_triggers_refresh() {
    let mutation = Mutation::MarkPaid(TicketId::from("u1"));

    ReducerTest::new(CheckinReducer::new())
        .with_env(env())
        .given_state(CheckinState::new())
        .when_action(CheckinAction::Roster(RosterAction::Apply(mutation.clone())))
        .when_action(CheckinAction::Roster(RosterAction::MutationCompleted {
            mutation,
            outcome: MutationOutcome::Accepted {
                full_name: String::new(),
                ticket_type: String::new(),
            },
        }))
        .then_state(|s| {
            assert!(s.roster.in_flight.is_empty());
            assert_eq!(s.roster.generation, 1);
            assert!(s.roster.last_notice.as_ref().unwrap().accepted);
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn test_query_change_does_not_refresh() {
    ReducerTest::new(CheckinReducer::new())
        .with_env(env())
        .given_state(CheckinState::new())
        .when_action(CheckinAction::Roster(RosterAction::SetQuery("ann".to_string())))
        .then_state(|s| assert_eq!(s.roster.generation, 0))
        .then_effects(assertions::assert_no_effects)
        .run();
}
