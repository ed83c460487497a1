//! Reducer for the scan gate.

use super::types::{EMPTY_CODE_REASON, ScanEvent, ScanPhase, ScanResult, ScanSession};
use super::ScanGateAction;
use crate::environment::CheckinEnvironment;
use crate::types::MutationOutcome;
use checkin_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Reducer enforcing at most one redemption in flight per session.
///
/// The gate moves to `Pending` in the same reducer call that emits the
/// request, so a second scan reduced afterwards always sees it locked. A
/// request left running by `Deactivate` keeps a restarted gate in
/// `Draining` until its reply arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanGateReducer;

impl ScanGateReducer {
    /// Create a new scan gate reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn scan(
        session: &mut ScanSession,
        event: ScanEvent,
        env: &CheckinEnvironment,
    ) -> SmallVec<[Effect<ScanGateAction>; 4]> {
        if session.phase != ScanPhase::Armed {
            metrics::counter!("checkin.scans.ignored").increment(1);
            tracing::warn!(
                payload_type = %event.payload_type,
                phase = ?session.phase,
                "Scan ignored, gate not armed"
            );
            return smallvec![Effect::None];
        }

        metrics::counter!("checkin.scans.total", "type" => event.payload_type.clone()).increment(1);
        let ticket_id = env.normalizer().normalize(&event.payload);

        if ticket_id.is_empty() {
            tracing::warn!("Scan normalized to an empty id, nothing sent");
            session.phase = ScanPhase::Resolved;
            session.last_result = Some(ScanResult::rejected(EMPTY_CODE_REASON, env.clock().now()));
            return smallvec![Effect::None];
        }

        let scan_id = session.next_scan_id;
        session.next_scan_id += 1;
        session.phase = ScanPhase::Pending {
            scan_id,
            ticket_id: ticket_id.clone(),
        };
        tracing::debug!(scan_id, ticket_id = %ticket_id, "Scan accepted, redeeming");

        let redemption = env.redemption().clone();
        smallvec![Effect::future(async move {
            let outcome = redemption
                .redeem(&ticket_id)
                .await
                .unwrap_or_else(|error| MutationOutcome::from_error(&error));
            Some(ScanGateAction::RedemptionResolved { scan_id, outcome })
        })]
    }
}

impl Reducer for ScanGateReducer {
    type State = ScanSession;
    type Action = ScanGateAction;
    type Environment = CheckinEnvironment;

    fn reduce(
        &self,
        session: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ScanGateAction::Activate => {
                if session.phase != ScanPhase::Idle {
                    return smallvec![Effect::None];
                }

                if let Some(scan_id) = session.abandoned_scan {
                    session.phase = ScanPhase::Draining;
                    tracing::warn!(scan_id, "Previous redemption still in flight, gate held");
                } else {
                    session.phase = ScanPhase::Armed;
                    tracing::debug!("Scan gate armed");
                }
                smallvec![Effect::None]
            },

            ScanGateAction::Deactivate => {
                if let Some(scan_id) = session.pending_scan() {
                    session.abandoned_scan = Some(scan_id);
                    tracing::debug!(scan_id, "Pending redemption abandoned");
                }
                session.phase = ScanPhase::Idle;
                session.last_result = None;
                tracing::debug!("Scan gate deactivated");
                smallvec![Effect::None]
            },

            ScanGateAction::Scanned(event) => Self::scan(session, event, env),

            ScanGateAction::RedemptionResolved { scan_id, outcome } => {
                if session.abandoned_scan == Some(scan_id) {
                    session.abandoned_scan = None;
                    tracing::debug!(scan_id, "Abandoned redemption settled, reply discarded");
                    if session.phase == ScanPhase::Draining {
                        session.phase = ScanPhase::Armed;
                        tracing::debug!("Scan gate armed");
                    }
                    return smallvec![Effect::None];
                }

                if session.pending_scan() != Some(scan_id) {
                    tracing::debug!(scan_id, "Stale redemption reply discarded");
                    return smallvec![Effect::None];
                }

                let result = ScanResult::from_outcome(outcome, env.clock().now());
                tracing::debug!(scan_id, accepted = result.accepted, "Scan resolved");
                session.phase = ScanPhase::Resolved;
                session.last_result = Some(result);
                smallvec![Effect::None]
            },

            ScanGateAction::Acknowledge => {
                if session.phase == ScanPhase::Resolved {
                    session.phase = ScanPhase::Armed;
                    session.last_result = None;
                    tracing::debug!("Result acknowledged, gate re-armed");
                } else {
                    tracing::warn!(phase = ?session.phase, "Acknowledge ignored, nothing resolved");
                }
                smallvec![Effect::None]
            },
        }
    }
}
