//! Root reducer: composes the scan gate and the roster, and owns the
//! reconciliation policy.

use super::{CheckinAction, CheckinState};
use crate::environment::CheckinEnvironment;
use crate::roster::{RosterAction, RosterReducer};
use crate::scan_gate::{ScanGateAction, ScanGateReducer};
use checkin_core::{effect::Effect, reducer::Reducer, SmallVec};

type Effects = SmallVec<[Effect<CheckinAction>; 4]>;

/// Root reducer of the client.
///
/// Every finished mutation, scanned or tapped, accepted or rejected, is
/// followed by a full roster refresh. The roster is never patched locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckinReducer {
    gate: ScanGateReducer,
    roster: RosterReducer,
}

impl CheckinReducer {
    /// Create a new root reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gate: ScanGateReducer::new(),
            roster: RosterReducer::new(),
        }
    }

    fn gate(
        &self,
        state: &mut CheckinState,
        action: ScanGateAction,
        env: &CheckinEnvironment,
    ) -> Effects {
        self.gate
            .reduce(&mut state.session, action, env)
            .into_iter()
            .map(|effect| effect.map(CheckinAction::Gate))
            .collect()
    }

    fn roster(
        &self,
        state: &mut CheckinState,
        action: RosterAction,
        env: &CheckinEnvironment,
    ) -> Effects {
        self.roster
            .reduce(&mut state.roster, action, env)
            .into_iter()
            .map(|effect| effect.map(CheckinAction::Roster))
            .collect()
    }

    fn reconcile(&self, state: &mut CheckinState, env: &CheckinEnvironment, effects: &mut Effects) {
        tracing::debug!("Mutation finished, reconciling roster");
        effects.extend(self.roster(state, RosterAction::Refresh, env));
    }
}

impl Reducer for CheckinReducer {
    type State = CheckinState;
    type Action = CheckinAction;
    type Environment = CheckinEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CheckinAction::Start => {
                let mut effects = self.gate(state, ScanGateAction::Activate, env);
                effects.extend(self.roster(state, RosterAction::Refresh, env));
                effects
            },

            CheckinAction::Stop => self.gate(state, ScanGateAction::Deactivate, env),

            CheckinAction::Gate(action) => {
                let finished = matches!(action, ScanGateAction::RedemptionResolved { .. });
                let mut effects = self.gate(state, action, env);
                if finished {
                    self.reconcile(state, env, &mut effects);
                }
                effects
            },

            CheckinAction::Roster(action) => {
                let finished = matches!(action, RosterAction::MutationCompleted { .. });
                let mut effects = self.roster(state, action, env);
                if finished {
                    self.reconcile(state, env, &mut effects);
                }
                effects
            },
        }
    }
}
