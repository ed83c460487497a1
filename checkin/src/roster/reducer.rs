//! Reducer for the roster.

use super::{Notice, RosterAction, RosterState};
use crate::environment::CheckinEnvironment;
use crate::types::MutationOutcome;
use checkin_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Reducer owning the roster collection and the list actions.
///
/// The collection only changes through `Loaded`, and only the load of the
/// latest refresh generation is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterReducer;

impl RosterReducer {
    /// Create a new roster reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for RosterReducer {
    type State = RosterState;
    type Action = RosterAction;
    type Environment = CheckinEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RosterAction::Refresh => {
                state.generation += 1;
                state.loading = true;
                let generation = state.generation;
                tracing::debug!(generation, "Roster refresh started");

                let roster = env.roster().clone();
                smallvec![Effect::future(async move {
                    let records = roster.fetch_roster().await;
                    Some(RosterAction::Loaded {
                        generation,
                        records,
                    })
                })]
            },

            RosterAction::Loaded {
                generation,
                records,
            } => {
                if generation != state.generation {
                    tracing::debug!(
                        generation,
                        current = state.generation,
                        "Stale roster load discarded"
                    );
                    return smallvec![Effect::None];
                }

                tracing::debug!(generation, records = records.len(), "Roster replaced");
                state.records = records;
                state.loading = false;
                smallvec![Effect::None]
            },

            RosterAction::SetQuery(query) => {
                state.query = query;
                smallvec![Effect::None]
            },

            RosterAction::Apply(mutation) => {
                let target = mutation.target().clone();
                if target.is_empty() {
                    tracing::warn!(mutation = mutation.name(), "List action without id ignored");
                    return smallvec![Effect::None];
                }
                if !state.in_flight.insert(target.clone()) {
                    tracing::warn!(
                        mutation = mutation.name(),
                        id = %target,
                        "List action already in flight, ignored"
                    );
                    return smallvec![Effect::None];
                }

                tracing::debug!(mutation = mutation.name(), id = %target, "List action sent");
                let redemption = env.redemption().clone();
                smallvec![Effect::future(async move {
                    let outcome = redemption
                        .apply(&mutation)
                        .await
                        .unwrap_or_else(|error| MutationOutcome::from_error(&error));
                    Some(RosterAction::MutationCompleted { mutation, outcome })
                })]
            },

            RosterAction::MutationCompleted { mutation, outcome } => {
                state.in_flight.remove(mutation.target());
                state.last_notice = Some(Notice::for_outcome(&mutation, &outcome));
                smallvec![Effect::None]
            },

            RosterAction::DismissNotice => {
                state.last_notice = None;
                smallvec![Effect::None]
            },
        }
    }
}
