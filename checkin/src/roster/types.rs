//! Roster state.

use crate::search;
use crate::types::{Mutation, MutationOutcome, TicketId, TicketRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of a list action, shown as a dismissable notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Whether the server applied the mutation
    pub accepted: bool,
    /// Operator-facing headline
    pub message: String,
    /// Server reason on rejection
    pub reason: Option<String>,
}

impl Notice {
    /// Build the notice for a finished list action
    #[must_use]
    pub fn for_outcome(mutation: &Mutation, outcome: &MutationOutcome) -> Self {
        let message = match (mutation, outcome.is_accepted()) {
            (Mutation::Redeem(_), true) => "Ticket redeemed successfully!",
            (Mutation::Redeem(_), false) => "Error redeeming ticket!",
            (Mutation::MarkPaid(_), true) => "Entry marked as paid!",
            (Mutation::MarkPaid(_), false) => "Error marking entry as paid!",
        };
        let reason = match outcome {
            MutationOutcome::Accepted { .. } => None,
            MutationOutcome::Rejected { reason, .. } => Some(reason.clone()),
        };

        Self {
            accepted: outcome.is_accepted(),
            message: message.to_string(),
            reason,
        }
    }
}

/// Locally held roster, replaced wholesale on every load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterState {
    /// Records of the latest applied load
    pub records: Vec<TicketRecord>,
    /// Current search query
    pub query: String,
    /// Generation of the most recent refresh request
    pub generation: u64,
    /// Whether the most recent refresh is still running
    pub loading: bool,
    /// Records with a list action awaiting its reply
    pub in_flight: HashSet<TicketId>,
    /// Outcome of the last finished list action
    pub last_notice: Option<Notice>,
}

impl RosterState {
    /// An empty roster
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records matching the current query, in roster order
    pub fn visible(&self) -> impl Iterator<Item = &TicketRecord> {
        search::filter(&self.query, &self.records)
    }

    /// Look a record up by id
    #[must_use]
    pub fn find(&self, id: &TicketId) -> Option<&TicketRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Whether a list action for `id` is awaiting its reply
    #[must_use]
    pub fn is_in_flight(&self, id: &TicketId) -> bool {
        self.in_flight.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RejectionCause;

    #[test]
    fn notice_texts_follow_mutation_and_outcome() {
        let paid = Notice::for_outcome(
            &Mutation::MarkPaid(TicketId::from("u1")),
            &MutationOutcome::Accepted {
                full_name: String::new(),
                ticket_type: String::new(),
            },
        );
        assert!(paid.accepted);
        assert_eq!(paid.message, "Entry marked as paid!");
        assert_eq!(paid.reason, None);

        let refused = Notice::for_outcome(
            &Mutation::Redeem(TicketId::from("t1")),
            &MutationOutcome::Rejected {
                reason: "already redeemed".to_string(),
                cause: RejectionCause::Domain,
            },
        );
        assert!(!refused.accepted);
        assert_eq!(refused.message, "Error redeeming ticket!");
        assert_eq!(refused.reason.as_deref(), Some("already redeemed"));
    }

    #[test]
    fn visible_applies_query() {
        let state = RosterState {
            records: vec![
                TicketRecord::ticket("1", "José", false),
                TicketRecord::ticket("2", "Ana", false),
            ],
            query: "jose".to_string(),
            ..RosterState::new()
        };

        let ids: Vec<_> = state.visible().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }
}
