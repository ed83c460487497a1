//! Inputs of the roster.

use crate::types::{Mutation, MutationOutcome, TicketRecord};

/// Actions processed by the roster reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterAction {
    /// Start a full refetch; supersedes any refresh still running
    Refresh,

    /// A refetch finished
    Loaded {
        /// Generation of the refresh that produced these records
        generation: u64,
        /// Unified roster (empty on failure)
        records: Vec<TicketRecord>,
    },

    /// Search text changed
    SetQuery(String),

    /// List control tapped: redeem a ticket or mark an entry paid
    Apply(Mutation),

    /// A list action's reply arrived
    MutationCompleted {
        /// The mutation that was sent
        mutation: Mutation,
        /// Interpreted reply
        outcome: MutationOutcome,
    },

    /// Notice dismissed
    DismissNotice,
}
