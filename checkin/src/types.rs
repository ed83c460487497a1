//! Domain types shared by the scan gate, the roster and the remote clients.

use crate::error::CheckinError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a ticket or list entry as assigned by the remote service.
///
/// Opaque: the client never validates it beyond emptiness. Invalid ids are
/// rejected by the server, not locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Create a ticket id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (no request may be sent for it).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TicketId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The two remote resource kinds merged into one roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Scannable single-use admission ticket (`redeemed` flag)
    Ticket,
    /// Paid-list entry for attendees without a ticket (`paid` flag)
    ListEntry,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticket => f.write_str("ticket"),
            Self::ListEntry => f.write_str("list entry"),
        }
    }
}

/// One attendee record of the unified roster.
///
/// Records are replaced wholesale on every roster fetch and never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Remote-assigned id, unique within the roster
    pub id: TicketId,
    /// Display name
    pub full_name: String,
    /// Resource kind; fixed once fetched
    pub kind: RecordKind,
    /// `redeemed` for tickets, `paid` for list entries
    pub flagged: bool,
}

impl TicketRecord {
    /// A ticket record.
    #[must_use]
    pub fn ticket(id: impl Into<TicketId>, full_name: impl Into<String>, redeemed: bool) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            kind: RecordKind::Ticket,
            flagged: redeemed,
        }
    }

    /// A paid-list record.
    #[must_use]
    pub fn list_entry(id: impl Into<TicketId>, full_name: impl Into<String>, paid: bool) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            kind: RecordKind::ListEntry,
            flagged: paid,
        }
    }

    /// Human-readable status derived from the kind and flag.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        match (self.kind, self.flagged) {
            (RecordKind::Ticket, true) => "ALREADY REDEEMED ❌",
            (RecordKind::Ticket, false) => "VALID ✅",
            (RecordKind::ListEntry, true) => "PAID ✅",
            (RecordKind::ListEntry, false) => "NOT PAID ❌",
        }
    }

    /// The mutation that applies to this record's kind.
    #[must_use]
    pub fn mutation(&self) -> Mutation {
        Mutation::for_kind(self.kind, self.id.clone())
    }

    /// The mutation to offer in the list, or `None` once the flag is set.
    ///
    /// Flags only move from false to true, so a flagged record has no action.
    #[must_use]
    pub fn available_mutation(&self) -> Option<Mutation> {
        (!self.flagged).then(|| self.mutation())
    }
}

/// The one-way state change the client can request for a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mutation {
    /// Mark a ticket as used (`POST /tickets/redeem`)
    Redeem(TicketId),
    /// Mark a list entry as paid (`POST /list/paid`)
    MarkPaid(TicketId),
}

impl Mutation {
    /// Build the mutation matching a record kind.
    #[must_use]
    pub const fn for_kind(kind: RecordKind, id: TicketId) -> Self {
        match kind {
            RecordKind::Ticket => Self::Redeem(id),
            RecordKind::ListEntry => Self::MarkPaid(id),
        }
    }

    /// The id this mutation targets.
    #[must_use]
    pub const fn target(&self) -> &TicketId {
        match self {
            Self::Redeem(id) | Self::MarkPaid(id) => id,
        }
    }

    /// The kind of record this mutation applies to.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Redeem(_) => RecordKind::Ticket,
            Self::MarkPaid(_) => RecordKind::ListEntry,
        }
    }

    /// Short name for logs and metrics labels.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Redeem(_) => "redeem",
            Self::MarkPaid(_) => "mark_paid",
        }
    }
}

/// Why a mutation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionCause {
    /// Well-formed server reply with `success: false`
    Domain,
    /// No usable server reply (network, status or decode failure)
    Transport,
    /// Nothing was sent because the identifier was empty
    Input,
}

/// Interpreted result of a redeem / mark-paid round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    /// The server applied the mutation
    Accepted {
        /// Attendee name reported by the server (empty if not supplied)
        full_name: String,
        /// Ticket type reported by the server (empty if not supplied)
        ticket_type: String,
    },
    /// The server refused, or the request failed
    Rejected {
        /// Server message, or a generic fallback
        reason: String,
        /// Whether the server answered at all
        cause: RejectionCause,
    },
}

impl MutationOutcome {
    /// Reason used when the request never produced a usable reply.
    pub const TRANSPORT_REASON: &'static str = "transport error";

    /// Reason used when the server rejects without a message.
    pub const UNSPECIFIED_REASON: &'static str = "ticket rejected";

    /// Reason used when the identifier was empty and nothing was sent.
    pub const EMPTY_ID_REASON: &'static str = "empty code";

    /// Outcome for a mutation that ended in an error instead of a reply.
    #[must_use]
    pub fn from_error(error: &CheckinError) -> Self {
        match error {
            CheckinError::EmptyInput => Self::Rejected {
                reason: Self::EMPTY_ID_REASON.to_string(),
                cause: RejectionCause::Input,
            },
            _ => Self::transport_failure(),
        }
    }

    /// Rejection for a transport failure.
    #[must_use]
    pub fn transport_failure() -> Self {
        Self::Rejected {
            reason: Self::TRANSPORT_REASON.to_string(),
            cause: RejectionCause::Transport,
        }
    }

    /// Whether the mutation was applied.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_follow_kind_and_flag() {
        assert_eq!(TicketRecord::ticket("a", "Ann", false).status_label(), "VALID ✅");
        assert_eq!(
            TicketRecord::ticket("a", "Ann", true).status_label(),
            "ALREADY REDEEMED ❌"
        );
        assert_eq!(TicketRecord::list_entry("b", "Bo", true).status_label(), "PAID ✅");
        assert_eq!(
            TicketRecord::list_entry("b", "Bo", false).status_label(),
            "NOT PAID ❌"
        );
    }

    #[test]
    fn mutation_dispatches_on_kind() {
        let ticket = TicketRecord::ticket("t1", "Ann", false);
        let entry = TicketRecord::list_entry("u1", "Bo", false);

        assert_eq!(ticket.mutation(), Mutation::Redeem(TicketId::from("t1")));
        assert_eq!(entry.mutation(), Mutation::MarkPaid(TicketId::from("u1")));
        assert_eq!(entry.mutation().kind(), RecordKind::ListEntry);
    }

    #[test]
    fn flagged_records_offer_no_mutation() {
        assert!(TicketRecord::ticket("t1", "Ann", true).available_mutation().is_none());
        assert!(TicketRecord::list_entry("u1", "Bo", false).available_mutation().is_some());
    }

    #[test]
    fn ticket_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&TicketId::from("abc123")).unwrap_or_default();
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn errors_map_to_truthful_causes() {
        assert_eq!(
            MutationOutcome::from_error(&CheckinError::EmptyInput),
            MutationOutcome::Rejected {
                reason: "empty code".to_string(),
                cause: RejectionCause::Input,
            }
        );
        assert_eq!(
            MutationOutcome::from_error(&CheckinError::Decode("eof".to_string())),
            MutationOutcome::transport_failure()
        );
        assert_eq!(
            MutationOutcome::from_error(&CheckinError::Status {
                status: 502,
                body: "<html>".to_string(),
            }),
            MutationOutcome::transport_failure()
        );
    }
}
