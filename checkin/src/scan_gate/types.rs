//! Scan session state.

use crate::types::{MutationOutcome, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason shown when a scan normalizes to an empty id.
pub const EMPTY_CODE_REASON: &str = MutationOutcome::EMPTY_ID_REASON;

/// Raw event from a scan source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Symbology reported by the decoder (`"qr"`, `"keyboard"`, ...)
    pub payload_type: String,
    /// Decoded payload
    pub payload: String,
}

impl ScanEvent {
    /// Create a scan event
    #[must_use]
    pub fn new(payload_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            payload_type: payload_type.into(),
            payload: payload.into(),
        }
    }
}

/// Outcome displayed to the operator after a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Whether the ticket was redeemed by this scan
    pub accepted: bool,
    /// Attendee name (empty when rejected)
    pub name: String,
    /// Ticket type (empty when rejected)
    pub ticket_type: String,
    /// Operator-facing message
    pub message: String,
    /// When the outcome was recorded
    pub resolved_at: DateTime<Utc>,
}

impl ScanResult {
    /// Message shown for an accepted ticket
    pub const VALIDATED: &'static str = "VALIDATED ✅";

    /// Build the displayed result from a redemption outcome
    #[must_use]
    pub fn from_outcome(outcome: MutationOutcome, resolved_at: DateTime<Utc>) -> Self {
        match outcome {
            MutationOutcome::Accepted {
                full_name,
                ticket_type,
            } => Self {
                accepted: true,
                name: full_name,
                ticket_type,
                message: Self::VALIDATED.to_string(),
                resolved_at,
            },
            MutationOutcome::Rejected { reason, .. } => Self::rejected(&reason, resolved_at),
        }
    }

    /// Rejected result with the given reason
    #[must_use]
    pub fn rejected(reason: &str, resolved_at: DateTime<Utc>) -> Self {
        Self {
            accepted: false,
            name: String::new(),
            ticket_type: String::new(),
            message: format!("INVALID TCKT ❌ - {reason}"),
            resolved_at,
        }
    }
}

/// Where the gate is in its cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanPhase {
    /// No session active; scans are ignored
    #[default]
    Idle,
    /// Ready to accept one scan
    Armed,
    /// A redemption request is in flight
    Pending {
        /// Sequence number of the scan being resolved
        scan_id: u64,
        /// Normalized id sent to the server
        ticket_id: TicketId,
    },
    /// Result on screen until acknowledged
    Resolved,
    /// Activated while a request from a stopped session is outstanding;
    /// arms once that reply arrives
    Draining,
}

/// Per-device scan session, owned by the scan gate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSession {
    /// Current phase
    pub phase: ScanPhase,
    /// Result on screen, present exactly in `Resolved`
    pub last_result: Option<ScanResult>,
    /// Sequence number for the next accepted scan
    pub next_scan_id: u64,
    /// Scan whose request was still in flight when the gate was stopped
    pub abandoned_scan: Option<u64>,
}

impl ScanSession {
    /// An inactive session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a request is in flight or a result is displayed
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(
            self.phase,
            ScanPhase::Pending { .. } | ScanPhase::Resolved | ScanPhase::Draining
        )
    }

    /// Whether the gate has been activated
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.phase, ScanPhase::Idle)
    }

    /// The scan id awaiting a reply, if any
    #[must_use]
    pub const fn pending_scan(&self) -> Option<u64> {
        match self.phase {
            ScanPhase::Pending { scan_id, .. } => Some(scan_id),
            _ => None,
        }
    }
}
