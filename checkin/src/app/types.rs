//! Top-level state and actions of the check-in client.

use crate::roster::{RosterAction, RosterState};
use crate::scan_gate::{ScanGateAction, ScanSession};

/// Everything the client holds in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckinState {
    /// Scan gate session
    pub session: ScanSession,
    /// Unified roster and list-action bookkeeping
    pub roster: RosterState,
}

impl CheckinState {
    /// Fresh state: gate idle, roster empty
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Actions accepted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinAction {
    /// Scanning view opened: arm the gate and load the roster
    Start,
    /// Scanning view closed: gate back to idle
    Stop,
    /// Scan gate input
    Gate(ScanGateAction),
    /// Roster input
    Roster(RosterAction),
}
