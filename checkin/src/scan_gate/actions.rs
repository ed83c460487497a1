//! Inputs of the scan gate.

use super::types::ScanEvent;
use crate::types::MutationOutcome;

/// Actions processed by the scan gate reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanGateAction {
    /// Scanning view shown: `Idle → Armed`
    Activate,

    /// Scanning view gone: back to `Idle`, any pending reply is discarded
    Deactivate,

    /// A payload came in from the scan source
    Scanned(ScanEvent),

    /// The redemption request for `scan_id` finished
    RedemptionResolved {
        /// Scan the reply belongs to
        scan_id: u64,
        /// Interpreted server reply
        outcome: MutationOutcome,
    },

    /// Operator dismissed the result: `Resolved → Armed`
    Acknowledge,
}
