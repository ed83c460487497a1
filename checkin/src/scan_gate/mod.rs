//! Scan gate: the state machine deciding when a scan may reach the server.
//!
//! ```text
//! Idle --Activate--> Armed --Scanned--> Pending --RedemptionResolved--> Resolved
//!                      ^                                                    |
//!                      +-------------------- Acknowledge -------------------+
//! ```
//!
//! `Deactivate` drops a pending reply; if the gate is activated again before
//! that reply arrives it waits in `Draining` and arms once it lands.
//!
//! Scans arriving in any phase but `Armed` are no-ops. Domain rejections and
//! transport failures both end in `Resolved`; nothing is retried and there
//! is no auto-reset.

pub mod actions;
pub mod reducer;
pub mod types;

pub use actions::ScanGateAction;
pub use reducer::ScanGateReducer;
pub use types::{ScanEvent, ScanPhase, ScanResult, ScanSession};
