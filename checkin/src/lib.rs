//! Event check-in client.
//!
//! A scanning device reads a code, the client resolves it to a ticket through
//! the remote service and redeems it at most once per valid scan. A locally
//! held roster of tickets (and, optionally, paid-list entries) is kept in
//! step with the server by refetching it after every mutation.
//!
//! # Architecture
//!
//! ```text
//! scan source ──► ScanGate ──► CodeNormalizer ──► RedemptionClient ──┐
//!                                                                     │
//! list control ──► Roster (Apply) ──────────────► RedemptionClient ──┤
//!                                                                     ▼
//!                         CheckinReducer: reconcile ──► RosterClient (full refetch)
//!                                                                     │
//!                          search query ──► search::filter ◄──────────┘
//! ```
//!
//! Every stateful part is a reducer; [`app::CheckinApp`] runs the composed
//! reducer in a `checkin_runtime::Store`, which serialises reducer calls and
//! runs the remote calls as effects.
//!
//! # Key rules
//!
//! - **One scan in flight**: the gate locks in the same reducer call that
//!   issues the request; scans while locked are no-ops.
//! - **Server-authoritative**: `"already redeemed"` is a normal outcome, and
//!   nothing is cached or retried locally.
//! - **Replace, never patch**: the roster is swapped wholesale, and only the
//!   newest refresh may land.
//! - **Fail soft**: roster failures show an empty roster; redemption failures
//!   show a generic `"transport error"` result.

pub mod api;
pub mod app;
pub mod config;
pub mod environment;
pub mod error;
pub mod normalize;
pub mod redemption;
pub mod roster;
pub mod scan_gate;
pub mod search;
pub mod types;

pub use app::{CheckinAction, CheckinApp, CheckinReducer, CheckinState};
pub use config::{Config, ConfigError};
pub use environment::CheckinEnvironment;
pub use error::{CheckinError, CheckinResult};
pub use types::{Mutation, MutationOutcome, RecordKind, RejectionCause, TicketId, TicketRecord};
