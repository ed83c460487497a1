//! Roster: the unified ticket / list-entry collection and its list actions.
//!
//! [`RosterClient`] talks to the listing endpoints; [`RosterReducer`] owns
//! the local copy. The copy is never patched: it is replaced by the result
//! of the most recent refresh.

pub mod actions;
pub mod client;
pub mod reducer;
pub mod types;

pub use actions::RosterAction;
pub use client::RosterClient;
pub use reducer::RosterReducer;
pub use types::{Notice, RosterState};
