//! Application composition.
//!
//! - [`CheckinReducer`]: scan gate + roster, with the reconciliation policy
//! - [`CheckinApp`]: the composed reducer running in a Store

mod coordinator;
mod reducer;
#[cfg(test)]
mod tests;
mod types;

pub use coordinator::CheckinApp;
pub use reducer::CheckinReducer;
pub use types::{CheckinAction, CheckinState};
