//! Transport to the remote check-in service.
//!
//! [`CheckinApi`] is the seam between the client logic and the network. It
//! returns raw wire replies; interpreting them (outcome flags, fallbacks,
//! fail-soft policies) is the job of the redemption and roster clients.
//!
//! - [`HttpCheckinApi`]: JSON over HTTPS with `reqwest`
//! - [`MockCheckinApi`]: in-memory service with the server's redemption rules

pub mod http;
pub mod mock;
pub mod wire;

pub use http::HttpCheckinApi;
pub use mock::MockCheckinApi;
pub use wire::{ListReply, PaidReply, RedeemReply, TicketsReply};

use crate::error::CheckinResult;
use crate::types::TicketId;
use std::future::Future;
use std::pin::Pin;

/// Future returned by every [`CheckinApi`] call
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = CheckinResult<T>> + Send>>;

/// Remote check-in service
///
/// Futures are `'static` so they can be moved into effects. Calls are not
/// idempotent: none of them may be retried automatically.
pub trait CheckinApi: Send + Sync {
    /// `POST /tickets/redeem`
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was received
    fn redeem(&self, ticket_id: &TicketId) -> ApiFuture<RedeemReply>;

    /// `POST /list/paid`
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was received
    fn mark_paid(&self, user_id: &TicketId) -> ApiFuture<PaidReply>;

    /// `GET /tickets/all`
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was received
    fn all_tickets(&self) -> ApiFuture<TicketsReply>;

    /// `GET /list/all`
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was received
    fn all_list_entries(&self) -> ApiFuture<ListReply>;
}
