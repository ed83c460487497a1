//! `reqwest` implementation of the check-in service.

use super::wire::{PaidRequest, RedeemRequest};
use super::{ApiFuture, CheckinApi, ListReply, PaidReply, RedeemReply, TicketsReply};
use crate::error::{CheckinError, CheckinResult};
use crate::types::TicketId;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the check-in service
#[derive(Clone, Debug)]
pub struct HttpCheckinApi {
    client: Client,
    base_url: String,
}

impl HttpCheckinApi {
    /// Create a client without a request timeout
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client with an optional per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `CheckinError::Transport` if the TLS backend cannot be initialised
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> CheckinResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CheckinError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Send a request and decode its JSON body.
///
/// The body is decoded whatever the status: the service answers rejected
/// redemptions with `success: false` and a 4xx code.
async fn exchange<T: DeserializeOwned>(request: RequestBuilder) -> CheckinResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| CheckinError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CheckinError::Transport(e.to_string()))?;

    match serde_json::from_str::<T>(&body) {
        Ok(reply) => {
            if !status.is_success() {
                tracing::debug!(status = status.as_u16(), "Decoded reply from non-success status");
            }
            Ok(reply)
        },
        Err(error) if status.is_success() => Err(CheckinError::Decode(error.to_string())),
        Err(_) => Err(CheckinError::Status {
            status: status.as_u16(),
            body,
        }),
    }
}

impl CheckinApi for HttpCheckinApi {
    fn redeem(&self, ticket_id: &TicketId) -> ApiFuture<RedeemReply> {
        let request = self
            .client
            .post(self.endpoint("tickets/redeem"))
            .json(&RedeemRequest {
                ticket_id: ticket_id.to_string(),
            });
        Box::pin(exchange(request))
    }

    fn mark_paid(&self, user_id: &TicketId) -> ApiFuture<PaidReply> {
        let request = self
            .client
            .post(self.endpoint("list/paid"))
            .json(&PaidRequest {
                user_id: user_id.to_string(),
            });
        Box::pin(exchange(request))
    }

    fn all_tickets(&self) -> ApiFuture<TicketsReply> {
        Box::pin(exchange(self.client.get(self.endpoint("tickets/all"))))
    }

    fn all_list_entries(&self) -> ApiFuture<ListReply> {
        Box::pin(exchange(self.client.get(self.endpoint("list/all"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let api = HttpCheckinApi::new("https://example.test/api/");
        assert_eq!(api.endpoint("tickets/redeem"), "https://example.test/api/tickets/redeem");

        let api = HttpCheckinApi::new("https://example.test/api");
        assert_eq!(api.endpoint("list/all"), "https://example.test/api/list/all");
    }

    #[test]
    fn timeout_client_keeps_base_url() {
        let api = HttpCheckinApi::with_timeout("http://localhost:1", Some(Duration::from_secs(2)));
        assert_eq!(api.map(|a| a.base_url().to_string()), Ok("http://localhost:1".to_string()));
    }
}
