//! Redemption client: issues redeem / mark-paid mutations and interprets replies.
//!
//! The server is the only arbiter of validity. A reply with `success: false`
//! is a [`MutationOutcome::Rejected`] with [`RejectionCause::Domain`]; a
//! request that produced no usable reply is rejected with
//! [`RejectionCause::Transport`] and the generic `"transport error"` reason.
//! Nothing is retried: the endpoints carry no idempotency key.

use crate::api::{CheckinApi, PaidReply, RedeemReply};
use crate::error::{CheckinError, CheckinResult};
use crate::types::{Mutation, MutationOutcome, RejectionCause, TicketId};
use std::sync::Arc;

/// Client for the mutating endpoints
#[derive(Clone)]
pub struct RedemptionClient {
    api: Arc<dyn CheckinApi>,
}

impl RedemptionClient {
    /// Create a client over the given transport
    #[must_use]
    pub fn new(api: Arc<dyn CheckinApi>) -> Self {
        Self { api }
    }

    /// Redeem a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`CheckinError::EmptyInput`] for an empty id; no request is sent.
    pub async fn redeem(&self, ticket_id: &TicketId) -> CheckinResult<MutationOutcome> {
        self.apply(&Mutation::Redeem(ticket_id.clone())).await
    }

    /// Mark a list entry as paid.
    ///
    /// # Errors
    ///
    /// Returns [`CheckinError::EmptyInput`] for an empty id; no request is sent.
    pub async fn mark_paid(&self, user_id: &TicketId) -> CheckinResult<MutationOutcome> {
        self.apply(&Mutation::MarkPaid(user_id.clone())).await
    }

    /// Apply either mutation.
    ///
    /// Transport failures are folded into the outcome; the only error is
    /// an empty target id.
    ///
    /// # Errors
    ///
    /// Returns [`CheckinError::EmptyInput`] for an empty id; no request is sent.
    pub async fn apply(&self, mutation: &Mutation) -> CheckinResult<MutationOutcome> {
        let target = mutation.target();
        if target.is_empty() {
            tracing::warn!(mutation = mutation.name(), "Empty identifier, mutation not sent");
            return Err(CheckinError::EmptyInput);
        }

        let result = match mutation {
            Mutation::Redeem(id) => self.api.redeem(id).await.map(interpret_redeem),
            Mutation::MarkPaid(id) => self.api.mark_paid(id).await.map(interpret_paid),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(
                    mutation = mutation.name(),
                    id = %target,
                    error = %error,
                    "Mutation request failed"
                );
                MutationOutcome::transport_failure()
            },
        };

        let label = match &outcome {
            MutationOutcome::Accepted { .. } => "accepted",
            MutationOutcome::Rejected {
                cause: RejectionCause::Domain,
                ..
            } => "rejected",
            MutationOutcome::Rejected {
                cause: RejectionCause::Transport,
                ..
            } => "transport_error",
            MutationOutcome::Rejected {
                cause: RejectionCause::Input,
                ..
            } => "invalid_input",
        };
        metrics::counter!(
            "checkin.mutations.total",
            "mutation" => mutation.name(),
            "outcome" => label
        )
        .increment(1);

        if let MutationOutcome::Rejected {
            reason,
            cause: RejectionCause::Domain,
        } = &outcome
        {
            tracing::warn!(mutation = mutation.name(), id = %target, reason = %reason, "Mutation rejected");
        }

        Ok(outcome)
    }
}

impl std::fmt::Debug for RedemptionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedemptionClient").finish_non_exhaustive()
    }
}

fn rejection(message: Option<String>) -> MutationOutcome {
    MutationOutcome::Rejected {
        reason: message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| MutationOutcome::UNSPECIFIED_REASON.to_string()),
        cause: RejectionCause::Domain,
    }
}

fn interpret_redeem(reply: RedeemReply) -> MutationOutcome {
    if reply.success {
        MutationOutcome::Accepted {
            full_name: reply.full_name.unwrap_or_default(),
            ticket_type: reply.ticket_type.unwrap_or_default(),
        }
    } else {
        rejection(reply.message)
    }
}

fn interpret_paid(reply: PaidReply) -> MutationOutcome {
    if reply.success {
        MutationOutcome::Accepted {
            full_name: String::new(),
            ticket_type: String::new(),
        }
    } else {
        rejection(reply.message)
    }
}
