//! In-memory check-in service for development and testing.
//!
//! Applies the same rules as the real service: a ticket redeems once, later
//! attempts answer `already redeemed`; unknown ids answer `not found`. The
//! mock can be taken offline to simulate transport failures, and paused to
//! hold replies in flight.

use super::wire::{ListEntryDto, TicketDto};
use super::{ApiFuture, CheckinApi, ListReply, PaidReply, RedeemReply, TicketsReply};
use crate::error::CheckinError;
use crate::types::TicketId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

#[derive(Debug, Clone)]
struct MockTicket {
    full_name: String,
    ticket_type: String,
    redeemed: bool,
}

#[derive(Debug, Clone)]
struct MockEntry {
    full_name: String,
    paid: bool,
}

#[derive(Debug, Default)]
struct Records {
    tickets: BTreeMap<String, MockTicket>,
    entries: BTreeMap<String, MockEntry>,
}

#[derive(Debug)]
struct Inner {
    records: Mutex<Records>,
    offline: AtomicBool,
    paused: watch::Sender<bool>,
    redeem_calls: AtomicUsize,
    mark_paid_calls: AtomicUsize,
    roster_fetches: AtomicUsize,
}

/// Mock check-in service (shared state, cheap to clone)
#[derive(Clone, Debug)]
pub struct MockCheckinApi {
    inner: Arc<Inner>,
}

impl MockCheckinApi {
    /// Creates an empty mock service
    #[must_use]
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                records: Mutex::new(Records::default()),
                offline: AtomicBool::new(false),
                paused,
                redeem_calls: AtomicUsize::new(0),
                mark_paid_calls: AtomicUsize::new(0),
                roster_fetches: AtomicUsize::new(0),
            }),
        }
    }

    /// Adds an unredeemed ticket
    #[must_use]
    pub fn with_ticket(
        self,
        id: impl Into<String>,
        full_name: impl Into<String>,
        ticket_type: impl Into<String>,
    ) -> Self {
        self.records().tickets.insert(
            id.into(),
            MockTicket {
                full_name: full_name.into(),
                ticket_type: ticket_type.into(),
                redeemed: false,
            },
        );
        self
    }

    /// Adds an unpaid list entry
    #[must_use]
    pub fn with_list_entry(self, id: impl Into<String>, full_name: impl Into<String>) -> Self {
        self.records().entries.insert(
            id.into(),
            MockEntry {
                full_name: full_name.into(),
                paid: false,
            },
        );
        self
    }

    /// Simulate a network outage: every call fails with a transport error
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Hold every reply until [`resume`](Self::resume) is called
    pub fn pause(&self) {
        self.inner.paused.send_replace(true);
    }

    /// Release held replies
    pub fn resume(&self) {
        self.inner.paused.send_replace(false);
    }

    /// Number of redeem requests received
    #[must_use]
    pub fn redeem_calls(&self) -> usize {
        self.inner.redeem_calls.load(Ordering::SeqCst)
    }

    /// Number of mark-paid requests received
    #[must_use]
    pub fn mark_paid_calls(&self) -> usize {
        self.inner.mark_paid_calls.load(Ordering::SeqCst)
    }

    /// Number of `GET /tickets/all` requests received
    #[must_use]
    pub fn roster_fetches(&self) -> usize {
        self.inner.roster_fetches.load(Ordering::SeqCst)
    }

    /// Whether a ticket is redeemed server-side
    #[must_use]
    pub fn is_redeemed(&self, id: &str) -> bool {
        self.records().tickets.get(id).is_some_and(|t| t.redeemed)
    }

    /// Whether a list entry is paid server-side
    #[must_use]
    pub fn is_paid(&self, id: &str) -> bool {
        self.records().entries.get(id).is_some_and(|e| e.paid)
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Records> {
        self.inner
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait out a pause, then fail if offline.
    async fn gate(inner: &Inner) -> Result<(), CheckinError> {
        let mut paused = inner.paused.subscribe();
        // The sender lives in `inner`, so this only errors on a dropped mock
        let _ = paused.wait_for(|paused| !paused).await;

        if inner.offline.load(Ordering::SeqCst) {
            return Err(CheckinError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

impl Default for MockCheckinApi {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckinApi for MockCheckinApi {
    fn redeem(&self, ticket_id: &TicketId) -> ApiFuture<RedeemReply> {
        let inner = Arc::clone(&self.inner);
        let id = ticket_id.to_string();
        inner.redeem_calls.fetch_add(1, Ordering::SeqCst);

        Box::pin(async move {
            Self::gate(&inner).await?;

            let mut records = inner.records.lock().unwrap_or_else(PoisonError::into_inner);
            let reply = match records.tickets.get_mut(&id) {
                None => RedeemReply {
                    success: false,
                    message: Some("not found".to_string()),
                    ..RedeemReply::default()
                },
                Some(ticket) if ticket.redeemed => RedeemReply {
                    success: false,
                    message: Some("already redeemed".to_string()),
                    ..RedeemReply::default()
                },
                Some(ticket) => {
                    ticket.redeemed = true;
                    RedeemReply {
                        success: true,
                        full_name: Some(ticket.full_name.clone()),
                        ticket_type: Some(ticket.ticket_type.clone()),
                        message: None,
                    }
                },
            };

            tracing::debug!(ticket_id = %id, success = reply.success, "Mock redeem handled");
            Ok::<_, CheckinError>(reply)
        })
    }

    fn mark_paid(&self, user_id: &TicketId) -> ApiFuture<PaidReply> {
        let inner = Arc::clone(&self.inner);
        let id = user_id.to_string();
        inner.mark_paid_calls.fetch_add(1, Ordering::SeqCst);

        Box::pin(async move {
            Self::gate(&inner).await?;

            let mut records = inner.records.lock().unwrap_or_else(PoisonError::into_inner);
            let reply = match records.entries.get_mut(&id) {
                None => PaidReply {
                    success: false,
                    message: Some("not found".to_string()),
                },
                Some(entry) if entry.paid => PaidReply {
                    success: false,
                    message: Some("already paid".to_string()),
                },
                Some(entry) => {
                    entry.paid = true;
                    PaidReply {
                        success: true,
                        message: None,
                    }
                },
            };

            tracing::debug!(user_id = %id, success = reply.success, "Mock mark-paid handled");
            Ok::<_, CheckinError>(reply)
        })
    }

    fn all_tickets(&self) -> ApiFuture<TicketsReply> {
        let inner = Arc::clone(&self.inner);
        inner.roster_fetches.fetch_add(1, Ordering::SeqCst);

        Box::pin(async move {
            Self::gate(&inner).await?;

            let records = inner.records.lock().unwrap_or_else(PoisonError::into_inner);
            let tickets = records
                .tickets
                .iter()
                .map(|(id, ticket)| {
                    (
                        id.clone(),
                        TicketDto {
                            id: Some(id.clone()),
                            full_name: ticket.full_name.clone(),
                            redeemed: ticket.redeemed,
                        },
                    )
                })
                .collect();

            Ok::<_, CheckinError>(TicketsReply {
                success: true,
                tickets,
            })
        })
    }

    fn all_list_entries(&self) -> ApiFuture<ListReply> {
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            Self::gate(&inner).await?;

            let records = inner.records.lock().unwrap_or_else(PoisonError::into_inner);
            let users = records
                .entries
                .iter()
                .map(|(id, entry)| {
                    (
                        id.clone(),
                        ListEntryDto {
                            id: Some(id.clone()),
                            full_name: entry.full_name.clone(),
                            paid: entry.paid,
                        },
                    )
                })
                .collect();

            Ok::<_, CheckinError>(ListReply {
                success: true,
                users,
            })
        })
    }
}
