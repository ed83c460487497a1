//! Fetches tickets (and optionally list entries) into one unified roster.

use crate::api::{CheckinApi, ListReply, TicketsReply};
use crate::error::CheckinResult;
use crate::types::{TicketId, TicketRecord};
use std::collections::HashSet;
use std::sync::Arc;

/// Client for the listing endpoints
#[derive(Clone)]
pub struct RosterClient {
    api: Arc<dyn CheckinApi>,
    include_list_entries: bool,
}

impl RosterClient {
    /// Create a client; `include_list_entries` enables `GET /list/all`
    #[must_use]
    pub fn new(api: Arc<dyn CheckinApi>, include_list_entries: bool) -> Self {
        Self {
            api,
            include_list_entries,
        }
    }

    /// Whether list entries are merged into the roster
    #[must_use]
    pub const fn includes_list_entries(&self) -> bool {
        self.include_list_entries
    }

    /// Fetch the unified roster, failing soft.
    ///
    /// Any transport failure, or a reply with `success: false`, yields an
    /// empty roster. The roster is advisory; redemption never depends on it.
    pub async fn fetch_roster(&self) -> Vec<TicketRecord> {
        match self.fetch_roster_checked().await {
            Ok(Some(records)) => records,
            Ok(None) => {
                tracing::warn!("Roster fetch answered success=false, showing empty roster");
                Vec::new()
            },
            Err(error) => {
                tracing::error!(error = %error, "Roster fetch failed, showing empty roster");
                Vec::new()
            },
        }
    }

    /// Fetch the unified roster, surfacing failures.
    ///
    /// Returns `Ok(None)` when either endpoint reported `success: false`.
    ///
    /// # Errors
    ///
    /// Returns the first transport or decode error from either endpoint.
    pub async fn fetch_roster_checked(&self) -> CheckinResult<Option<Vec<TicketRecord>>> {
        if !self.include_list_entries {
            let tickets = self.api.all_tickets().await?;
            return Ok(tickets.success.then(|| unify(tickets, None)));
        }

        let (tickets, entries) = futures::join!(self.api.all_tickets(), self.api.all_list_entries());
        let (tickets, entries) = (tickets?, entries?);

        Ok((tickets.success && entries.success).then(|| unify(tickets, Some(entries))))
    }
}

impl std::fmt::Debug for RosterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterClient")
            .field("include_list_entries", &self.include_list_entries)
            .finish_non_exhaustive()
    }
}

/// Tag and merge both listings, tickets first, each in the order the
/// server listed its keys.
///
/// An id seen twice is dropped after its first occurrence.
fn unify(tickets: TicketsReply, entries: Option<ListReply>) -> Vec<TicketRecord> {
    let ticket_records = tickets.tickets.into_iter().map(|(key, dto)| {
        TicketRecord::ticket(dto.id.unwrap_or(key), dto.full_name, dto.redeemed)
    });
    let entry_records = entries.into_iter().flat_map(|reply| {
        reply.users.into_iter().map(|(key, dto)| {
            TicketRecord::list_entry(dto.id.unwrap_or(key), dto.full_name, dto.paid)
        })
    });

    let mut seen: HashSet<TicketId> = HashSet::new();
    ticket_records
        .chain(entry_records)
        .filter(|record| {
            let fresh = seen.insert(record.id.clone());
            if !fresh {
                tracing::warn!(id = %record.id, kind = %record.kind, "Duplicate roster id dropped");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::wire::{ListEntryDto, TicketDto};
    use crate::api::MockCheckinApi;
    use crate::types::RecordKind;

    #[tokio::test]
    async fn tickets_only_by_default() {
        let api = MockCheckinApi::new()
            .with_ticket("t1", "Ann Abel", "GA")
            .with_list_entry("u1", "Bo Berg");
        let client = RosterClient::new(Arc::new(api), false);

        let roster = client.fetch_roster().await;
        assert_eq!(roster, vec![TicketRecord::ticket("t1", "Ann Abel", false)]);
    }

    #[tokio::test]
    async fn list_variant_merges_both_kinds() {
        let api = MockCheckinApi::new()
            .with_ticket("t1", "Ann Abel", "GA")
            .with_list_entry("u1", "Bo Berg");
        let client = RosterClient::new(Arc::new(api), true);

        let roster = client.fetch_roster().await;
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].kind, RecordKind::Ticket);
        assert_eq!(roster[1].kind, RecordKind::ListEntry);
        assert_eq!(roster[1].status_label(), "NOT PAID ❌");
    }

    #[tokio::test]
    async fn transport_failure_yields_empty_roster() {
        let api = MockCheckinApi::new().with_ticket("t1", "Ann Abel", "GA");
        api.set_offline(true);
        let client = RosterClient::new(Arc::new(api), true);

        assert!(client.fetch_roster().await.is_empty());
        assert!(client.fetch_roster_checked().await.is_err());
    }

    #[test]
    fn missing_id_falls_back_to_key() {
        let mut tickets = TicketsReply {
            success: true,
            ..TicketsReply::default()
        };
        tickets.tickets.push((
            "k1".to_string(),
            TicketDto {
                id: None,
                full_name: "Ann".to_string(),
                redeemed: true,
            },
        ));

        let roster = unify(tickets, None);
        assert_eq!(roster, vec![TicketRecord::ticket("k1", "Ann", true)]);
    }

    #[test]
    fn cross_kind_collision_keeps_the_ticket() {
        let mut tickets = TicketsReply {
            success: true,
            ..TicketsReply::default()
        };
        tickets.tickets.push((
            "same".to_string(),
            TicketDto {
                id: Some("same".to_string()),
                full_name: "Ann".to_string(),
                redeemed: false,
            },
        ));
        let mut entries = ListReply {
            success: true,
            ..ListReply::default()
        };
        entries.users.push((
            "same".to_string(),
            ListEntryDto {
                id: Some("same".to_string()),
                full_name: "Bo".to_string(),
                paid: false,
            },
        ));

        let roster = unify(tickets, Some(entries));
        assert_eq!(roster, vec![TicketRecord::ticket("same", "Ann", false)]);
    }

    #[test]
    fn unify_keeps_server_order() {
        let tickets: TicketsReply = serde_json::from_str(
            r#"{ "success": true, "tickets": {
                "zeta": { "_id": "zeta", "fullName": "Zed", "redeemed": false },
                "alpha": { "_id": "alpha", "fullName": "Al", "redeemed": false }
            } }"#,
        )
        .unwrap();
        let entries: ListReply = serde_json::from_str(
            r#"{ "success": true, "users": {
                "u9": { "_id": "u9", "fullName": "Nia", "paid": false },
                "u1": { "_id": "u1", "fullName": "Bo", "paid": true }
            } }"#,
        )
        .unwrap();

        let ids: Vec<_> = unify(tickets, Some(entries))
            .into_iter()
            .map(|record| record.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["zeta", "alpha", "u9", "u1"]);
    }
}
