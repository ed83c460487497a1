//! JSON bodies exchanged with the remote service.

use serde::{Deserialize, Serialize};

/// A JSON object decoded as `(key, value)` pairs in document order.
///
/// The listing endpoints return objects keyed by id; the roster follows the
/// server's key order, which a sorted or hashed map would lose.
pub type Keyed<T> = Vec<(String, T)>;

/// Body of `POST /tickets/redeem`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    /// Normalized ticket id
    pub ticket_id: String,
}

/// Reply of `POST /tickets/redeem`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemReply {
    /// Server outcome flag
    pub success: bool,
    /// Attendee name (on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Ticket type (on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    /// Rejection reason (on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /list/paid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidRequest {
    /// List entry id
    pub user_id: String,
}

/// Reply of `POST /list/paid`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidReply {
    /// Server outcome flag
    pub success: bool,
    /// Rejection reason or confirmation text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A ticket as listed by `GET /tickets/all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    /// Record id; the map key is used when absent
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    #[serde(default)]
    pub full_name: String,
    /// Redemption flag
    #[serde(default)]
    pub redeemed: bool,
}

/// Reply of `GET /tickets/all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketsReply {
    /// Server outcome flag
    pub success: bool,
    /// Tickets keyed by id, in server order
    #[serde(default, with = "keyed")]
    pub tickets: Keyed<TicketDto>,
}

/// A paid-list entry as listed by `GET /list/all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntryDto {
    /// Record id; the map key is used when absent
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    #[serde(default)]
    pub full_name: String,
    /// Payment flag
    #[serde(default)]
    pub paid: bool,
}

/// Reply of `GET /list/all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReply {
    /// Server outcome flag
    pub success: bool,
    /// Entries keyed by id, in server order
    #[serde(default, with = "keyed")]
    pub users: Keyed<ListEntryDto>,
}

/// (De)serialize a [`Keyed`] list as a JSON object, keeping entry order.
mod keyed {
    use super::Keyed;
    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn serialize<S, T>(entries: &Keyed<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        serializer.collect_map(entries.iter().map(|(key, value)| (key, value)))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Keyed<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        deserializer.deserialize_map(KeyedVisitor(PhantomData))
    }

    struct KeyedVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for KeyedVisitor<T> {
        type Value = Keyed<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object keyed by id")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, T>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redeem_request_uses_camel_case() {
        let body = serde_json::to_value(RedeemRequest {
            ticket_id: "abc123".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "ticketId": "abc123" }));
    }

    #[test]
    fn paid_request_uses_camel_case() {
        let body = serde_json::to_value(PaidRequest {
            user_id: "u1".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "userId": "u1" }));
    }

    #[test]
    fn redeem_reply_tolerates_missing_fields() {
        let reply: RedeemReply =
            serde_json::from_value(json!({ "success": false, "message": "not found" })).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message.as_deref(), Some("not found"));
        assert!(reply.full_name.is_none());
    }

    #[test]
    fn tickets_reply_reads_mongo_style_ids() {
        let reply: TicketsReply = serde_json::from_value(json!({
            "success": true,
            "tickets": {
                "t1": { "_id": "t1", "fullName": "Jane Doe", "redeemed": false, "__v": 0 }
            }
        }))
        .unwrap();

        let (key, ticket) = &reply.tickets[0];
        assert_eq!(key, "t1");
        assert_eq!(ticket.id.as_deref(), Some("t1"));
        assert_eq!(ticket.full_name, "Jane Doe");
        assert!(!ticket.redeemed);
    }

    #[test]
    fn listing_keeps_server_key_order() {
        let body = r#"{
            "success": true,
            "tickets": {
                "zeta": { "_id": "zeta", "fullName": "Zed", "redeemed": false },
                "alpha": { "_id": "alpha", "fullName": "Al", "redeemed": true },
                "mid": { "_id": "mid", "fullName": "Mia", "redeemed": false }
            }
        }"#;

        let reply: TicketsReply = serde_json::from_str(body).unwrap();
        let keys: Vec<_> = reply.tickets.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);

        let reencoded = serde_json::to_string(&reply).unwrap();
        assert!(reencoded.find("zeta").unwrap() < reencoded.find("alpha").unwrap());
    }

    #[test]
    fn missing_listing_defaults_to_empty() {
        let reply: ListReply = serde_json::from_str(r#"{ "success": false }"#).unwrap();
        assert!(reply.users.is_empty());
    }
}
