//! Wire models for the dashboard endpoints.
//!
//! Shapes follow what the backend actually emits, which is looser than one
//! would like: `date_created` may be null, `costs` arrives as a number, a
//! string (Django serialises `Decimal` that way) or null.

use serde::{de, Deserialize, Deserializer};

use crate::core::pricing::Money;

/// One row from the orders endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
}

/// Payload of the stats endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsPayload {
    #[serde(default)]
    pub total_members: u64,
    #[serde(default)]
    pub event_data: Vec<EventStat>,
}

/// Per-event aggregate inside [`StatsPayload`].
#[derive(Debug, Clone, Deserialize)]
pub struct EventStat {
    pub name: String,
    #[serde(default)]
    pub num_orders: u64,
    #[serde(default, deserialize_with = "de_costs")]
    pub costs: Option<Money>,
}

/// One entry from the members endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub invoice_id: Option<i64>,
}

/// One typeahead suggestion (`{id, text}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub text: String,
}

/// One event record in a snapshot directory's `events.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotEvent {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub first_day: Option<String>,
    #[serde(default, deserialize_with = "de_costs")]
    pub costs: Option<Money>,
    #[serde(default)]
    pub num_orders: u64,
}

/// Accept `costs` as a JSON number, a decimal string or null.
fn de_costs<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
        None,
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(Some(Money::from_euros_f64(n))),
        Raw::Str(s) if s.trim().is_empty() => Ok(None),
        Raw::Str(s) => Money::parse(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid money amount {s:?}"))),
        Raw::None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_costs_accept_number_string_and_null() {
        let raw = r#"{
            "total_members": 42,
            "event_data": [
                {"name": "A", "num_orders": 3, "costs": 120.5},
                {"name": "B", "num_orders": 0, "costs": "80.00"},
                {"name": "C", "num_orders": 1, "costs": null},
                {"name": "D", "num_orders": 1}
            ]
        }"#;
        let stats: StatsPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.total_members, 42);
        assert_eq!(stats.event_data[0].costs, Some(Money(12_050)));
        assert_eq!(stats.event_data[1].costs, Some(Money(8_000)));
        assert_eq!(stats.event_data[2].costs, None);
        assert_eq!(stats.event_data[3].costs, None);
    }

    #[test]
    fn order_records_tolerate_null_dates() {
        let raw = r#"[
            {"id": 1, "date_created": "2024-08-12T09:31:04+02:00",
             "lastname": "Muster", "email": "m@example.org"},
            {"id": 2, "date_created": null, "lastname": "Leer", "email": ""}
        ]"#;
        let orders: Vec<OrderRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[1].date_created.is_none());
    }

    #[test]
    fn member_invoice_id_may_be_null() {
        let raw = r#"{"name": "X", "email": "x@y", "event": "E", "invoice_id": null}"#;
        let member: MemberRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(member.invoice_id, None);
    }
}
