//! Offline data source reading a snapshot directory.
//!
//! A snapshot holds `orders.json` (the raw orders list), `events.json`
//! (per-event records with `first_day`, `costs`, `num_orders`) and
//! `members.json` (event id → member list).  The query semantics of the
//! backend views are reproduced locally: year extraction from `first_day`,
//! case-insensitive name contains, a ten-suggestion autocomplete limit and
//! the `name (first_day)` suggestion text.

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use super::models::{EventStat, MemberRecord, OrderRecord, SnapshotEvent, StatsPayload, Suggestion};
use super::ApiError;
use crate::core::date;

const AUTOCOMPLETE_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fetch_orders(&self) -> Result<Vec<OrderRecord>, ApiError> {
        self.read_json("orders.json")
    }

    pub fn fetch_stats(&self, year: Option<i32>, search: &str) -> Result<StatsPayload, ApiError> {
        let events: Vec<SnapshotEvent> = self.read_json("events.json")?;
        let needle = search.trim().to_lowercase();

        let event_data: Vec<EventStat> = events
            .into_iter()
            .filter(|event| match year {
                Some(year) => event_year(event) == Some(year),
                None => true,
            })
            .filter(|event| needle.is_empty() || event.name.to_lowercase().contains(&needle))
            .map(|event| EventStat {
                name: event.name,
                num_orders: event.num_orders,
                costs: event.costs,
            })
            .collect();

        Ok(StatsPayload {
            total_members: self.total_members()?,
            event_data,
        })
    }

    pub fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        let events: Vec<SnapshotEvent> = self.read_json("events.json")?;
        let needle = query.trim().to_lowercase();

        Ok(events
            .into_iter()
            .filter(|event| event.name.to_lowercase().contains(&needle))
            .take(AUTOCOMPLETE_LIMIT)
            .map(|event| {
                let text = match event.first_day {
                    Some(ref day) if !day.is_empty() => format!("{} ({day})", event.name),
                    _ => event.name,
                };
                Suggestion { id: event.id, text }
            })
            .collect())
    }

    pub fn fetch_members(&self, event_id: i64) -> Result<Vec<MemberRecord>, ApiError> {
        let by_event: HashMap<String, Vec<MemberRecord>> = self.read_json("members.json")?;
        Ok(by_event
            .get(&event_id.to_string())
            .cloned()
            .unwrap_or_default())
    }

    pub fn invoice_url(&self, invoice_id: i64) -> String {
        self.dir
            .join("invoices")
            .join(format!("{invoice_id}.pdf"))
            .display()
            .to_string()
    }

    /// Members whose email also appears in the orders list, counted once —
    /// the same figure the live stats endpoint reports.
    fn total_members(&self) -> Result<u64, ApiError> {
        let orders: Vec<OrderRecord> = self.read_json("orders.json")?;
        let order_emails: HashSet<String> = orders
            .into_iter()
            .map(|o| o.email.to_lowercase())
            .collect();

        let by_event: HashMap<String, Vec<MemberRecord>> = self.read_json("members.json")?;
        let counted: HashSet<String> = by_event
            .values()
            .flatten()
            .map(|m| m.email.to_lowercase())
            .filter(|email| order_emails.contains(email))
            .collect();
        Ok(counted.len() as u64)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, ApiError> {
        let path = self.dir.join(name);
        let contents = std::fs::read_to_string(&path).map_err(|source| ApiError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ApiError::Decode {
            context: path.display().to_string(),
            source,
        })
    }
}

fn event_year(event: &SnapshotEvent) -> Option<i32> {
    event
        .first_day
        .as_deref()
        .and_then(date::parse_backend_date)
        .map(|d| d.year())
}
