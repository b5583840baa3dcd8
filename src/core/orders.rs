//! Order rows and the ingested dataset.
//!
//! The orders endpoint returns raw records; [`OrderSet::ingest`] turns them
//! into display rows and derives each row's calendar date exactly once.
//! Filters read the derived date from the row — nothing re-parses per draw,
//! and nothing mutates rows after ingestion.  A reload replaces the whole
//! set under a new generation.

use chrono::NaiveDate;

use crate::api::models::OrderRecord;
use crate::core::date;

/// One display row of the orders table.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub lastname: String,
    pub email: String,
    /// Derived calendar date, `None` when the record carries no usable date.
    pub date: Option<NaiveDate>,
    /// Rendered date column (`DD.MM.YYYY`, empty for missing dates).
    pub date_text: String,
}

/// The loaded dataset — rows plus the generation they were fetched under.
#[derive(Debug, Default)]
pub struct OrderSet {
    orders: Vec<Order>,
    generation: u64,
}

impl OrderSet {
    /// Build a fresh set from wire records.  Dates are parsed here, once
    /// per row; rows sort by date descending (newest first), undated rows
    /// last, matching the backend's order listing.
    pub fn ingest(records: Vec<OrderRecord>, generation: u64) -> Self {
        let mut orders: Vec<Order> = records
            .into_iter()
            .map(|rec| {
                let date = rec.date_created.as_deref().and_then(date::parse_backend_date);
                let date_text = date.map(date::format_date_token).unwrap_or_default();
                Order {
                    id: rec.id,
                    lastname: rec.lastname,
                    email: rec.email,
                    date,
                    date_text,
                }
            })
            .collect();
        orders.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Self { orders, generation }
    }

    pub fn rows(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Distinct years present in the dataset, newest first.  Drives the
    /// stats year filter when the backend offers no year list of its own.
    pub fn years(&self) -> Vec<i32> {
        use chrono::Datelike;
        let mut years: Vec<i32> = self
            .orders
            .iter()
            .filter_map(|o| o.date.map(|d| d.year()))
            .collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, date: Option<&str>) -> OrderRecord {
        OrderRecord {
            id,
            date_created: date.map(String::from),
            lastname: format!("name-{id}"),
            email: format!("{id}@example.org"),
        }
    }

    #[test]
    fn ingest_derives_dates_once_and_renders_tokens() {
        let set = OrderSet::ingest(
            vec![
                record(1, Some("2024-08-12T09:31:04+02:00")),
                record(2, None),
                record(3, Some("not a date")),
            ],
            1,
        );
        let by_id = |id| set.rows().iter().find(|o| o.id == id).unwrap();
        assert_eq!(by_id(1).date_text, "12.08.2024");
        assert_eq!(by_id(2).date, None);
        assert_eq!(by_id(2).date_text, "");
        assert_eq!(by_id(3).date, None);
    }

    #[test]
    fn ingest_sorts_newest_first_with_undated_last() {
        let set = OrderSet::ingest(
            vec![
                record(1, Some("2024-01-01")),
                record(2, None),
                record(3, Some("2024-06-15")),
            ],
            1,
        );
        let ids: Vec<i64> = set.rows().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn years_are_distinct_and_newest_first() {
        let set = OrderSet::ingest(
            vec![
                record(1, Some("2023-05-01")),
                record(2, Some("2024-01-01")),
                record(3, Some("2023-11-30")),
                record(4, None),
            ],
            1,
        );
        assert_eq!(set.years(), vec![2024, 2023]);
    }

    #[test]
    fn reload_carries_the_new_generation() {
        let set = OrderSet::ingest(vec![record(1, None)], 7);
        assert_eq!(set.generation(), 7);
    }
}
