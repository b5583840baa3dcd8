//! The row-filter pipeline for the orders table.
//!
//! Each draw evaluates an explicit, ordered slice of filters over every
//! loaded row; a row is visible iff every filter keeps it.  Filters are
//! plain values owned by the app state and injected per evaluation — there
//! is no shared registration list, so two tables on one screen could never
//! interfere through ambient state.

use crate::core::date::{parse_date_token, DateInterval};
use crate::core::orders::{Order, OrderSet};

/// A predicate over one order row.  `true` keeps the row.
pub trait RowFilter {
    fn keeps(&self, row: &Order) -> bool;
}

// ───────────────────────────────────────── date range ────────

/// Keeps rows whose date falls inside the current inclusive interval.
///
/// The bounds are fed from the `From`/`To` inputs; a blank or unparseable
/// token leaves that side unbounded so filtering keeps working mid-edit.
/// Rows without a usable date stay visible — showing a row too many beats
/// silently losing one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeFilter {
    interval: DateInterval,
}

impl DateRangeFilter {
    /// Update the lower bound from the raw input text.
    pub fn set_start(&mut self, token: &str) {
        self.interval.start = parse_date_token(token).ok();
    }

    /// Update the upper bound from the raw input text.
    pub fn set_end(&mut self, token: &str) {
        self.interval.end = parse_date_token(token).ok();
    }

    pub fn clear(&mut self) {
        self.interval = DateInterval::default();
    }

    pub fn interval(&self) -> DateInterval {
        self.interval
    }
}

impl RowFilter for DateRangeFilter {
    fn keeps(&self, row: &Order) -> bool {
        match row.date {
            Some(date) => self.interval.contains(date),
            None => true,
        }
    }
}

// ───────────────────────────────────────── text search ───────

/// Case-insensitive substring search over the rendered columns.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub fn set_query(&mut self, query: &str) {
        self.needle = query.trim().to_lowercase();
    }
}

impl RowFilter for SearchFilter {
    fn keeps(&self, row: &Order) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        row.id.to_string().contains(&self.needle)
            || row.date_text.to_lowercase().contains(&self.needle)
            || row.lastname.to_lowercase().contains(&self.needle)
            || row.email.to_lowercase().contains(&self.needle)
    }
}

// ───────────────────────────────────────── evaluation ────────

/// Evaluate the pipeline over the whole set, returning indices of visible
/// rows in dataset order.  Pure over its inputs, so repeated evaluation
/// with unchanged filters and rows yields the identical index list.
pub fn visible_rows(set: &OrderSet, filters: &[&dyn RowFilter]) -> Vec<usize> {
    set.rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| filters.iter().all(|f| f.keeps(row)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::OrderRecord;

    fn set_with_dates(dates: &[Option<&str>]) -> OrderSet {
        let records = dates
            .iter()
            .enumerate()
            .map(|(i, date)| OrderRecord {
                id: i as i64 + 1,
                date_created: date.map(String::from),
                lastname: format!("Name{}", i + 1),
                email: format!("user{}@example.org", i + 1),
            })
            .collect();
        OrderSet::ingest(records, 1)
    }

    fn visible_dates(set: &OrderSet, filters: &[&dyn RowFilter]) -> Vec<String> {
        visible_rows(set, filters)
            .into_iter()
            .map(|i| set.rows()[i].date_text.clone())
            .collect()
    }

    #[test]
    fn no_bounds_keeps_every_row() {
        let set = set_with_dates(&[Some("2024-01-01"), Some("2024-06-15"), None]);
        let filter = DateRangeFilter::default();
        assert_eq!(visible_rows(&set, &[&filter]).len(), 3);
    }

    #[test]
    fn interval_keeps_only_rows_inside() {
        // 01.01.2024 / 15.06.2024 / 31.12.2024, range 01.06.–01.07.2024.
        let set = set_with_dates(&[Some("2024-01-01"), Some("2024-06-15"), Some("2024-12-31")]);
        let mut filter = DateRangeFilter::default();
        filter.set_start("01.06.2024");
        filter.set_end("01.07.2024");
        assert_eq!(visible_dates(&set, &[&filter]), vec!["15.06.2024"]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let set = set_with_dates(&[Some("2024-06-15")]);
        let mut filter = DateRangeFilter::default();
        filter.set_start("15.06.2024");
        filter.set_end("15.06.2024");
        assert_eq!(visible_rows(&set, &[&filter]).len(), 1);
    }

    #[test]
    fn end_only_interval_cuts_later_rows() {
        let set = set_with_dates(&[Some("2023-12-31"), Some("2024-01-01"), Some("2024-01-02")]);
        let mut filter = DateRangeFilter::default();
        filter.set_end("01.01.2024");
        let mut kept = visible_dates(&set, &[&filter]);
        kept.sort();
        assert_eq!(kept, vec!["01.01.2024", "31.12.2023"]);
    }

    #[test]
    fn malformed_bound_token_leaves_side_unbounded() {
        let set = set_with_dates(&[Some("2020-01-01"), Some("2024-06-15")]);
        let mut filter = DateRangeFilter::default();
        filter.set_start("2024.13"); // two components — not a date token
        assert_eq!(filter.interval().start, None);
        assert_eq!(visible_rows(&set, &[&filter]).len(), 2);
    }

    #[test]
    fn undated_rows_survive_active_bounds() {
        let set = set_with_dates(&[None, Some("2010-01-01")]);
        let mut filter = DateRangeFilter::default();
        filter.set_start("01.01.2024");
        let kept = visible_rows(&set, &[&filter]);
        assert_eq!(kept.len(), 1);
        assert_eq!(set.rows()[kept[0]].date, None);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let set = set_with_dates(&[Some("2024-01-01"), Some("2024-06-15"), None]);
        let mut filter = DateRangeFilter::default();
        filter.set_start("01.01.2024");
        let first = visible_rows(&set, &[&filter]);
        let second = visible_rows(&set, &[&filter]);
        assert_eq!(first, second);
    }

    #[test]
    fn search_matches_any_column_case_insensitively() {
        let set = set_with_dates(&[Some("2024-01-01"), Some("2024-06-15")]);
        let mut search = SearchFilter::default();

        search.set_query("NAME1");
        assert_eq!(visible_rows(&set, &[&search]).len(), 1);

        search.set_query("15.06");
        let kept = visible_dates(&set, &[&search]);
        assert_eq!(kept, vec!["15.06.2024"]);

        search.set_query("example.org");
        assert_eq!(visible_rows(&set, &[&search]).len(), 2);
    }

    #[test]
    fn pipeline_intersects_filters_in_order() {
        let set = set_with_dates(&[Some("2024-01-01"), Some("2024-06-15"), Some("2024-06-20")]);
        let mut range = DateRangeFilter::default();
        range.set_start("01.06.2024");
        let mut search = SearchFilter::default();
        search.set_query("15.06");
        let filters: [&dyn RowFilter; 2] = [&range, &search];
        assert_eq!(visible_dates(&set, &filters), vec!["15.06.2024"]);
    }
}
