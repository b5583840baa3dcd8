//! Background data fetches.
//!
//! Every fetch runs on a spawned tokio task and reports back over the shared
//! update channel, tagged with the generation it was started under.  The
//! receiving side drops anything whose generation no longer matches — a
//! newer request supersedes an in-flight one instead of cancelling it.

use tokio::sync::mpsc;

use crate::api::models::{MemberRecord, OrderRecord, StatsPayload, Suggestion};
use crate::api::{ApiError, DataSource};
use crate::core::orders::OrderSet;

use super::state::{AppState, MembersFocus};

pub enum DataUpdate {
    Orders {
        generation: u64,
        result: Result<Vec<OrderRecord>, ApiError>,
    },
    Stats {
        generation: u64,
        result: Result<StatsPayload, ApiError>,
    },
    Suggestions {
        generation: u64,
        result: Result<Vec<Suggestion>, ApiError>,
    },
    Members {
        generation: u64,
        result: Result<Vec<MemberRecord>, ApiError>,
    },
}

pub fn spawn_orders_fetch(
    tx: mpsc::UnboundedSender<DataUpdate>,
    source: DataSource,
    generation: u64,
) {
    tokio::spawn(async move {
        let result = source.fetch_orders().await;
        let _ = tx.send(DataUpdate::Orders { generation, result });
    });
}

pub fn spawn_stats_fetch(
    tx: mpsc::UnboundedSender<DataUpdate>,
    source: DataSource,
    generation: u64,
    year: Option<i32>,
    search: String,
) {
    tokio::spawn(async move {
        let result = source.fetch_stats(year, &search).await;
        let _ = tx.send(DataUpdate::Stats { generation, result });
    });
}

pub fn spawn_suggestion_fetch(
    tx: mpsc::UnboundedSender<DataUpdate>,
    source: DataSource,
    generation: u64,
    query: String,
) {
    tokio::spawn(async move {
        let result = source.fetch_suggestions(&query).await;
        let _ = tx.send(DataUpdate::Suggestions { generation, result });
    });
}

pub fn spawn_member_fetch(
    tx: mpsc::UnboundedSender<DataUpdate>,
    source: DataSource,
    generation: u64,
    event_id: i64,
) {
    tokio::spawn(async move {
        let result = source.fetch_members(event_id).await;
        let _ = tx.send(DataUpdate::Members { generation, result });
    });
}

/// Fold one update into the state.  Stale generations are ignored; fetch
/// errors are logged and surfaced as pane/status messages, never fatal —
/// the dashboard keeps operating on its last good data.
pub fn apply_update(state: &mut AppState, update: DataUpdate) {
    match update {
        DataUpdate::Orders { generation, result } => {
            if generation != state.orders_generation {
                return;
            }
            state.orders_loading = false;
            match result {
                Ok(records) => {
                    let count = records.len();
                    state.orders = OrderSet::ingest(records, generation);
                    state.table_state.reset();
                    tracing::debug!(count, generation, "orders loaded");
                }
                Err(err) => {
                    tracing::warn!(%err, "orders fetch failed");
                    state.status_message = Some(format!("Orders: {err}"));
                }
            }
        }
        DataUpdate::Stats { generation, result } => {
            if generation != state.stats_generation {
                return;
            }
            state.stats_loading = false;
            match result {
                Ok(payload) => {
                    state.stats_error = None;
                    state.stats = Some(payload);
                }
                Err(err) => {
                    tracing::warn!(%err, "stats fetch failed");
                    state.stats_error = Some(err.to_string());
                }
            }
        }
        DataUpdate::Suggestions { generation, result } => {
            if generation != state.suggestions_generation {
                return;
            }
            state.suggestions_loading = false;
            match result {
                Ok(results) => {
                    state.suggestions = results;
                    state.suggestion_selected = 0;
                }
                Err(err) => {
                    tracing::warn!(%err, "autocomplete fetch failed");
                    state.status_message = Some(format!("Autocomplete: {err}"));
                }
            }
        }
        DataUpdate::Members { generation, result } => {
            if generation != state.members_generation {
                return;
            }
            state.members_loading = false;
            match result {
                Ok(members) => {
                    state.members_error = None;
                    state.members = members;
                    state.member_selected = 0;
                    if !state.members.is_empty() {
                        state.members_focus = MembersFocus::List;
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "members fetch failed");
                    state.members_error = Some(err.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::OrderRecord;
    use crate::config::AppConfig;

    fn test_state() -> AppState {
        AppState::new(
            DataSource::from_arg("./snapshot").unwrap(),
            AppConfig {
                bindings: AppConfig::default_bindings(),
                server: crate::config::DEFAULT_SERVER.into(),
                full_prices: false,
                double_click_ms: 250,
            },
        )
    }

    fn orders_update(generation: u64, ids: &[i64]) -> DataUpdate {
        DataUpdate::Orders {
            generation,
            result: Ok(ids
                .iter()
                .map(|&id| OrderRecord {
                    id,
                    date_created: None,
                    lastname: String::new(),
                    email: String::new(),
                })
                .collect()),
        }
    }

    #[test]
    fn stale_generations_are_dropped() {
        let mut state = test_state();
        state.orders_generation = 2;
        state.orders_loading = true;

        apply_update(&mut state, orders_update(1, &[1, 2, 3]));
        assert!(state.orders.is_empty());
        assert!(state.orders_loading);

        apply_update(&mut state, orders_update(2, &[4]));
        assert_eq!(state.orders.len(), 1);
        assert!(!state.orders_loading);
    }

    #[test]
    fn fetch_errors_become_messages_not_panics() {
        let mut state = test_state();
        state.stats_generation = 1;
        apply_update(
            &mut state,
            DataUpdate::Stats {
                generation: 1,
                result: Err(ApiError::BadUrl("nope".into())),
            },
        );
        assert!(state.stats.is_none());
        assert!(state.stats_error.as_deref().unwrap().contains("nope"));
    }

    #[test]
    fn loaded_members_move_focus_to_the_list() {
        let mut state = test_state();
        state.members_generation = 1;
        apply_update(
            &mut state,
            DataUpdate::Members {
                generation: 1,
                result: Ok(vec![MemberRecord {
                    name: "A".into(),
                    email: "a@x".into(),
                    event: "E".into(),
                    invoice_id: None,
                }]),
            },
        );
        assert_eq!(state.members_focus, MembersFocus::List);
        assert_eq!(state.members.len(), 1);
    }
}
