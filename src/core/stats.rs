//! Shapes the stats payload into bar-chart rows.

use crate::api::models::StatsPayload;
use crate::core::pricing::Money;

/// Which figure the chart plots per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Orders,
    Costs,
}

impl Metric {
    pub fn toggled(self) -> Self {
        match self {
            Metric::Orders => Metric::Costs,
            Metric::Costs => Metric::Orders,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Orders => "Orders",
            Metric::Costs => "Costs",
        }
    }

    /// Chart heading, mirroring the old dashboard's per-metric titles.
    pub fn chart_title(self) -> &'static str {
        match self {
            Metric::Orders => "Orders per event",
            Metric::Costs => "Costs per event",
        }
    }
}

/// One bar of the chart: event name, bar magnitude and the printed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    pub name: String,
    pub value: u64,
    pub text: String,
}

/// Build chart rows from the payload for the chosen metric.
///
/// For the costs metric, `full_prices` switches every amount to the
/// non-member price.  Events without a cost figure plot as zero.
pub fn chart_rows(payload: &StatsPayload, metric: Metric, full_prices: bool) -> Vec<ChartRow> {
    payload
        .event_data
        .iter()
        .map(|event| match metric {
            Metric::Orders => ChartRow {
                name: event.name.clone(),
                value: event.num_orders,
                text: event.num_orders.to_string(),
            },
            Metric::Costs => {
                let amount = event.costs.unwrap_or_default();
                let amount = if full_prices { amount.non_member() } else { amount };
                ChartRow {
                    name: event.name.clone(),
                    value: amount.euros().max(0) as u64,
                    text: amount.to_string(),
                }
            }
        })
        .collect()
}

/// Largest bar value, used to scale the chart.
pub fn max_value(rows: &[ChartRow]) -> u64 {
    rows.iter().map(|r| r.value).max().unwrap_or(0)
}
