//! Stats pane — per-event horizontal bar chart with year and search filters.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};

use crate::api::models::StatsPayload;
use crate::core::stats::{chart_rows, max_value, Metric};

use super::input::InputState;
use super::theme::Theme;

pub struct StatsPane<'a> {
    pub payload: Option<&'a StatsPayload>,
    pub error: Option<&'a str>,
    pub metric: Metric,
    pub year_filter: Option<i32>,
    pub search: &'a InputState,
    pub editing: bool,
    pub full_prices: bool,
}

impl Widget for StatsPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.metric.chart_title()))
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // filter line
                Constraint::Min(3),    // chart
                Constraint::Length(1), // footer
            ])
            .split(inner);

        self.render_controls(chunks[0], buf);
        self.render_chart(chunks[1], buf);
        self.render_footer(chunks[2], buf);
    }
}

impl StatsPane<'_> {
    fn render_controls(&self, area: Rect, buf: &mut Buffer) {
        let year = match self.year_filter {
            Some(y) => y.to_string(),
            None => "all".into(),
        };
        let mut spans = vec![
            Span::styled(" Year: ", Theme::input_label_style()),
            Span::styled(year, Theme::input_style()),
            Span::styled("  Metric: ", Theme::input_label_style()),
            Span::styled(self.metric.label(), Theme::input_style()),
            Span::styled("  Search: ", Theme::input_label_style()),
            Span::styled(self.search.value().to_string(), Theme::input_style()),
        ];
        if self.editing {
            spans.push(Span::styled("█", Theme::input_style()));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }

    fn render_chart(&self, area: Rect, buf: &mut Buffer) {
        if let Some(error) = self.error {
            let message = Paragraph::new(Line::from(Span::styled(
                format!("Stats unavailable: {error}"),
                Theme::empty_style(),
            )));
            message.render(area, buf);
            return;
        }
        let Some(payload) = self.payload else {
            return; // still loading, spinner shows on the border
        };

        let rows = chart_rows(payload, self.metric, self.full_prices);
        if rows.is_empty() {
            let message = Paragraph::new(Line::from(Span::styled(
                "No events match the current filters.",
                Theme::empty_style(),
            )));
            message.render(area, buf);
            return;
        }

        let bars: Vec<Bar> = rows
            .iter()
            .map(|row| {
                Bar::default()
                    .label(Line::from(row.name.clone()))
                    .value(row.value)
                    .text_value(row.text.clone())
                    .style(Theme::bar_style())
                    .value_style(Theme::bar_value_style())
            })
            .collect();

        // One row per event, mirroring the old horizontal chart.
        BarChart::default()
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .max(max_value(&rows).max(1))
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let Some(payload) = self.payload else {
            return;
        };
        let prices = if self.full_prices { "full" } else { "member" };
        let line = Line::from(Span::styled(
            format!(
                " Total members with orders: {}   prices: {prices}",
                payload.total_members
            ),
            Theme::input_label_style(),
        ));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
