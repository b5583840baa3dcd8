//! Month-grid date picker popup for the range inputs.
//!
//! Arrow keys move by day and week, PgUp/PgDn by month; Enter writes the
//! selection into the targeted range input through the same update path a
//! typed token takes.

use chrono::{Datelike, Months, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::state::RangeBound;
use crate::core::date;

// ───────────────────────────────────────── state ─────────────

/// Picker state — which bound it writes to and the highlighted day.
#[derive(Debug)]
pub struct DatePickerState {
    pub target: RangeBound,
    pub cursor: NaiveDate,
}

impl Default for DatePickerState {
    fn default() -> Self {
        // Overwritten on open; MIN just keeps the field total.
        Self {
            target: RangeBound::From,
            cursor: NaiveDate::MIN,
        }
    }
}

impl DatePickerState {
    /// Position the picker on `initial` for the given bound.
    pub fn open(&mut self, target: RangeBound, initial: NaiveDate) {
        self.target = target;
        self.cursor = initial;
    }

    pub fn prev_day(&mut self) {
        if let Some(d) = self.cursor.pred_opt() {
            self.cursor = d;
        }
    }

    pub fn next_day(&mut self) {
        if let Some(d) = self.cursor.succ_opt() {
            self.cursor = d;
        }
    }

    pub fn prev_week(&mut self) {
        if let Some(d) = self.cursor.checked_sub_days(chrono::Days::new(7)) {
            self.cursor = d;
        }
    }

    pub fn next_week(&mut self) {
        if let Some(d) = self.cursor.checked_add_days(chrono::Days::new(7)) {
            self.cursor = d;
        }
    }

    /// Month jumps keep the day where possible, clamping 31 → 30/28.
    pub fn prev_month(&mut self) {
        if let Some(d) = self.cursor.checked_sub_months(Months::new(1)) {
            self.cursor = d;
        }
    }

    pub fn next_month(&mut self) {
        if let Some(d) = self.cursor.checked_add_months(Months::new(1)) {
            self.cursor = d;
        }
    }

    /// The selected token in input form (`DD.MM.YYYY`).
    pub fn token(&self) -> String {
        date::format_date_token(self.cursor)
    }
}

// ───────────────────────────────────────── widget ────────────

/// The picker popup overlay.
pub struct DatePickerPopup<'a> {
    pub state: &'a DatePickerState,
}

impl Widget for DatePickerPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(26, 12, area);
        Clear.render(popup, buf);

        let bound_label = match self.state.target {
            RangeBound::From => "From",
            RangeBound::To => "To",
        };
        let block = Block::default()
            .title(format!(" Pick {bound_label} date "))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let cursor = self.state.cursor;
        let mut lines = Vec::new();
        lines.push(Line::from(Span::styled(
            format!("{:^24}", cursor.format("%B %Y")),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            " Mo Tu We Th Fr Sa Su",
            Style::default().fg(Color::DarkGray),
        )));

        for week in month_grid(cursor.year(), cursor.month()) {
            let mut spans = vec![Span::raw(" ")];
            for day in week {
                match day {
                    Some(d) => {
                        let style = if d == cursor.day() {
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Cyan)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::White)
                        };
                        spans.push(Span::styled(format!("{d:>2}"), style));
                    }
                    None => spans.push(Span::raw("  ")),
                }
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(Span::styled(
            " Enter: set  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Weeks of the month as Monday-first rows; `None` pads the edges.
fn month_grid(year: i32, month: u32) -> Vec<[Option<u32>; 7]> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return Vec::new(),
    };
    let days = days_in_month(year, month);
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = lead;
    for day in 1..=days {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next.and_then(|d| d.pred_opt()) {
        Some(last) => last.day(),
        None => 30,
    }
}

fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn navigation_moves_by_day_week_and_month() {
        let mut state = DatePickerState::default();
        state.open(RangeBound::From, d(2024, 6, 15));

        state.next_day();
        assert_eq!(state.cursor, d(2024, 6, 16));
        state.prev_week();
        assert_eq!(state.cursor, d(2024, 6, 9));
        state.next_month();
        assert_eq!(state.cursor, d(2024, 7, 9));
    }

    #[test]
    fn month_jump_clamps_short_months() {
        let mut state = DatePickerState::default();
        state.open(RangeBound::To, d(2024, 3, 31));
        state.prev_month();
        // February 2024 has 29 days.
        assert_eq!(state.cursor, d(2024, 2, 29));
    }

    #[test]
    fn token_matches_the_input_format() {
        let mut state = DatePickerState::default();
        state.open(RangeBound::From, d(2024, 1, 5));
        assert_eq!(state.token(), "05.01.2024");
    }

    #[test]
    fn month_grid_starts_on_monday() {
        // June 2024 starts on a Saturday.
        let weeks = month_grid(2024, 6);
        assert_eq!(weeks[0], [None, None, None, None, None, Some(1), Some(2)]);
        assert_eq!(days_in_month(2024, 6), 30);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn weekday_helper_matches_chrono() {
        assert_eq!(d(2024, 6, 1).weekday(), chrono::Weekday::Sat);
    }
}
