//! The orders filter bar — `From` / `To` date inputs and the text search.
//!
//! Every keystroke in either date input re-parses the token and updates the
//! corresponding interval bound, so the table refilters live while typing.
//! A non-empty token that does not parse renders red; the bound it feeds is
//! simply open in the meantime.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::app::state::OrdersFocus;
use crate::core::date::parse_date_token;

use super::input::InputState;
use super::theme::Theme;

pub struct FilterBar<'a> {
    pub from: &'a InputState,
    pub to: &'a InputState,
    pub search: &'a InputState,
    pub focus: OrdersFocus,
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Min(12),
            ])
            .split(area);

        render_input(
            buf,
            chunks[0],
            "From",
            self.from,
            self.focus == OrdersFocus::From,
            date_input_style(self.from),
        );
        render_input(
            buf,
            chunks[1],
            "To",
            self.to,
            self.focus == OrdersFocus::To,
            date_input_style(self.to),
        );
        render_input(
            buf,
            chunks[2],
            "Search",
            self.search,
            self.focus == OrdersFocus::Search,
            Theme::input_style(),
        );
    }
}

/// Red for tokens that are present but not (yet) a date.
fn date_input_style(input: &InputState) -> Style {
    if input.is_empty() || parse_date_token(input.value()).is_ok() {
        Theme::input_style()
    } else {
        Theme::input_invalid_style()
    }
}

fn render_input(
    buf: &mut Buffer,
    area: Rect,
    label: &str,
    input: &InputState,
    focused: bool,
    value_style: Style,
) {
    let border = if focused {
        Theme::focused_border_style()
    } else {
        Theme::border_style()
    };
    let block = Block::default()
        .title(format!(" {label} "))
        .title_style(Theme::input_label_style())
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 {
        return;
    }

    let mut spans = vec![Span::styled(input.value().to_string(), value_style)];
    if focused {
        // Block cursor; these fields are short enough to skip horizontal
        // scrolling.
        spans.push(Span::styled("█", Theme::input_style()));
    }
    buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);
}
