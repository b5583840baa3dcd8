//! The orders table — a custom stateful widget over the filtered row set.
//!
//! The widget is created fresh each frame from the dataset and the list of
//! visible row indices; selection and scroll live in [`OrderTableState`].

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::orders::OrderSet;

use super::theme::Theme;

const ID_WIDTH: usize = 6;
const DATE_WIDTH: usize = 12;
const NAME_WIDTH: usize = 22;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the table (selected index, scroll offset).
///
/// `selected` indexes into the *visible* row list, so it is reset whenever
/// the dataset is replaced and clamped when filters shrink the list.
#[derive(Debug, Default)]
pub struct OrderTableState {
    pub selected: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
}

impl OrderTableState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.selected < max - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Keep the selection inside a shrunken row list.
    pub fn clamp_to(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Ensure the selected row is visible within the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The table widget itself — created fresh each frame.
pub struct OrderTable<'a> {
    set: &'a OrderSet,
    /// Indices of rows that passed the filter pipeline, in display order.
    visible: &'a [usize],
    block: Option<Block<'a>>,
    focused: bool,
}

impl<'a> OrderTable<'a> {
    pub fn new(set: &'a OrderSet, visible: &'a [usize]) -> Self {
        Self {
            set,
            visible,
            block: None,
            focused: false,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Table title in the `shown of total` spirit of the old grid:
    /// `" Orders — 12 of 87 (filtered) "`.
    pub fn title(set: &OrderSet, visible_len: usize) -> String {
        if visible_len == set.len() {
            format!(" Orders — {} ", set.len())
        } else {
            format!(" Orders — {} of {} (filtered) ", visible_len, set.len())
        }
    }
}

impl<'a> StatefulWidget for OrderTable<'a> {
    type State = OrderTableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.height < 2 || inner.width == 0 {
            return;
        }

        // Header row.
        let header = format!(
            "{:>id$}  {:<date$}{:<name$}{}",
            "#",
            "Date",
            "Last name",
            "Email",
            id = ID_WIDTH,
            date = DATE_WIDTH,
            name = NAME_WIDTH,
        );
        buf.set_line(
            inner.x,
            inner.y,
            &Line::from(Span::styled(header, Theme::header_style())),
            inner.width,
        );

        let body = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };

        state.clamp_to(self.visible.len());
        state.clamp_scroll(body.height as usize);

        if self.visible.is_empty() {
            let message = if self.set.is_empty() {
                "No orders loaded."
            } else {
                "No rows match the current filters."
            };
            buf.set_line(
                body.x,
                body.y,
                &Line::from(Span::styled(message, Theme::empty_style())),
                body.width,
            );
            return;
        }

        let rows = self
            .visible
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(body.height as usize);

        for (i, (pos, &row_index)) in rows.enumerate() {
            let order = &self.set.rows()[row_index];
            let is_selected = pos == state.selected;
            let style = if is_selected && self.focused {
                Theme::selected_style()
            } else if is_selected {
                Theme::selected_unfocused_style()
            } else {
                Theme::row_style()
            };

            let text = format!(
                "{:>id$}  {:<date$}{:<name$}{}",
                order.id,
                order.date_text,
                truncate(&order.lastname, NAME_WIDTH - 2),
                order.email,
                id = ID_WIDTH,
                date = DATE_WIDTH,
                name = NAME_WIDTH,
            );
            let line = Line::from(Span::styled(text, style));
            buf.set_line(body.x, body.y + i as u16, &line, body.width);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::OrderRecord;

    fn set(n: usize) -> OrderSet {
        OrderSet::ingest(
            (0..n)
                .map(|i| OrderRecord {
                    id: i as i64,
                    date_created: None,
                    lastname: String::new(),
                    email: String::new(),
                })
                .collect(),
            1,
        )
    }

    #[test]
    fn title_reports_filtering() {
        let orders = set(5);
        assert_eq!(OrderTable::title(&orders, 5), " Orders — 5 ");
        assert_eq!(OrderTable::title(&orders, 2), " Orders — 2 of 5 (filtered) ");
    }

    #[test]
    fn selection_clamps_to_shrunken_lists() {
        let mut state = OrderTableState { selected: 9, offset: 5 };
        state.clamp_to(3);
        assert_eq!(state.selected, 2);
        state.clamp_to(0);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn scrolling_follows_the_selection() {
        let mut state = OrderTableState::default();
        state.selected = 12;
        state.clamp_scroll(10);
        assert_eq!(state.offset, 3);
        state.selected = 1;
        state.clamp_scroll(10);
        assert_eq!(state.offset, 1);
    }
}
