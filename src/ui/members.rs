//! Members pane — event typeahead, suggestion list and the member table.
//!
//! Both lists scroll. Selection lives in the app state; the scroll offsets
//! live in [`MembersPaneState`] and follow the selection during render, the
//! same way the orders table keeps its selected row in view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, StatefulWidget, Widget},
};

use crate::api::models::{MemberRecord, Suggestion};
use crate::app::state::MembersFocus;
use crate::core::debounce::TYPEAHEAD_MIN_QUERY;

use super::input::InputState;
use super::layout::MembersLayout;
use super::theme::Theme;

const NAME_WIDTH: usize = 22;
const EMAIL_WIDTH: usize = 30;

/// Scroll offsets for the suggestion and member lists.
#[derive(Debug, Default)]
pub struct MembersPaneState {
    pub suggestions_offset: usize,
    pub members_offset: usize,
}

/// Move the window so `selected` stays inside a viewport of `height` rows.
fn follow_selection(offset: &mut usize, selected: usize, height: usize) {
    if height == 0 {
        return;
    }
    if selected < *offset {
        *offset = selected;
    } else if selected >= *offset + height {
        *offset = selected - height + 1;
    }
}

pub struct MembersPane<'a> {
    pub query: &'a InputState,
    pub focus: MembersFocus,
    pub suggestions: &'a [Suggestion],
    pub suggestion_selected: usize,
    pub picked_event: Option<&'a Suggestion>,
    pub members: &'a [MemberRecord],
    pub member_selected: usize,
    pub error: Option<&'a str>,
}

impl StatefulWidget for MembersPane<'_> {
    type State = MembersPaneState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let layout = MembersLayout::from_area(area);
        self.render_query(layout.query_area, buf);
        self.render_suggestions(layout.suggestions_area, buf, &mut state.suggestions_offset);
        self.render_list(layout.list_area, buf, &mut state.members_offset);
    }
}

impl MembersPane<'_> {
    fn render_query(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == MembersFocus::Query;
        let block = Block::default()
            .title(" Event search ")
            .title_style(Theme::input_label_style())
            .borders(Borders::ALL)
            .border_style(if focused {
                Theme::focused_border_style()
            } else {
                Theme::border_style()
            });
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let mut spans = vec![Span::styled(
            self.query.value().to_string(),
            Theme::input_style(),
        )];
        if focused {
            spans.push(Span::styled("█", Theme::input_style()));
        }
        if self.query.value().trim().chars().count() < TYPEAHEAD_MIN_QUERY {
            spans.push(Span::styled(
                format!("  (type at least {TYPEAHEAD_MIN_QUERY} characters)"),
                Theme::empty_style(),
            ));
        }
        buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);
    }

    fn render_suggestions(&self, area: Rect, buf: &mut Buffer, offset: &mut usize) {
        let focused = self.focus == MembersFocus::Suggestions;
        let block = Block::default()
            .title(" Events ")
            .title_style(Theme::input_label_style())
            .borders(Borders::ALL)
            .border_style(if focused {
                Theme::focused_border_style()
            } else {
                Theme::border_style()
            });
        let inner = block.inner(area);
        block.render(area, buf);

        if self.suggestions.is_empty() {
            *offset = 0;
            if inner.height > 0 {
                buf.set_line(
                    inner.x,
                    inner.y,
                    &Line::from(Span::styled("No events found.", Theme::empty_style())),
                    inner.width,
                );
            }
            return;
        }

        let height = inner.height as usize;
        let selected = self.suggestion_selected.min(self.suggestions.len() - 1);
        follow_selection(offset, selected, height);

        let rows = self
            .suggestions
            .iter()
            .enumerate()
            .skip(*offset)
            .take(height);
        for (i, suggestion) in rows {
            let style = if focused && i == selected {
                Theme::selected_style()
            } else {
                Theme::row_style()
            };
            let line = Line::from(Span::styled(format!(" {}", suggestion.text), style));
            buf.set_line(inner.x, inner.y + (i - *offset) as u16, &line, inner.width);
        }
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer, offset: &mut usize) {
        let focused = self.focus == MembersFocus::List;
        let title = match self.picked_event {
            Some(event) => format!(" Members — {} ", event.text),
            None => " Members ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(if focused {
                Theme::focused_border_style()
            } else {
                Theme::border_style()
            });
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 2 {
            return;
        }

        if let Some(error) = self.error {
            *offset = 0;
            buf.set_line(
                inner.x,
                inner.y,
                &Line::from(Span::styled(
                    format!("Members unavailable: {error}"),
                    Theme::empty_style(),
                )),
                inner.width,
            );
            return;
        }

        if self.members.is_empty() {
            *offset = 0;
            let message = if self.picked_event.is_some() {
                "No members found."
            } else {
                "Pick an event to list its members."
            };
            buf.set_line(
                inner.x,
                inner.y,
                &Line::from(Span::styled(message, Theme::empty_style())),
                inner.width,
            );
            return;
        }

        let header = format!(
            "{:<name$}{:<email$}{}",
            "Name",
            "Email",
            "Invoice",
            name = NAME_WIDTH,
            email = EMAIL_WIDTH,
        );
        buf.set_line(
            inner.x,
            inner.y,
            &Line::from(Span::styled(header, Theme::header_style())),
            inner.width,
        );

        // One row taken by the header.
        let height = inner.height as usize - 1;
        let selected = self.member_selected.min(self.members.len() - 1);
        follow_selection(offset, selected, height);

        let rows = self
            .members
            .iter()
            .enumerate()
            .skip(*offset)
            .take(height);
        for (i, member) in rows {
            let is_selected = focused && i == selected;
            let base = if is_selected {
                Theme::selected_style()
            } else {
                Theme::row_style()
            };
            let invoice = match member.invoice_id {
                Some(_) => Span::styled("Invoice", Theme::link_style()),
                None => Span::styled("no invoice", Theme::empty_style()),
            };
            let line = Line::from(vec![
                Span::styled(
                    format!(
                        "{:<name$}{:<email$}",
                        truncate(&member.name, NAME_WIDTH - 2),
                        truncate(&member.email, EMAIL_WIDTH - 2),
                        name = NAME_WIDTH,
                        email = EMAIL_WIDTH,
                    ),
                    base,
                ),
                invoice,
            ]);
            buf.set_line(
                inner.x,
                inner.y + 1 + (i - *offset) as u16,
                &line,
                inner.width,
            );
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

    fn member(i: usize) -> MemberRecord {
        MemberRecord {
            name: format!("Member{i:02}"),
            email: format!("m{i:02}@example.org"),
            event: "E".into(),
            invoice_id: None,
        }
    }

    fn suggestion(i: i64) -> Suggestion {
        Suggestion {
            id: i,
            text: format!("Event{i}"),
        }
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in buf.area.top()..buf.area.bottom() {
            for x in buf.area.left()..buf.area.right() {
                out.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(pane: MembersPane, state: &mut MembersPaneState) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        pane.render(area, &mut buf, state);
        buffer_text(&buf)
    }

    fn pane<'a>(
        query: &'a InputState,
        suggestions: &'a [Suggestion],
        members: &'a [MemberRecord],
    ) -> MembersPane<'a> {
        MembersPane {
            query,
            focus: MembersFocus::List,
            suggestions,
            suggestion_selected: 0,
            picked_event: None,
            members,
            member_selected: 0,
            error: None,
        }
    }

    #[test]
    fn member_list_scrolls_to_keep_the_selection_visible() {
        let query = InputState::default();
        let members: Vec<MemberRecord> = (0..30).map(member).collect();
        let mut state = MembersPaneState::default();

        let mut widget = pane(&query, &[], &members);
        widget.member_selected = 25;
        let text = render(widget, &mut state);
        assert!(text.contains("Member25"), "selected row must be rendered");
        assert!(!text.contains("Member00"), "window must have scrolled down");
        assert!(state.members_offset > 0);

        // Moving the selection back up scrolls the window back.
        let mut widget = pane(&query, &[], &members);
        widget.member_selected = 2;
        let text = render(widget, &mut state);
        assert!(text.contains("Member02"));
        assert_eq!(state.members_offset, 2);
    }

    #[test]
    fn suggestion_list_scrolls_past_the_visible_window() {
        let query = InputState::default();
        let suggestions: Vec<Suggestion> = (0..10).map(suggestion).collect();
        let mut state = MembersPaneState::default();

        let mut widget = pane(&query, &suggestions, &[]);
        widget.focus = MembersFocus::Suggestions;
        widget.suggestion_selected = 9;
        let text = render(widget, &mut state);
        assert!(text.contains("Event9"), "last suggestion must be reachable");
        assert!(state.suggestions_offset > 0);
    }

    #[test]
    fn emptied_lists_reset_their_offsets() {
        let query = InputState::default();
        let mut state = MembersPaneState {
            suggestions_offset: 4,
            members_offset: 9,
        };
        let _ = render(pane(&query, &[], &[]), &mut state);
        assert_eq!(state.suggestions_offset, 0);
        assert_eq!(state.members_offset, 0);
    }

    #[test]
    fn follow_selection_moves_the_window_both_ways() {
        let mut offset = 0;
        follow_selection(&mut offset, 12, 10);
        assert_eq!(offset, 3);
        follow_selection(&mut offset, 12, 10);
        assert_eq!(offset, 3);
        follow_selection(&mut offset, 1, 10);
        assert_eq!(offset, 1);
    }
}
