//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: tab bar, main pane, bottom status bar.
pub struct AppLayout {
    pub tab_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // tab bar
                Constraint::Min(3),    // active pane
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            tab_area: chunks[0],
            main_area: chunks[1],
            status_area: chunks[2],
        }
    }
}

/// Orders pane: filter bar on top, table below.
pub struct OrdersLayout {
    pub filter_area: Rect,
    pub table_area: Rect,
}

impl OrdersLayout {
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // from/to/search inputs
                Constraint::Min(3),    // table
            ])
            .split(area);

        Self {
            filter_area: chunks[0],
            table_area: chunks[1],
        }
    }
}

/// Members pane: typeahead input, suggestion list, member table.
pub struct MembersLayout {
    pub query_area: Rect,
    pub suggestions_area: Rect,
    pub list_area: Rect,
}

impl MembersLayout {
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // typeahead input
                Constraint::Length(7), // suggestions
                Constraint::Min(3),    // member list
            ])
            .split(area);

        Self {
            query_area: chunks[0],
            suggestions_area: chunks[1],
            list_area: chunks[2],
        }
    }
}
