//! Input handling — maps key/mouse events to state mutations.
//!
//! Every handled event is followed by a draw in the main loop, so updating
//! an interval bound here is all it takes to refilter the table; redraws
//! are cheap and idempotent.  Typed edits and picker selections funnel
//! through the same bound-update path.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::{Action, KeyBind};
use crate::core::date::parse_date_token;
use crate::core::debounce::typeahead_query_ready;
use crate::core::export;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState, MembersFocus, OrdersFocus, Pane, RangeBound};

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Dashboard => handle_dashboard_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
        ActiveView::DatePicker => handle_picker_key(state, key),
    }
}

/// Advance debounce clocks.  Called on every tick event.
pub fn handle_tick(state: &mut AppState) {
    state.tick = state.tick.wrapping_add(1);
    let now = Instant::now();

    if state.stats_debounce.fire(now) {
        state.needs_stats_refresh = true;
    }
    if state.typeahead_debounce.fire(now) && typeahead_query_ready(state.event_query.value()) {
        state.needs_suggestions = true;
    }
}

// ── Dashboard (configurable bindings) ───────────────────────────

fn handle_dashboard_key(state: &mut AppState, key: KeyEvent) {
    // Text inputs capture their keys before action bindings apply.
    let captured = match state.pane {
        Pane::Orders => handle_orders_input_key(state, key),
        Pane::Stats => handle_stats_input_key(state, key),
        Pane::Members => handle_members_key(state, key),
    };
    if captured {
        return;
    }

    // Table navigation that should always work.
    if state.pane == Pane::Orders {
        match key.code {
            KeyCode::Home => {
                state.table_state.reset();
                return;
            }
            KeyCode::End => {
                let len = state.visible_orders().len();
                if len > 0 {
                    state.table_state.selected = len - 1;
                }
                return;
            }
            _ => {}
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::NextPane => {
            state.pane = state.pane.next();
            state.orders_focus = OrdersFocus::Table;
            state.stats_editing = false;
        }
        Action::MoveUp => {
            if state.pane == Pane::Orders {
                state.table_state.select_prev();
            }
        }
        Action::MoveDown => {
            if state.pane == Pane::Orders {
                let len = state.visible_orders().len();
                state.table_state.select_next(len);
            }
        }
        Action::EditFrom => {
            if state.pane == Pane::Orders {
                state.orders_focus = OrdersFocus::From;
            }
        }
        Action::EditTo => {
            if state.pane == Pane::Orders {
                state.orders_focus = OrdersFocus::To;
            }
        }
        Action::EditSearch => match state.pane {
            Pane::Orders => state.orders_focus = OrdersFocus::Search,
            Pane::Stats => state.stats_editing = true,
            Pane::Members => state.members_focus = MembersFocus::Query,
        },
        Action::OpenDatePicker => {
            if state.pane == Pane::Orders {
                open_picker(state);
            }
        }
        Action::ClearFilters => {
            if state.pane == Pane::Orders {
                state.from_input.clear();
                state.to_input.clear();
                state.search_input.clear();
                state.date_filter.clear();
                state.search_filter.set_query("");
                state.status_message = Some("Filters cleared".into());
            }
        }
        Action::Reload => {
            state.needs_orders_reload = true;
            state.needs_stats_refresh = true;
            state.status_message = Some("Reloading…".into());
        }
        Action::ExportCsv => {
            if state.pane == Pane::Orders {
                export_visible(state);
            }
        }
        Action::ToggleMetric => {
            state.metric = state.metric.toggled();
        }
        Action::CycleYear => {
            state.cycle_year();
        }
        Action::TogglePrices => {
            let on = !state.config.full_prices;
            state.config.full_prices = on;
            let _ = state.config.save();
            state.status_message = Some(
                if on {
                    "Showing non-member prices".into()
                } else {
                    "Showing member prices".into()
                },
            );
        }
    }
}

// ── Orders pane inputs ──────────────────────────────────────────

/// Route keys into the focused filter input.  Returns `true` when consumed.
fn handle_orders_input_key(state: &mut AppState, key: KeyEvent) -> bool {
    let focus = state.orders_focus;
    if focus == OrdersFocus::Table {
        return false;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.orders_focus = OrdersFocus::Table;
        }
        KeyCode::Tab => {
            // Walk through the inputs, then back to the table.
            state.orders_focus = match focus {
                OrdersFocus::From => OrdersFocus::To,
                OrdersFocus::To => OrdersFocus::Search,
                OrdersFocus::Search | OrdersFocus::Table => OrdersFocus::Table,
            };
        }
        KeyCode::Char(c) => {
            focused_input(state, focus).insert(c);
            refresh_filter(state, focus);
        }
        KeyCode::Backspace => {
            focused_input(state, focus).backspace();
            refresh_filter(state, focus);
        }
        KeyCode::Delete => {
            focused_input(state, focus).delete();
            refresh_filter(state, focus);
        }
        KeyCode::Left => focused_input(state, focus).left(),
        KeyCode::Right => focused_input(state, focus).right(),
        KeyCode::Home => focused_input(state, focus).home(),
        KeyCode::End => focused_input(state, focus).end(),
        _ => {}
    }
    true
}

fn focused_input<'a>(
    state: &'a mut AppState,
    focus: OrdersFocus,
) -> &'a mut crate::ui::input::InputState {
    match focus {
        OrdersFocus::From => &mut state.from_input,
        OrdersFocus::To => &mut state.to_input,
        OrdersFocus::Search | OrdersFocus::Table => &mut state.search_input,
    }
}

/// Push the edited input's value into its filter.  An unparseable date
/// token leaves that bound open — the table refilters either way.
fn refresh_filter(state: &mut AppState, focus: OrdersFocus) {
    match focus {
        OrdersFocus::From => state.date_filter.set_start(state.from_input.value()),
        OrdersFocus::To => state.date_filter.set_end(state.to_input.value()),
        OrdersFocus::Search | OrdersFocus::Table => {
            state.search_filter.set_query(state.search_input.value())
        }
    }
}

fn open_picker(state: &mut AppState) {
    let (target, input) = match state.orders_focus {
        OrdersFocus::To => (RangeBound::To, &state.to_input),
        _ => (RangeBound::From, &state.from_input),
    };
    let initial = parse_date_token(input.value())
        .unwrap_or_else(|_| chrono::Local::now().date_naive());
    state.picker.open(target, initial);
    state.active_view = ActiveView::DatePicker;
}

// ── Date picker ─────────────────────────────────────────────────

fn handle_picker_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.active_view = ActiveView::Dashboard,
        KeyCode::Left => state.picker.prev_day(),
        KeyCode::Right => state.picker.next_day(),
        KeyCode::Up => state.picker.prev_week(),
        KeyCode::Down => state.picker.next_week(),
        KeyCode::PageUp => state.picker.prev_month(),
        KeyCode::PageDown => state.picker.next_month(),
        KeyCode::Enter => {
            let token = state.picker.token();
            // Same path as a typed token: set the input, re-parse the bound.
            match state.picker.target {
                RangeBound::From => {
                    state.from_input.set(&token);
                    state.date_filter.set_start(&token);
                }
                RangeBound::To => {
                    state.to_input.set(&token);
                    state.date_filter.set_end(&token);
                }
            }
            state.active_view = ActiveView::Dashboard;
            state.orders_focus = OrdersFocus::Table;
        }
        _ => {}
    }
}

// ── Stats pane input ────────────────────────────────────────────

fn handle_stats_input_key(state: &mut AppState, key: KeyEvent) -> bool {
    if !state.stats_editing {
        return false;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Enter => state.stats_editing = false,
        KeyCode::Char(c) => {
            state.stats_search.insert(c);
            state.stats_debounce.poke(Instant::now());
        }
        KeyCode::Backspace => {
            state.stats_search.backspace();
            state.stats_debounce.poke(Instant::now());
        }
        KeyCode::Left => state.stats_search.left(),
        KeyCode::Right => state.stats_search.right(),
        KeyCode::Home => state.stats_search.home(),
        KeyCode::End => state.stats_search.end(),
        _ => {}
    }
    true
}

// ── Members pane ────────────────────────────────────────────────

fn handle_members_key(state: &mut AppState, key: KeyEvent) -> bool {
    match state.members_focus {
        MembersFocus::Query => handle_member_query_key(state, key),
        MembersFocus::Suggestions => handle_suggestion_key(state, key),
        MembersFocus::List => handle_member_list_key(state, key),
    }
}

fn handle_member_query_key(state: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) => {
            state.event_query.insert(c);
            on_query_edited(state);
        }
        KeyCode::Backspace => {
            state.event_query.backspace();
            on_query_edited(state);
        }
        KeyCode::Delete => {
            state.event_query.delete();
            on_query_edited(state);
        }
        KeyCode::Left => state.event_query.left(),
        KeyCode::Right => state.event_query.right(),
        KeyCode::Home => state.event_query.home(),
        KeyCode::End => state.event_query.end(),
        KeyCode::Down if !state.suggestions.is_empty() => {
            state.members_focus = MembersFocus::Suggestions;
            state.suggestion_selected = 0;
        }
        KeyCode::Down if !state.members.is_empty() => {
            state.members_focus = MembersFocus::List;
        }
        KeyCode::Enter if !state.suggestions.is_empty() => {
            pick_suggestion(state, state.suggestion_selected);
        }
        KeyCode::Esc => {
            state.event_query.clear();
            on_query_edited(state);
        }
        _ => return false,
    }
    true
}

/// Debounced typeahead: re-arm on every edit, drop stale suggestions when
/// the query falls under the minimum length.
fn on_query_edited(state: &mut AppState) {
    if typeahead_query_ready(state.event_query.value()) {
        state.typeahead_debounce.poke(Instant::now());
    } else {
        state.typeahead_debounce.cancel();
        state.suggestions.clear();
        state.suggestion_selected = 0;
    }
}

fn handle_suggestion_key(state: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up => {
            if state.suggestion_selected == 0 {
                state.members_focus = MembersFocus::Query;
            } else {
                state.suggestion_selected -= 1;
            }
        }
        KeyCode::Down => {
            if state.suggestion_selected + 1 < state.suggestions.len() {
                state.suggestion_selected += 1;
            } else if !state.members.is_empty() {
                state.members_focus = MembersFocus::List;
            }
        }
        KeyCode::Enter => pick_suggestion(state, state.suggestion_selected),
        KeyCode::Esc => state.members_focus = MembersFocus::Query,
        _ => return false,
    }
    true
}

fn pick_suggestion(state: &mut AppState, index: usize) {
    let Some(suggestion) = state.suggestions.get(index).cloned() else {
        return;
    };
    state.needs_members = Some(suggestion.id);
    state.picked_event = Some(suggestion);
    state.members_focus = MembersFocus::Query;
}

fn handle_member_list_key(state: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up => {
            if state.member_selected == 0 {
                state.members_focus = MembersFocus::Query;
            } else {
                state.member_selected -= 1;
            }
        }
        KeyCode::Down => {
            if state.member_selected + 1 < state.members.len() {
                state.member_selected += 1;
            }
        }
        KeyCode::Enter => activate_member(state, state.member_selected),
        KeyCode::Esc => state.members_focus = MembersFocus::Query,
        _ => return false,
    }
    true
}

/// Record the invoice link of the activated member; it is printed to stdout
/// when the app exits so the terminal stays usable for piping.
fn activate_member(state: &mut AppState, index: usize) {
    let Some(member) = state.members.get(index) else {
        return;
    };
    match member.invoice_id {
        Some(invoice_id) => {
            let url = state.source.invoice_url(invoice_id);
            state.status_message = Some(format!("Invoice link recorded: {url}"));
            state.invoice_url = Some(url);
        }
        None => {
            state.status_message = Some(format!("{} has no invoice", member.name));
        }
    }
}

// ── CSV export ──────────────────────────────────────────────────

fn export_visible(state: &mut AppState) {
    let visible = state.visible_orders();
    let path = export::default_export_path(chrono::Local::now().naive_local());
    match export::write_visible(&state.orders, &visible, &path) {
        Ok(count) => {
            state.status_message = Some(format!("Exported {count} rows to {}", path.display()));
        }
        Err(err) => {
            tracing::warn!(%err, "csv export failed");
            state.status_message = Some(format!("Export failed: {err}"));
        }
    }
}

// ── Settings menu ───────────────────────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.active_view = ActiveView::Dashboard,
        KeyCode::Up => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            match &SETTINGS_ITEMS[state.settings_selected] {
                SettingsItem::Submenu { view, .. } => {
                    state.active_view = *view;
                    state.controls_selected = 0;
                    state.awaiting_rebind = false;
                }
                SettingsItem::Toggle { get, set, .. } => {
                    let value = get(state);
                    set(state, !value);
                }
                SettingsItem::Cycle { cycle, .. } => cycle(state),
            }
        }
        _ => {}
    }
}

// ── Controls submenu ────────────────────────────────────────────

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let reset_idx = Action::ALL.len();
    match key.code {
        KeyCode::Esc => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if state.controls_selected + 1 < controls_item_count() {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected == reset_idx {
                state.config.reset_defaults();
                let _ = state.config.save();
                state.status_message = Some("Keybindings reset to defaults".into());
            } else {
                state.awaiting_rebind = true;
            }
        }
        KeyCode::Delete => {
            if state.controls_selected < reset_idx {
                let action = Action::ALL[state.controls_selected];
                state.config.bindings.insert(action, Vec::new());
                let _ = state.config.save();
            }
        }
        _ => {}
    }
}

fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }
    let action = Action::ALL[state.controls_selected];
    state.config.add_binding(action, KeyBind::from_key_event(key));
    let _ = state.config.save();
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Dashboard {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => match state.pane {
            Pane::Orders => state.table_state.select_prev(),
            Pane::Members => {
                state.member_selected = state.member_selected.saturating_sub(1);
            }
            Pane::Stats => {}
        },
        MouseEventKind::ScrollDown => match state.pane {
            Pane::Orders => {
                let len = state.visible_orders().len();
                state.table_state.select_next(len);
            }
            Pane::Members => {
                if state.member_selected + 1 < state.members.len() {
                    state.member_selected += 1;
                }
            }
            Pane::Stats => {}
        },
        MouseEventKind::Down(MouseButton::Left) => {
            handle_left_click(state, mouse.column, mouse.row);
        }
        _ => {}
    }
}

/// Click selects a row; a double click inside the double-click window
/// activates it (member rows: record the invoice link).
fn handle_left_click(state: &mut AppState, column: u16, row: u16) {
    match state.pane {
        Pane::Orders => {
            let Some(area) = state.orders_table_area else {
                return;
            };
            // Body rows sit between the header line and the bottom border.
            let top = area.y + 2;
            let bottom = area.y + area.height.saturating_sub(1);
            if column < area.x || column >= area.x + area.width || row < top || row >= bottom {
                return;
            }
            let index = state.table_state.offset + (row - top) as usize;
            if index < state.visible_orders().len() {
                state.table_state.selected = index;
                state.orders_focus = OrdersFocus::Table;
            }
        }
        Pane::Members => {
            let Some(area) = state.members_list_area else {
                return;
            };
            let top = area.y + 2;
            let bottom = area.y + area.height.saturating_sub(1);
            if column < area.x || column >= area.x + area.width || row < top || row >= bottom {
                return;
            }
            let index = state.members_pane_state.members_offset + (row - top) as usize;
            if index >= state.members.len() {
                return;
            }
            state.members_focus = MembersFocus::List;
            state.member_selected = index;

            let now = Instant::now();
            let window = std::time::Duration::from_millis(state.config.double_click_ms);
            let is_double = matches!(
                state.last_left_click,
                Some((last, at)) if last == index && now.duration_since(at) <= window
            );
            if is_double {
                activate_member(state, index);
                state.last_left_click = None;
            } else {
                state.last_left_click = Some((index, now));
            }
        }
        Pane::Stats => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{OrderRecord, Suggestion};
    use crate::api::DataSource;
    use crate::config::AppConfig;
    use crate::core::orders::OrderSet;

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

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_into_from(state: &mut AppState, text: &str) {
        state.orders_focus = OrdersFocus::From;
        for c in text.chars() {
            handle_key(state, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_a_from_date_filters_live() {
        let mut state = test_state();
        state.orders = OrderSet::ingest(
            vec![
                OrderRecord {
                    id: 1,
                    date_created: Some("2024-01-01".into()),
                    lastname: "Early".into(),
                    email: "e@x".into(),
                },
                OrderRecord {
                    id: 2,
                    date_created: Some("2024-06-15".into()),
                    lastname: "Late".into(),
                    email: "l@x".into(),
                },
            ],
            1,
        );

        type_into_from(&mut state, "01.06.2024");
        assert_eq!(state.visible_orders().len(), 1);

        // Partial edits leave the bound open instead of erroring.
        handle_key(&mut state, press(KeyCode::Backspace));
        assert_eq!(state.date_filter.interval().start, None);
        assert_eq!(state.visible_orders().len(), 2);
    }

    #[test]
    fn picker_selection_takes_the_typed_token_path() {
        let mut state = test_state();
        state.orders_focus = OrdersFocus::From;
        open_picker(&mut state);
        assert_eq!(state.active_view, ActiveView::DatePicker);

        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.active_view, ActiveView::Dashboard);
        assert_eq!(state.from_input.value(), state.picker.token());
        assert!(state.date_filter.interval().start.is_some());
    }

    #[test]
    fn short_typeahead_queries_never_arm_the_debounce() {
        let mut state = test_state();
        state.pane = Pane::Members;
        handle_key(&mut state, press(KeyCode::Char('a')));
        assert!(!state.typeahead_debounce.is_armed());
        handle_key(&mut state, press(KeyCode::Char('b')));
        assert!(state.typeahead_debounce.is_armed());
    }

    #[test]
    fn picking_a_suggestion_requests_its_members() {
        let mut state = test_state();
        state.pane = Pane::Members;
        state.suggestions = vec![Suggestion {
            id: 10,
            text: "Sommerfest (2024-07-01)".into(),
        }];
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.needs_members, Some(10));
        assert_eq!(state.picked_event.as_ref().unwrap().id, 10);
    }

    #[test]
    fn reload_action_flags_both_fetches() {
        let mut state = test_state();
        state.needs_orders_reload = false;
        state.needs_stats_refresh = false;
        handle_key(&mut state, press(KeyCode::Char('r')));
        assert!(state.needs_orders_reload);
        assert!(state.needs_stats_refresh);
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn records(n: i64) -> Vec<OrderRecord> {
        (0..n)
            .map(|i| OrderRecord {
                id: i,
                date_created: Some("2024-06-15".into()),
                lastname: format!("L{i}"),
                email: "x@example.org".into(),
            })
            .collect()
    }

    #[test]
    fn clicks_on_the_table_borders_do_not_select() {
        let mut state = test_state();
        state.orders = OrderSet::ingest(records(20), 1);
        state.orders_table_area = Some(ratatui::layout::Rect::new(0, 0, 40, 10));

        // Bottom border line (row 9) maps to no body row.
        handle_mouse(&mut state, click(5, 9));
        assert_eq!(state.table_state.selected, 0);
        // Header line (row 1) neither.
        handle_mouse(&mut state, click(5, 1));
        assert_eq!(state.table_state.selected, 0);
        // A body row does.
        handle_mouse(&mut state, click(5, 4));
        assert_eq!(state.table_state.selected, 2);
    }

    #[test]
    fn member_clicks_respect_the_scroll_offset() {
        let mut state = test_state();
        state.pane = Pane::Members;
        state.members = (0..30)
            .map(|i| crate::api::models::MemberRecord {
                name: format!("M{i}"),
                email: "m@example.org".into(),
                event: "E".into(),
                invoice_id: None,
            })
            .collect();
        state.members_list_area = Some(ratatui::layout::Rect::new(0, 0, 40, 10));
        state.members_pane_state.members_offset = 12;

        // Row 3 is the second body row; with the list scrolled it is member 13.
        handle_mouse(&mut state, click(5, 3));
        assert_eq!(state.member_selected, 13);
        assert_eq!(state.members_focus, MembersFocus::List);

        // The bottom border stays inert even when scrolled.
        state.member_selected = 0;
        handle_mouse(&mut state, click(5, 9));
        assert_eq!(state.member_selected, 0);
    }

    #[test]
    fn clear_filters_opens_both_bounds() {
        let mut state = test_state();
        type_into_from(&mut state, "01.06.2024");
        handle_key(&mut state, press(KeyCode::Esc)); // back to table
        handle_key(&mut state, press(KeyCode::Char('c')));
        assert!(state.date_filter.interval().is_unbounded());
        assert!(state.from_input.is_empty());
    }
}
