//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Instant;

use ratatui::layout::Rect;

use crate::api::models::{MemberRecord, StatsPayload, Suggestion};
use crate::api::DataSource;
use crate::config::AppConfig;
use crate::core::debounce::{Debounce, STATS_SEARCH_DELAY, TYPEAHEAD_DELAY};
use crate::core::filter::{DateRangeFilter, RowFilter, SearchFilter};
use crate::core::orders::OrderSet;
use crate::core::stats::Metric;
use crate::ui::date_picker::DatePickerState;
use crate::ui::input::InputState;
use crate::ui::members::MembersPaneState;
use crate::ui::order_table::OrderTableState;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Dashboard,
    SettingsMenu,
    ControlsSubmenu,
    DatePicker,
}

/// The three dashboard panes, cycled with the next-pane action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Orders,
    Stats,
    Members,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Orders => Pane::Stats,
            Pane::Stats => Pane::Members,
            Pane::Members => Pane::Orders,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Pane::Orders => "Orders",
            Pane::Stats => "Stats",
            Pane::Members => "Members",
        }
    }
}

/// Focus within the orders pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrdersFocus {
    #[default]
    Table,
    From,
    To,
    Search,
}

/// Which date-range input a picker selection writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    From,
    To,
}

/// Focus within the members pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembersFocus {
    #[default]
    Query,
    Suggestions,
    List,
}

/// Top-level application state.
pub struct AppState {
    /// Where the data comes from (cloned into fetch tasks).
    pub source: DataSource,
    /// User-configurable keybindings and settings.
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Which dashboard pane has focus.
    pub pane: Pane,
    /// Monotonic tick counter (drives the spinner).
    pub tick: u64,

    // ── orders pane ─────────────────────────────────────────────
    /// The loaded dataset; replaced wholesale on each (re)load.
    pub orders: OrderSet,
    pub orders_loading: bool,
    /// Generation of the newest orders fetch; stale results are dropped.
    pub orders_generation: u64,
    pub table_state: OrderTableState,
    pub orders_focus: OrdersFocus,
    pub from_input: InputState,
    pub to_input: InputState,
    pub search_input: InputState,
    /// The date-range bound store feeding the first pipeline filter.
    pub date_filter: DateRangeFilter,
    /// Free-text filter, second in the pipeline.
    pub search_filter: SearchFilter,
    /// Month-grid popup state while `active_view == DatePicker`.
    pub picker: DatePickerState,

    // ── stats pane ──────────────────────────────────────────────
    pub stats: Option<StatsPayload>,
    pub stats_loading: bool,
    pub stats_generation: u64,
    pub stats_error: Option<String>,
    pub metric: Metric,
    /// Selected year filter (`None` = all years).
    pub year_filter: Option<i32>,
    pub stats_search: InputState,
    pub stats_editing: bool,
    pub stats_debounce: Debounce,

    // ── members pane ────────────────────────────────────────────
    pub members_focus: MembersFocus,
    pub event_query: InputState,
    pub typeahead_debounce: Debounce,
    pub suggestions: Vec<Suggestion>,
    pub suggestions_loading: bool,
    pub suggestions_generation: u64,
    pub suggestion_selected: usize,
    /// Event picked from the typeahead, if any.
    pub picked_event: Option<Suggestion>,
    pub members: Vec<MemberRecord>,
    pub members_loading: bool,
    pub members_generation: u64,
    pub members_error: Option<String>,
    pub member_selected: usize,
    /// Scroll offsets of the suggestion and member lists; they follow the
    /// selection during render.
    pub members_pane_state: MembersPaneState,
    /// Invoice link of the last activated member; printed to stdout on quit
    /// so the TUI (on stderr) stays pipeable.
    pub invoice_url: Option<String>,

    // ── overlays ────────────────────────────────────────────────
    pub settings_selected: usize,
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,

    // ── fetch requests (read by the main loop after each draw) ──
    pub needs_orders_reload: bool,
    pub needs_stats_refresh: bool,
    pub needs_suggestions: bool,
    pub needs_members: Option<i64>,

    /// Last left-clicked row and click time, for double-click detection.
    pub last_left_click: Option<(usize, Instant)>,

    // ── screen areas recorded during draw (for mouse hit-testing) ──
    pub orders_table_area: Option<Rect>,
    pub members_list_area: Option<Rect>,
}

impl AppState {
    pub fn new(source: DataSource, config: AppConfig) -> Self {
        Self {
            source,
            config,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            pane: Pane::default(),
            tick: 0,
            orders: OrderSet::default(),
            orders_loading: false,
            orders_generation: 0,
            table_state: OrderTableState::default(),
            orders_focus: OrdersFocus::default(),
            from_input: InputState::default(),
            to_input: InputState::default(),
            search_input: InputState::default(),
            date_filter: DateRangeFilter::default(),
            search_filter: SearchFilter::default(),
            picker: DatePickerState::default(),
            stats: None,
            stats_loading: false,
            stats_generation: 0,
            stats_error: None,
            metric: Metric::default(),
            year_filter: None,
            stats_search: InputState::default(),
            stats_editing: false,
            stats_debounce: Debounce::new(STATS_SEARCH_DELAY),
            members_focus: MembersFocus::default(),
            event_query: InputState::default(),
            typeahead_debounce: Debounce::new(TYPEAHEAD_DELAY),
            suggestions: Vec::new(),
            suggestions_loading: false,
            suggestions_generation: 0,
            suggestion_selected: 0,
            picked_event: None,
            members: Vec::new(),
            members_loading: false,
            members_generation: 0,
            members_error: None,
            member_selected: 0,
            members_pane_state: MembersPaneState::default(),
            invoice_url: None,
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            needs_orders_reload: true,
            needs_stats_refresh: true,
            needs_suggestions: false,
            needs_members: None,
            last_left_click: None,
            orders_table_area: None,
            members_list_area: None,
        }
    }

    /// Evaluate the filter pipeline (date range first, then text search)
    /// over the loaded rows, returning visible indices in dataset order.
    pub fn visible_orders(&self) -> Vec<usize> {
        let filters: [&dyn RowFilter; 2] = [&self.date_filter, &self.search_filter];
        crate::core::filter::visible_rows(&self.orders, &filters)
    }

    /// Year options for the stats filter: "all" plus the years observed in
    /// the loaded orders, newest first.
    pub fn year_options(&self) -> Vec<Option<i32>> {
        let mut options = vec![None];
        options.extend(self.orders.years().into_iter().map(Some));
        options
    }

    /// Advance the year filter to the next option and request a refetch.
    pub fn cycle_year(&mut self) {
        let options = self.year_options();
        let index = options
            .iter()
            .position(|&o| o == self.year_filter)
            .unwrap_or(0);
        self.year_filter = options[(index + 1) % options.len()];
        self.needs_stats_refresh = true;
    }
}
