//! A terminal dashboard for event orders, stats and members.
//!
//! Point the binary at a server URL or a snapshot directory.  The UI is
//! drawn on stderr; stdout only ever carries the invoice link selected
//! during the session, so the binary stays pipeable.

#![feature(int_roundings)]

mod api;
mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::api::DataSource;
use crate::app::{
    event::{spawn_event_reader, AppEvent},
    fetch::{self, DataUpdate},
    handler,
    state::{ActiveView, AppState, OrdersFocus, Pane},
};
use crate::ui::{
    date_picker::DatePickerPopup,
    filter_bar::FilterBar,
    layout::{AppLayout, MembersLayout, OrdersLayout},
    members::MembersPane,
    order_table::OrderTable,
    popup,
    spinner::LoadingIndicator,
    stats::StatsPane,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal dashboard for event orders")]
struct Cli {
    /// Server URL (`http://…`) or snapshot directory.
    /// Defaults to the configured server.
    source: Option<String>,

    /// Start with the stats chart restricted to this year.
    #[arg(long)]
    year: Option<i32>,

    /// Show non-member prices in the stats chart.
    #[arg(long = "full-prices")]
    full_prices: bool,
}

// ───────────────────────────────────────── rendering ─────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());

    draw_tab_bar(frame, state, layout.tab_area);
    match state.pane {
        Pane::Orders => draw_orders(frame, state, layout.main_area),
        Pane::Stats => draw_stats(frame, state, layout.main_area),
        Pane::Members => draw_members(frame, state, layout.main_area),
    }

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Dashboard | ActiveView::DatePicker => {
            state.status_message.as_deref().unwrap_or(&hint)
        }
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => "",
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    match state.active_view {
        ActiveView::SettingsMenu => {
            let selected = state.settings_selected;
            frame.render_widget(
                popup::SettingsPopup {
                    state: &*state,
                    selected,
                },
                frame.area(),
            );
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::DatePicker => {
            frame.render_widget(DatePickerPopup { state: &state.picker }, frame.area());
        }
        ActiveView::Dashboard => {}
    }
}

fn draw_tab_bar(frame: &mut Frame, state: &AppState, area: ratatui::layout::Rect) {
    let mut spans = Vec::new();
    for pane in [Pane::Orders, Pane::Stats, Pane::Members] {
        let style = if pane == state.pane {
            Theme::tab_active_style()
        } else {
            Theme::tab_style()
        };
        spans.push(Span::styled(format!("  {}  ", pane.title()), style));
    }
    spans.push(Span::styled(
        format!("  {}", state.source.label()),
        Theme::empty_style(),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_orders(frame: &mut Frame, state: &mut AppState, area: ratatui::layout::Rect) {
    let layout = OrdersLayout::from_area(area);
    state.orders_table_area = Some(layout.table_area);

    frame.render_widget(
        FilterBar {
            from: &state.from_input,
            to: &state.to_input,
            search: &state.search_input,
            focus: state.orders_focus,
        },
        layout.filter_area,
    );

    // The table widget clamps selection and scroll itself during render.
    let visible = state.visible_orders();
    let block = Block::default()
        .title(OrderTable::title(&state.orders, visible.len()))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    let table = OrderTable::new(&state.orders, &visible)
        .block(block)
        .focused(state.orders_focus == OrdersFocus::Table);
    frame.render_stateful_widget(table, layout.table_area, &mut state.table_state);

    frame.render_widget(
        LoadingIndicator {
            visible: state.orders_loading,
            tick: state.tick,
        },
        layout.table_area,
    );
}

fn draw_stats(frame: &mut Frame, state: &AppState, area: ratatui::layout::Rect) {
    frame.render_widget(
        StatsPane {
            payload: state.stats.as_ref(),
            error: state.stats_error.as_deref(),
            metric: state.metric,
            year_filter: state.year_filter,
            search: &state.stats_search,
            editing: state.stats_editing,
            full_prices: state.config.full_prices,
        },
        area,
    );
    frame.render_widget(
        LoadingIndicator {
            visible: state.stats_loading,
            tick: state.tick,
        },
        area,
    );
}

fn draw_members(frame: &mut Frame, state: &mut AppState, area: ratatui::layout::Rect) {
    state.members_list_area = Some(MembersLayout::from_area(area).list_area);

    frame.render_stateful_widget(
        MembersPane {
            query: &state.event_query,
            focus: state.members_focus,
            suggestions: &state.suggestions,
            suggestion_selected: state.suggestion_selected,
            picked_event: state.picked_event.as_ref(),
            members: &state.members,
            member_selected: state.member_selected,
            error: state.members_error.as_deref(),
        },
        area,
        &mut state.members_pane_state,
    );
    frame.render_widget(
        LoadingIndicator {
            visible: state.suggestions_loading || state.members_loading,
            tick: state.tick,
        },
        area,
    );
}

// ───────────────────────────────────────── fetch dispatch ────

/// Start any fetches requested by the last round of event handling.
/// Runs after the draw so the UI reflects the request before the data
/// arrives; each spawn bumps its generation to supersede in-flight work.
fn dispatch_fetches(state: &mut AppState, tx: &tokio::sync::mpsc::UnboundedSender<DataUpdate>) {
    if state.needs_orders_reload {
        state.needs_orders_reload = false;
        state.orders_generation = state.orders_generation.wrapping_add(1);
        state.orders_loading = true;
        fetch::spawn_orders_fetch(tx.clone(), state.source.clone(), state.orders_generation);
    }

    if state.needs_stats_refresh {
        state.needs_stats_refresh = false;
        state.stats_generation = state.stats_generation.wrapping_add(1);
        state.stats_loading = true;
        fetch::spawn_stats_fetch(
            tx.clone(),
            state.source.clone(),
            state.stats_generation,
            state.year_filter,
            state.stats_search.value().trim().to_string(),
        );
    }

    if state.needs_suggestions {
        state.needs_suggestions = false;
        state.suggestions_generation = state.suggestions_generation.wrapping_add(1);
        state.suggestions_loading = true;
        fetch::spawn_suggestion_fetch(
            tx.clone(),
            state.source.clone(),
            state.suggestions_generation,
            state.event_query.value().trim().to_string(),
        );
    }

    if let Some(event_id) = state.needs_members.take() {
        state.members_generation = state.members_generation.wrapping_add(1);
        state.members_loading = true;
        fetch::spawn_member_fetch(
            tx.clone(),
            state.source.clone(),
            state.members_generation,
            event_id,
        );
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut user_config = config::AppConfig::load();
    if cli.full_prices {
        user_config.full_prices = true;
    }

    let source_arg = cli
        .source
        .unwrap_or_else(|| user_config.server.clone());
    let source = DataSource::from_arg(&source_arg)?;
    tracing::info!(source = %source.label(), "starting");

    let mut state = AppState::new(source, user_config);
    state.year_filter = cli.year;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel::<DataUpdate>();

    // ── event loop ────────────────────────────────────────────
    loop {
        // Always render before doing any network work so the UI stays
        // responsive.  Data fills in asynchronously.
        terminal.draw(|frame| draw(frame, &mut state))?;

        // Kick off fetches AFTER the draw: the frame above already shows
        // the loading state, and results land on a later frame.
        dispatch_fetches(&mut state, &data_tx);

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => handler::handle_tick(&mut state),
                }
            }

            Some(update) = data_rx.recv() => {
                // Process the first update, then drain whatever else is
                // queued before redrawing.  Stale generations are dropped
                // inside apply_update.
                fetch::apply_update(&mut state, update);
                while let Ok(update) = data_rx.try_recv() {
                    fetch::apply_update(&mut state, update);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Some(ref url) = state.invoice_url {
        println!("{url}");
    }

    Ok(())
}
