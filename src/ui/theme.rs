//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── tables / lists ─────────────────────────────────────────
    pub fn header_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn row_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_unfocused_style() -> Style {
        Style::default().bg(Color::Black).fg(Color::Gray)
    }

    pub fn empty_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn focused_border_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn tab_active_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    // ── inputs ─────────────────────────────────────────────────
    pub fn input_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn input_label_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn input_invalid_style() -> Style {
        Style::default().fg(Color::Red)
    }

    // ── chart ──────────────────────────────────────────────────
    pub fn bar_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn bar_value_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn link_style() -> Style {
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED)
    }
}
