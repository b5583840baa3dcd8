//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Toggle {
        label: "Full Prices",
        get: |s| s.config.full_prices,
        set: |s, v| {
            s.config.full_prices = v;
            let _ = s.config.save();
            s.status_message = Some(
                if v {
                    "Showing non-member prices".into()
                } else {
                    "Showing member prices".into()
                },
            );
        },
    },
    SettingsItem::Cycle {
        label: "Chart Metric",
        value: |s| s.metric.label().to_string(),
        cycle: |s| {
            s.metric = s.metric.toggled();
            s.status_message = Some(format!("Chart metric: {}", s.metric.label()));
        },
    },
    SettingsItem::Cycle {
        label: "Double-click Window",
        value: |s| format!("{}ms", s.config.double_click_ms),
        cycle: |s| {
            const WINDOWS: &[u64] = &[150, 200, 250, 300, 400, 500];
            let current = s.config.double_click_ms;
            let idx = WINDOWS.iter().position(|&w| w == current).unwrap_or(2);
            let next = WINDOWS[(idx + 1) % WINDOWS.len()];
            s.config.double_click_ms = next;
            let _ = s.config.save();
            s.status_message = Some(format!("Double-click window: {}ms", next));
        },
    },
];
