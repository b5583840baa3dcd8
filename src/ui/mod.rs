//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into pixels on
//! the terminal.  No network I/O happens here.

pub mod date_picker;
pub mod filter_bar;
pub mod input;
pub mod layout;
pub mod members;
pub mod order_table;
pub mod popup;
pub mod spinner;
pub mod stats;
pub mod theme;
