//! Application orchestration — state management, event loop, and input handling.

pub mod event;
pub mod fetch;
pub mod handler;
pub mod settings;
pub mod state;
