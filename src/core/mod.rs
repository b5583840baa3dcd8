//! Core domain logic — date handling, the row-filter pipeline, order
//! ingestion, pricing and chart shaping.
//!
//! Nothing in this module depends on any TUI or rendering crate.
//! Every type is `Send + Sync` so it can be shared across async tasks.

pub mod date;
pub mod debounce;
pub mod export;
pub mod filter;
pub mod orders;
pub mod pricing;
pub mod stats;
