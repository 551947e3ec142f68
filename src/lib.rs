//! Library entry for finscope: the table engine, data services and the TUI runtime.
//!
//! The binary in `main.rs` wires these together; integration tests drive the engine and the
//! services directly.

pub mod app;
pub mod args;
pub mod chart;
pub mod config;
pub mod engine;
pub mod events;
pub mod sources;
pub mod state;
pub mod ui;
pub mod util;
