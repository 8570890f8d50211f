//! CLI command handlers

pub mod commands;

pub use commands::{draw, inspect, note, render_error, run_session, session};
