//! QuizNote API Server module
//!
//! Exposes the upload → draw → note → download flow over HTTP.
//! Run with `quiznote-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
