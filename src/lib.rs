//! Image Studio Gateway
//!
//! An HTTP gateway that turns three hosted models (an image classifier, a
//! text generator and an image synthesizer) into analyze, generate and
//! transform endpoints, and serves the browser front end.

pub mod api;
pub mod config;
pub mod error;
pub mod inference;
pub mod middleware;
pub mod prompt;

pub use error::{AppError, Result};

use inference::ModelRunner;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub models: ModelRunner,
}

impl AppState {
    pub fn new(settings: config::Settings, models: ModelRunner) -> Self {
        Self { settings, models }
    }
}
