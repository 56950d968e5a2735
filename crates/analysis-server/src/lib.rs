//! Analysis Server Library
//!
//! Router, handlers and configuration for the HTTP front end of
//! `chess-analysis`. The binary in `main.rs` only wires these together.

pub mod api;
pub mod config;
pub mod middleware;

use axum::routing::{get, post};
use axum::Router;
use chess_analysis::{AnalysisService, EngineLauncher, ProcessLauncher};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers.
pub struct AppState<L = ProcessLauncher> {
    /// Runs one engine per request.
    pub service: Arc<AnalysisService<L>>,
    /// Depth used when a request does not name one.
    pub default_depth: u32,
}

impl<L> AppState<L> {
    pub fn new(service: AnalysisService<L>, default_depth: u32) -> Self {
        Self {
            service: Arc::new(service),
            default_depth,
        }
    }
}

impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            default_depth: self.default_depth,
        }
    }
}

/// Builds the application router.
pub fn app<L: EngineLauncher + 'static>(state: AppState<L>) -> Router {
    // Browser front ends are served from other origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health::<L>))
        .route("/analyze", post(api::analyze::analyze::<L>))
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::timing_layer))
        .layer(cors)
}
