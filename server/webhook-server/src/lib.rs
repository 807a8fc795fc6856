//! PushTest Webhook Server
//!
//! HTTP service that receives push webhooks and, for every modified
//! .js/.py/.java file, generates a unit test suite, runs it through the test
//! harness, and reports the verdict by email.

pub mod config;
pub mod error;
pub mod github;
pub mod handlers;
pub mod notify;
pub mod pipeline;
pub mod state;
pub mod synth;
pub mod types;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use handlers::{health, webhook};
pub use pipeline::{Pipeline, PushReport};
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(health))
    .route("/api/webhook", post(webhook))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
