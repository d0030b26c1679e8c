use std::{sync::Arc, time::Duration};

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use configs::AssetsConfig;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::ContactRepository;

use crate::metrics;

pub mod contacts;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub contacts: Arc<dyn ContactRepository>,
    pub delete_delay: Duration,
}

impl ServerState {
    pub fn new(contacts: Arc<dyn ContactRepository>, delete_delay: Duration) -> Self {
        Self { contacts, delete_delay }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: pages, contact mutations, static assets, ops endpoints
pub fn build_router(state: ServerState, assets: &AssetsConfig) -> Router {
    let pages = Router::new()
        .route("/", get(contacts::index))
        .route("/contacts", post(contacts::create))
        .route("/contacts/:id", delete(contacts::remove));

    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler));

    pages
        .merge(ops)
        .nest_service("/images", ServeDir::new(&assets.images_dir))
        .nest_service("/css", ServeDir::new(&assets.css_dir))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
