//! API route handlers.

mod classify;
mod health;
mod tickets;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::types::ApiState;

/// Create the API router with all endpoints (unprefixed).
///
/// Collection and classify paths also answer with a trailing slash.
pub fn create_api_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_handler))
        // Classification
        .route("/tickets/classify", post(classify::classify_handler))
        .route("/tickets/classify/", post(classify::classify_handler))
        // Tickets
        .route(
            "/tickets",
            get(tickets::list_handler).post(tickets::create_handler),
        )
        .route(
            "/tickets/",
            get(tickets::list_handler).post(tickets::create_handler),
        )
        .route("/tickets/stats", get(tickets::stats_handler))
        .route("/tickets/{id}", patch(tickets::update_handler))
        .with_state(state)
}

/// Create the full application: API under `/api`, with tracing and CORS.
pub fn create_app(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", create_api_router(state))
        // Request tracing (enable with RUST_LOG=tower_http=info or higher)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
}
