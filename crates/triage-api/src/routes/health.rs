//! Health check endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::types::{ApiState, HealthResponse};

/// Handler for GET /api/health
pub async fn health_handler(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        tickets: state.tickets.len().await,
        classifier_configured: state.classifier.is_configured(),
    })
}
