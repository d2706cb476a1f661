//! Classification endpoint.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::debug;
use triage_classifier::ValidationError;
use triage_core::Classification;

use crate::error::ApiError;
use crate::types::ApiState;

/// Handler for POST /api/tickets/classify
///
/// The body is read raw so that anything other than a JSON object (including
/// text that is not JSON at all) gets the same 400 message.
pub async fn classify_handler(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<Classification>, ApiError> {
    let value: Value =
        serde_json::from_slice(&body).map_err(|_| ValidationError::InvalidFormat)?;
    let classification = state.classifier.classify_value(&value).await?;
    debug!(
        category = %classification.category,
        priority = %classification.priority,
        "classify request served"
    );
    Ok(Json(classification))
}
