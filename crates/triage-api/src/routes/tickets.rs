//! Ticket CRUD and statistics endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::info;
use triage_core::{Classification, NewTicket, Ticket, TicketFilter, TicketPatch, TicketStats};

use crate::error::ApiError;
use crate::types::ApiState;

/// Query parameters for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Case-insensitive substring of title or description.
    #[serde(default)]
    pub search: Option<String>,
}

/// GET /api/tickets - List tickets, newest first.
pub async fn list_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let filter = TicketFilter::parse(
        query.category.as_deref(),
        query.priority.as_deref(),
        query.status.as_deref(),
        query.search.as_deref(),
    )?;
    Ok(Json(state.tickets.list(&filter).await))
}

/// POST /api/tickets - Create a ticket.
///
/// Category and priority left out of the body are filled in by the
/// classifier. Classification failures never block creation.
pub async fn create_handler(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let input: NewTicket = decode(&body)?;
    input.validate()?;

    let classification = if input.needs_classification() {
        state.classifier.classify(&input.description).await?
    } else {
        // both fields supplied; nothing is taken from here
        Classification::FALLBACK
    };

    let ticket = state.tickets.insert(input, classification).await?;
    info!(
        id = ticket.id,
        category = %ticket.category,
        priority = %ticket.priority,
        "ticket created"
    );
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// PATCH /api/tickets/{id} - Partially update a ticket.
pub async fn update_handler(
    State(state): State<Arc<ApiState>>,
    id: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Ticket>, ApiError> {
    let Path(id) = id?;
    let patch: TicketPatch = decode(&body)?;
    let ticket = state.tickets.update(id, patch).await?;
    info!(id, status = %ticket.status, "ticket updated");
    Ok(Json(ticket))
}

/// GET /api/tickets/stats - Aggregate statistics.
pub async fn stats_handler(State(state): State<Arc<ApiState>>) -> Json<TicketStats> {
    Json(state.tickets.stats().await)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid body: {e}")))
}
