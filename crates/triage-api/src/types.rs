//! API types and DTOs.

use serde::{Deserialize, Serialize};
use triage_classifier::Classifier;

use crate::store::TicketStore;

/// Shared application state for the API.
pub struct ApiState {
    /// In-memory ticket storage.
    pub tickets: TicketStore,
    /// Classifier used by the classify endpoint and ticket creation.
    pub classifier: Classifier,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Number of stored tickets.
    pub tickets: usize,
    /// Whether a provider credential is currently available.
    pub classifier_configured: bool,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
