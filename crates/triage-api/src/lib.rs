//! REST API service for ticket tracking and classification.
//!
//! ## Endpoints
//!
//! All routes are mounted under `/api` by [`create_app`].
//!
//! - `GET /api/health` - Health check with ticket count
//! - `POST /api/tickets/classify` - Suggest a category and priority for a description
//! - `GET /api/tickets` - List tickets (`category`, `priority`, `status`, `search` filters)
//! - `POST /api/tickets` - Create a ticket, classifying it when category or priority is omitted
//! - `PATCH /api/tickets/{id}` - Partially update a ticket
//! - `GET /api/tickets/stats` - Aggregate statistics
//!
//! Errors are returned as `{"error": "<message>"}`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use triage_api::{create_api_state, create_app};
//! use triage_classifier::{Classifier, ClassifierConfig};
//!
//! let classifier = Classifier::from_config(ClassifierConfig::default());
//! let app = create_app(create_api_state(classifier));
//! ```

mod error;
mod routes;
mod store;
mod types;

pub use error::ApiError;
pub use routes::{create_api_router, create_app};
pub use store::TicketStore;
pub use types::{ApiState, ErrorResponse, HealthResponse};

use std::sync::Arc;

use triage_classifier::Classifier;

/// Create API state with an empty ticket store.
pub fn create_api_state(classifier: Classifier) -> Arc<ApiState> {
    Arc::new(ApiState {
        tickets: TicketStore::new(),
        classifier,
    })
}
