//! Error types for the classification pipeline.

use thiserror::Error;

/// The caller sent a request the classifier cannot work with.
///
/// These are surfaced to the caller; no remote call has been made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request body was not a JSON object.
    #[error("Invalid request format. Expected a JSON object with a 'description' field.")]
    InvalidFormat,

    /// `description` was missing, empty, or not a string.
    #[error("Description is required")]
    DescriptionRequired,
}

/// Anything that went wrong after the remote call was attempted.
///
/// Never reaches the caller of [`crate::Classifier::classify`]; it is logged
/// and replaced by the fallback classification.
#[derive(Debug, Error)]
pub enum RemoteFailure {
    /// Building the HTTP client failed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, TLS, timeout, or body decoding error.
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The completion carried no choice or an empty message.
    #[error("completion response contained no message")]
    EmptyReply,

    /// The reply text was not valid JSON.
    #[error("reply is not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),

    /// The reply parsed, but not as a JSON object.
    #[error("reply is not a JSON object")]
    NotAnObject,
}

impl RemoteFailure {
    /// Short machine-readable label, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteFailure::Client(_) => "client",
            RemoteFailure::Transport(_) => "transport",
            RemoteFailure::Status { .. } => "status",
            RemoteFailure::EmptyReply => "empty_reply",
            RemoteFailure::MalformedReply(_) => "malformed_reply",
            RemoteFailure::NotAnObject => "not_an_object",
        }
    }
}
