use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure reported by a forge while listing or archiving.
///
/// Per-repository archive failures are carried in an outcome rather than
/// returned, so every variant here must be cheap to keep around.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The forge answered with an error status.
    #[error("API error: {message}")]
    Api { message: String },

    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    /// Missing, expired, or under-scoped token.
    #[error("Authentication required")]
    AuthRequired,

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The request never got an answer.
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True when the token itself was rejected, as opposed to a request.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

/// First line of an error's display text.
///
/// Octocrab errors carry multi-line bodies that swamp a per-repository
/// failure line.
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    match full.lines().next() {
        Some(first) => first.to_string(),
        None => full,
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
