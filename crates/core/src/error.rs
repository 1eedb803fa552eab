//! Error types for the SiemGuide domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Provider errors carry the
//! human-actionable text that ends up in an [`AssistantReply`] message, so the
//! adapter that classifies a failure also decides how it is worded.
//!
//! [`AssistantReply`]: crate::provider::AssistantReply

use thiserror::Error;

/// Result type alias for provider calls.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Every distinguishable failure class a backend can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Invalid or rejected API key.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// Provider signalled over-quota.
    #[error("{0}")]
    RateLimited(String),

    /// Hosted model is still warming up (HTTP 503 on inference endpoints).
    #[error("{0}")]
    ModelLoading(String),

    /// Request exceeded its timeout.
    #[error("{0}")]
    Timeout(String),

    /// Connection refused or unreachable host. For a local daemon this is the
    /// steady state when it is not running.
    #[error("{0}")]
    Connection(String),

    /// Any other non-success status.
    #[error("{message}")]
    ApiError { status_code: u16, message: String },

    /// 200 response whose body did not have the expected shape.
    #[error("{0}")]
    InvalidResponse(String),

    /// Unclassified transport failure.
    #[error("Error: {0}")]
    Request(String),
}

impl ProviderError {
    /// HTTP status associated with the failure, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
