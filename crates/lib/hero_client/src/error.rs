//! Client error types.

use thiserror::Error;

use crate::types::ApiEnvelope;

/// Convenience alias for client operation results.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the Hero client stack.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection, DNS, timeout).
    /// Never retried and never triggers a token refresh.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a failure status or a failure envelope.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A success response that violates the wire contract.
    #[error("Malformed response: {0}")]
    BadResponse(String),

    /// The refresh path failed and the session was force-closed. Every
    /// request queued behind the failed refresh carries the same cause.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Request body serialization failed.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Access token decoding failed.
    #[error(transparent)]
    Token(#[from] hero_core::auth::AuthError),
}

impl ClientError {
    /// The HTTP status carried by this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error is an HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Turn a failure response into an [`ClientError::Api`], pulling the message
/// out of the response envelope when the body carries one.
pub(crate) async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
        .ok()
        .and_then(|envelope| envelope.message.or(envelope.error_code))
        .unwrap_or(body);
    ClientError::Api { status, message }
}
