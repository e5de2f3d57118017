use std::fmt;

use async_trait::async_trait;

use crate::core::post::{Post, PostCreate, PostId};

/// Fallback shown when the server could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: could not reach the server";

/// Errors that can occur talking to the board backend.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout.
    Network(String),
    /// The server answered with `success: false` or a non-2xx status.
    /// Carries the server's message when it sent one.
    Rejected(Option<String>),
    /// The response body could not be understood.
    Parse(String),
}

impl TransportError {
    /// The message to surface to the user. Server-provided text wins; network
    /// failures get a generic message; everything else uses `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            TransportError::Rejected(Some(msg)) if !msg.trim().is_empty() => msg.clone(),
            TransportError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Rejected(Some(msg)) => write!(f, "rejected by server: {msg}"),
            TransportError::Rejected(None) => write!(f, "rejected by server"),
            TransportError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// The backend the board talks to. Implementations own all persistence.
#[async_trait]
pub trait PostTransport: Send + Sync {
    /// Fetches the full flat post collection.
    async fn get_posts(&self) -> Result<Vec<Post>, TransportError>;

    /// Creates a top-level post and returns it as stored.
    async fn create_post(&self, payload: &PostCreate) -> Result<Post, TransportError>;

    /// Creates a reply under `parent_id` and returns it as stored.
    async fn create_reply(
        &self,
        parent_id: &PostId,
        payload: &PostCreate,
    ) -> Result<Post, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = TransportError::Rejected(Some("Content too long".into()));
        assert_eq!(err.user_message("Failed to create post"), "Content too long");
    }

    #[test]
    fn test_user_message_falls_back() {
        assert_eq!(
            TransportError::Rejected(None).user_message("Failed to create post"),
            "Failed to create post"
        );
        assert_eq!(
            TransportError::Rejected(Some("  ".into())).user_message("Failed to post reply"),
            "Failed to post reply"
        );
        assert_eq!(
            TransportError::Parse("eof".into()).user_message("Failed to load posts"),
            "Failed to load posts"
        );
    }

    #[test]
    fn test_network_errors_use_generic_message() {
        let err = TransportError::Network("connection refused".into());
        assert_eq!(err.user_message("Failed to load posts"), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
