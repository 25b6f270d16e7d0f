//! Error types for canvas access

use crate::item::ItemId;

/// Errors surfaced by [`RemoteCanvas`](crate::RemoteCanvas) implementations
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// Transport-level failure (connection, TLS, timeout)
    #[error("transport failure: {0}")]
    Transport(String),

    /// Platform rejected the request
    #[error("api error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        message: String,
    },

    /// Referenced item does not exist on the board
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// Response body could not be decoded
    #[error("decode failure: {0}")]
    Decode(String),
}

impl CanvasError {
    /// Whether this error means the target item is gone
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for CanvasError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status() {
        let err = CanvasError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_carries_id() {
        let err = CanvasError::NotFound(ItemId::new("abc"));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("abc"));
    }
}
