//! Handoff Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, HandoffError>;

/// Handoff-related errors
///
/// A blocked popup is deliberately not in this list: the platform refusing to
/// open a surface is a normal outcome, reported through
/// [`SurfaceStatus::Blocked`](crate::SurfaceStatus).
#[derive(Error, Debug)]
pub enum HandoffError {
    /// Caller supplied an empty or unusable URL
    #[error("Malformed target: {0}")]
    MalformedTarget(String),

    /// Persistent storage read/write failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl HandoffError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, HandoffError::Storage(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            HandoffError::MalformedTarget(_) => "The payment page address is invalid.",
            HandoffError::Storage(_) => {
                "We couldn't save your place. You can still continue to payment."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_is_retryable() {
        assert!(HandoffError::Storage("quota".into()).is_retryable());
        assert!(!HandoffError::MalformedTarget("empty".into()).is_retryable());
    }
}
