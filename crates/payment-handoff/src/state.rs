//! Payment Attempt State
//!
//! Persisted record of an in-flight payment attempt, kept next to the
//! pending return slot so the host application can correlate what comes
//! back with what it sent out.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::session_id::SessionId;

/// Attempts older than this are considered abandoned and ignored on read.
pub const ATTEMPT_TTL_MINUTES: i64 = 30;

/// Where the attempt stands, as far as the host knows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

/// A persisted payment attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAttempt {
    /// Id correlating this attempt across the redirect boundary
    pub session_id: SessionId,

    /// Current status
    pub status: AttemptStatus,

    /// When the external surface was (about to be) opened
    pub started_at: DateTime<Utc>,
}

impl PaymentAttempt {
    /// Create a new pending attempt
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            status: AttemptStatus::Pending,
            started_at: Utc::now(),
        }
    }

    /// Update the status in place
    pub fn set_status(&mut self, status: AttemptStatus) {
        self.status = status;
    }

    /// Whether the attempt is still within its freshness window.
    ///
    /// The external surface gives no completion signal, so age is the only
    /// way to tell a live attempt from an abandoned one.
    pub fn is_fresh(&self) -> bool {
        Utc::now() - self.started_at < Duration::minutes(ATTEMPT_TTL_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attempt_is_pending_and_fresh() {
        let attempt = PaymentAttempt::new(SessionId::generate());
        assert_eq!(attempt.status, AttemptStatus::Pending);
        assert!(attempt.is_fresh());
    }

    #[test]
    fn test_stale_attempt() {
        let mut attempt = PaymentAttempt::new(SessionId::generate());
        attempt.started_at = Utc::now() - Duration::minutes(ATTEMPT_TTL_MINUTES + 1);
        assert!(!attempt.is_fresh());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AttemptStatus::Succeeded).unwrap();
        assert_eq!(json, "\"succeeded\"");
    }
}
