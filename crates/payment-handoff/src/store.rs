//! Return Slot Storage
//!
//! Abstraction over the origin-scoped key-value store that survives the
//! redirect boundary. There is exactly one pending-return slot: a new
//! payment attempt overwrites any unconsumed prior value, last writer wins.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{HandoffError, Result};
use crate::state::PaymentAttempt;

/// Storage key for the pending return target
pub const RETURN_KEY: &str = "payment_return_url";

/// Storage key for the attempt record
pub const ATTEMPT_KEY: &str = "payment_attempt";

/// The persistent slot shared by every browsing context on the origin.
///
/// Absence of a value is the canonical "no pending return" state and must
/// never be reported as an error.
pub trait ReturnStore: Send + Sync {
    /// Write the pending return slot, overwriting any prior value.
    fn put_return(&self, return_to: &str) -> Result<()>;

    /// Take and clear the pending return slot in one step.
    ///
    /// Implementations should make the read-and-delete atomic where the
    /// backend offers a primitive for it, so that concurrent resumes hand
    /// the value to at most one caller. A backend without such a primitive
    /// leaves a narrow window where two near-simultaneous callers both
    /// observe the value before either deletes it, and must document that.
    fn take_return(&self) -> Result<Option<String>>;

    /// Read the slot without consuming it. Diagnostic use only; the resume
    /// path must go through [`take_return`](Self::take_return).
    fn peek_return(&self) -> Result<Option<String>>;

    /// Save the attempt record next to the return slot.
    fn save_attempt(&self, attempt: &PaymentAttempt) -> Result<()>;

    /// Load the attempt record, if any. Freshness is the caller's concern.
    fn load_attempt(&self) -> Result<Option<PaymentAttempt>>;

    /// Drop the attempt record.
    fn clear_attempt(&self) -> Result<()>;
}

/// In-memory store (for development and tests)
///
/// Values are kept as JSON strings under the same keys a browser-backed
/// store would use. `take_return` removes under a single write lock, so
/// here the consume really is atomic.
pub struct MemoryReturnStore {
    slots: RwLock<HashMap<String, String>>,
}

impl Default for MemoryReturnStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryReturnStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl ReturnStore for MemoryReturnStore {
    fn put_return(&self, return_to: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| HandoffError::Storage("store lock poisoned".into()))?;
        slots.insert(RETURN_KEY.to_string(), return_to.to_string());
        Ok(())
    }

    fn take_return(&self) -> Result<Option<String>> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| HandoffError::Storage("store lock poisoned".into()))?;
        Ok(slots.remove(RETURN_KEY))
    }

    fn peek_return(&self) -> Result<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| HandoffError::Storage("store lock poisoned".into()))?;
        Ok(slots.get(RETURN_KEY).cloned())
    }

    fn save_attempt(&self, attempt: &PaymentAttempt) -> Result<()> {
        let encoded = serde_json::to_string(attempt)
            .map_err(|e| HandoffError::Storage(e.to_string()))?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| HandoffError::Storage("store lock poisoned".into()))?;
        slots.insert(ATTEMPT_KEY.to_string(), encoded);
        Ok(())
    }

    fn load_attempt(&self) -> Result<Option<PaymentAttempt>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| HandoffError::Storage("store lock poisoned".into()))?;
        match slots.get(ATTEMPT_KEY) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| HandoffError::Storage(e.to_string())),
            None => Ok(None),
        }
    }

    fn clear_attempt(&self) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| HandoffError::Storage("store lock poisoned".into()))?;
        slots.remove(ATTEMPT_KEY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_id::SessionId;
    use std::sync::Arc;

    #[test]
    fn test_empty_slot_reads_none() {
        let store = MemoryReturnStore::new();
        assert_eq!(store.peek_return().unwrap(), None);
        assert_eq!(store.take_return().unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryReturnStore::new();
        store.put_return("/first").unwrap();
        store.put_return("/second").unwrap();
        assert_eq!(store.take_return().unwrap(), Some("/second".into()));
    }

    #[test]
    fn test_take_consumes() {
        let store = MemoryReturnStore::new();
        store.put_return("/checkout/success").unwrap();
        assert_eq!(
            store.take_return().unwrap(),
            Some("/checkout/success".into())
        );
        assert_eq!(store.take_return().unwrap(), None);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let store = MemoryReturnStore::new();
        store.put_return("/x").unwrap();
        assert_eq!(store.peek_return().unwrap(), Some("/x".into()));
        assert_eq!(store.peek_return().unwrap(), Some("/x".into()));
    }

    #[test]
    fn test_attempt_round_trip_and_clear() {
        let store = MemoryReturnStore::new();
        assert_eq!(store.load_attempt().unwrap(), None);

        let attempt = PaymentAttempt::new(SessionId::generate());
        store.save_attempt(&attempt).unwrap();
        assert_eq!(store.load_attempt().unwrap(), Some(attempt));

        store.clear_attempt().unwrap();
        assert_eq!(store.load_attempt().unwrap(), None);
    }

    #[test]
    fn test_concurrent_take_hands_value_to_one_caller() {
        let store = Arc::new(MemoryReturnStore::new());
        store.put_return("/only-once").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.take_return().unwrap())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Option::is_some)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.take_return().unwrap(), None);
    }
}
