//! Session Identifiers
//!
//! Correlates a payment attempt across the redirect boundary. Ids are
//! best-effort unique with a time-ordered prefix; they are not security
//! tokens.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix segment
const RANDOM_SEGMENT_LEN: usize = 6;

/// Last issued millisecond prefix, shared across the process
static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Unique handoff session identifier
///
/// Two segments joined by `-`: the current wall-clock milliseconds in
/// base 36, then six base-36 random characters. The prefix strictly
/// increases per call within a process, so ids never collide locally even
/// inside a single millisecond.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new session id
    pub fn generate() -> Self {
        let millis = next_millis();
        let mut rng = rand::thread_rng();
        // Drawn one character at a time so the segment is always exactly
        // RANDOM_SEGMENT_LEN long, never silently shorter.
        let suffix: String = (0..RANDOM_SEGMENT_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{}-{suffix}", to_base36(millis)))
    }

    /// Parse from string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Millisecond clock that never repeats or steps backwards within a process.
fn next_millis() -> u64 {
    #[allow(clippy::cast_sign_loss)]
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST_MILLIS.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_MILLIS.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    digits.iter().rev().collect()
}
