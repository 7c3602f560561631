//! # One-Time-Passcode Store
//!
//! A process-local key-value store for login passcodes, keyed by email
//! address. Codes are single-use and expire after a TTL; `take` consumes the
//! entry so a verified code can never be replayed. The store is an explicit
//! value handed into the request-handling path, which keeps the expiry and
//! consumption semantics testable independently of the transport layer.

use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    expires_at: Instant,
}

/// Shared in-memory passcode store.
#[derive(Debug, Clone, Default)]
pub struct OtpStore {
    entries: Arc<Mutex<HashMap<String, OtpEntry>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a code for `key`, replacing any previous one.
    pub async fn put(&self, key: &str, code: &str, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            OtpEntry {
                code: code.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Removes and returns the code for `key`, or `None` when absent or
    /// expired. The entry is consumed either way.
    pub async fn take(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        let entry = entries.remove(key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.code)
    }
}

/// Generates a six-digit numeric login code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000))
}
