/// Session Token Store
///
/// In-memory registry of active bearer tokens and their expiry.
/// Tokens are:
/// - 16 bytes from the operating system CSPRNG, hex-encoded (32 chars)
/// - Valid for a fixed 24 hours from registration, no sliding refresh
/// - Evicted lazily: an expired entry is only removed when it is validated
/// - Lost on restart, nothing is persisted

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

const TOKEN_BYTES: usize = 16;

/// Lifetime of a session token
pub fn token_ttl() -> Duration {
    Duration::hours(24)
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct TokenStore {
    tokens: RwLock<HashMap<String, DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Generate a fresh token. Does not register it.
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Register `token` with expiry now + 24h, overwriting any existing entry.
    pub fn add(&self, token: &str) {
        let expires_at = self.clock.now() + token_ttl();
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), expires_at);
    }

    /// Check that `token` is present and not past its expiry.
    ///
    /// An expired entry is removed here, so the whole call runs under the
    /// write lock.
    pub fn validate(&self, token: &str) -> bool {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);

        let expires_at = match tokens.get(token) {
            Some(expires_at) => *expires_at,
            None => return false,
        };

        if self.clock.now() > expires_at {
            tokens.remove(token);
            tracing::debug!("Evicted expired session token");
            return false;
        }

        true
    }

    /// Revoke `token`. No-op when absent.
    pub fn remove(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }

    /// Number of occupied slots, expired-but-unqueried entries included.
    pub fn len(&self) -> usize {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
