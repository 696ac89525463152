use std::time::Duration;

use rewards_core::lock_keys::{validate_lock_ttl_ms, DEFAULT_LOCK_TTL_MS};

use crate::instance::generate_instance_id;

/// Coordinator configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Prefix of every lease holder id taken by this process.
    pub instance_id: String,
    /// Lease TTL used when a caller does not pass one.
    pub lock_ttl: Duration,
}

impl CoordinatorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var       | Default                   |
    /// |---------------|---------------------------|
    /// | `INSTANCE_ID` | generated `{pid}-{uuid}`  |
    /// | `LOCK_TTL_MS` | `10000`                   |
    pub fn from_env() -> Result<Self, String> {
        let instance_id = std::env::var("INSTANCE_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(generate_instance_id);

        let lock_ttl_ms: u64 = match std::env::var("LOCK_TTL_MS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("LOCK_TTL_MS must be a valid u64, got '{raw}'"))?,
            Err(_) => DEFAULT_LOCK_TTL_MS,
        };
        validate_lock_ttl_ms(lock_ttl_ms).map_err(|e| format!("LOCK_TTL_MS: {e}"))?;

        Ok(Self {
            instance_id,
            lock_ttl: Duration::from_millis(lock_ttl_ms),
        })
    }

    /// Configuration with a fresh instance id and the given TTL.
    pub fn with_ttl(lock_ttl: Duration) -> Self {
        Self {
            instance_id: generate_instance_id(),
            lock_ttl,
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::with_ttl(Duration::from_millis(DEFAULT_LOCK_TTL_MS))
    }
}
