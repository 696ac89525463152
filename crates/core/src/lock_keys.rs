//! Lock key builders and lease duration constants.
//!
//! Every compound read-check-write sequence is guarded by a named lease in
//! the shared store. Keys are scoped to the narrowest contended resource:
//! a key that is too broad serializes unrelated work, one that is too narrow
//! fails to exclude the racing writer. Building keys here keeps every
//! instance of the service agreeing on the exact same names.

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Lease duration constants
// ---------------------------------------------------------------------------

/// Default lease TTL in milliseconds (10 seconds).
pub const DEFAULT_LOCK_TTL_MS: u64 = 10_000;

/// Minimum accepted lease TTL in milliseconds.
pub const MIN_LOCK_TTL_MS: u64 = 100;

/// Maximum accepted lease TTL in milliseconds (5 minutes).
pub const MAX_LOCK_TTL_MS: u64 = 300_000;

/// Default interval between expired-lease housekeeping passes (in seconds).
pub const DEFAULT_LOCK_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Maximum length of a lock key, matching the `locks.lock_key` column.
pub const MAX_LOCK_KEY_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Key prefixes
// ---------------------------------------------------------------------------

/// Known lock key prefixes.
pub mod prefixes {
    pub const REFERRAL_CREDIT: &str = "referral-credit";
    pub const PURCHASE: &str = "purchase";
    pub const PROFILE: &str = "profile";
    pub const LOTTERY_DRAW: &str = "lottery-draw";
    pub const WITHDRAWAL: &str = "withdrawal";
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Guards crediting the referrers of a newly joined subject.
pub fn referral_credit(new_subject_id: DbId) -> String {
    format!("{}:{new_subject_id}", prefixes::REFERRAL_CREDIT)
}

/// Guards the balance check and ownership insert of one item purchase.
pub fn purchase(subject_id: DbId, item_id: DbId) -> String {
    format!("{}:{subject_id}:{item_id}", prefixes::PURCHASE)
}

/// Guards compound mutations of a subject's own account (e.g. withdrawal holds).
pub fn profile(subject_id: DbId) -> String {
    format!("{}:{subject_id}", prefixes::PROFILE)
}

/// Guards a lottery's participant set, pool and `active` flag.
///
/// Ticket sales take the same key as the draw so the participant set
/// cannot grow between the check and the draw.
pub fn lottery_draw(lottery_id: DbId) -> String {
    format!("{}:{lottery_id}", prefixes::LOTTERY_DRAW)
}

/// Guards the status transition of one withdrawal request.
pub fn withdrawal(request_id: DbId) -> String {
    format!("{}:{request_id}", prefixes::WITHDRAWAL)
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate a lease TTL in milliseconds. Returns `Ok(())` or an error message.
pub fn validate_lock_ttl_ms(ttl_ms: u64) -> Result<(), String> {
    if ttl_ms < MIN_LOCK_TTL_MS {
        return Err(format!(
            "Lock TTL must be at least {MIN_LOCK_TTL_MS} ms, got {ttl_ms}"
        ));
    }
    if ttl_ms > MAX_LOCK_TTL_MS {
        return Err(format!(
            "Lock TTL must be at most {MAX_LOCK_TTL_MS} ms, got {ttl_ms}"
        ));
    }
    Ok(())
}

/// Validate a raw lock key supplied by a caller.
pub fn validate_lock_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("Lock key must not be empty".to_string());
    }
    if key.len() > MAX_LOCK_KEY_LEN {
        return Err(format!(
            "Lock key must be at most {MAX_LOCK_KEY_LEN} characters, got {}",
            key.len()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_to_the_contended_resource() {
        assert_eq!(referral_credit(99), "referral-credit:99");
        assert_eq!(purchase(42, 7), "purchase:42:7");
        assert_eq!(profile(42), "profile:42");
        assert_eq!(lottery_draw(3), "lottery-draw:3");
        assert_eq!(withdrawal(15), "withdrawal:15");
    }

    #[test]
    fn purchase_keys_differ_per_item() {
        assert_ne!(purchase(42, 1), purchase(42, 2));
        assert_ne!(purchase(1, 42), purchase(42, 1));
    }

    #[test]
    fn ttl_bounds_are_enforced() {
        assert!(validate_lock_ttl_ms(DEFAULT_LOCK_TTL_MS).is_ok());
        assert!(validate_lock_ttl_ms(MIN_LOCK_TTL_MS).is_ok());
        assert!(validate_lock_ttl_ms(MAX_LOCK_TTL_MS).is_ok());
        assert!(validate_lock_ttl_ms(MIN_LOCK_TTL_MS - 1)
            .unwrap_err()
            .contains("at least"));
        assert!(validate_lock_ttl_ms(MAX_LOCK_TTL_MS + 1)
            .unwrap_err()
            .contains("at most"));
    }

    #[test]
    fn empty_and_oversized_keys_rejected() {
        assert!(validate_lock_key("").is_err());
        assert!(validate_lock_key("   ").is_err());
        assert!(validate_lock_key(&"k".repeat(MAX_LOCK_KEY_LEN + 1)).is_err());
        assert!(validate_lock_key("profile:1").is_ok());
    }
}
