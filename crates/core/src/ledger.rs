//! Ledger event types and reference formatting.
//!
//! The ledger is the durable witness for "has this economic event already
//! been applied". Idempotency is keyed on the exact triple
//! `(subject_id, event_type, reference)`; references are structured values
//! compared by equality, never substrings of a free-text description.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Kind of economic event recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Direct referrer credited for a new subject. Reference: new subject id.
    ReferralLevel1,
    /// Referrer's referrer credited for a new subject. Reference: new subject id.
    ReferralLevel2,
    /// Item bought from the shop. Reference: item id.
    Purchase,
    /// Task reward claimed. Reference: task id.
    TaskReward,
    /// Lottery ticket bought. Reference: ticket id.
    LotteryTicket,
    /// Lottery pool paid to the winner. Reference: lottery id.
    LotteryPayout,
    /// Funds held when a withdrawal is requested. Reference: request id.
    WithdrawalHold,
    /// Held funds returned when a withdrawal is rejected. Reference: request id.
    WithdrawalRefund,
    /// Manual administrative correction. Not single-shot.
    Adjustment,
}

impl EventType {
    /// All event types, in declaration order.
    pub const ALL: [EventType; 9] = [
        EventType::ReferralLevel1,
        EventType::ReferralLevel2,
        EventType::Purchase,
        EventType::TaskReward,
        EventType::LotteryTicket,
        EventType::LotteryPayout,
        EventType::WithdrawalHold,
        EventType::WithdrawalRefund,
        EventType::Adjustment,
    ];

    /// The string stored in `ledger.event_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::ReferralLevel1 => "referral_level1",
            EventType::ReferralLevel2 => "referral_level2",
            EventType::Purchase => "purchase",
            EventType::TaskReward => "task_reward",
            EventType::LotteryTicket => "lottery_ticket",
            EventType::LotteryPayout => "lottery_payout",
            EventType::WithdrawalHold => "withdrawal_hold",
            EventType::WithdrawalRefund => "withdrawal_refund",
            EventType::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown ledger event type '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Maximum length of a ledger reference, matching the `ledger.reference` column.
pub const MAX_REFERENCE_LEN: usize = 128;

/// Format an entity id as a ledger reference.
pub fn reference(id: DbId) -> String {
    id.to_string()
}

/// Validate a ledger reference. Returns `Ok(())` or an error message.
pub fn validate_reference(reference: &str) -> Result<(), String> {
    if reference.is_empty() {
        return Err("Ledger reference must not be empty".to_string());
    }
    if reference.len() > MAX_REFERENCE_LEN {
        return Err(format!(
            "Ledger reference must be at most {MAX_REFERENCE_LEN} characters, got {}",
            reference.len()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
