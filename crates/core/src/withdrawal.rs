//! Withdrawal request status values and transition rules.
//!
//! A request starts `pending` and moves exactly once to a terminal state:
//! `approved` (funds were already deducted at request time) or `rejected`
//! (the held amount is refunded). Nothing leaves a terminal state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a withdrawal request, stored as text in `withdrawal_requests.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Administrative decision applied to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalDecision {
    Approve,
    Reject,
}

impl WithdrawalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Rejected => "rejected",
        }
    }

    /// Resolve the status a decision moves this request to.
    ///
    /// Returns `None` when the request is already terminal; callers treat
    /// that as "already processed", never as a second transition.
    pub fn apply(self, decision: WithdrawalDecision) -> Option<WithdrawalStatus> {
        match (self, decision) {
            (WithdrawalStatus::Pending, WithdrawalDecision::Approve) => {
                Some(WithdrawalStatus::Approved)
            }
            (WithdrawalStatus::Pending, WithdrawalDecision::Reject) => {
                Some(WithdrawalStatus::Rejected)
            }
            _ => None,
        }
    }
}

impl WithdrawalDecision {
    /// Whether applying this decision returns the held amount to the subject.
    pub fn refunds(self) -> bool {
        matches!(self, WithdrawalDecision::Reject)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WithdrawalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WithdrawalStatus::Pending),
            "approved" => Ok(WithdrawalStatus::Approved),
            "rejected" => Ok(WithdrawalStatus::Rejected),
            other => Err(format!(
                "Invalid withdrawal status '{other}'. Must be one of: pending, approved, rejected"
            )),
        }
    }
}
