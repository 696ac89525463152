//! Shared domain types for the rewards economy.
//!
//! This crate has zero internal dependencies so that the repository layer,
//! the mutation coordinator, the processors and the HTTP surface can all
//! agree on ids, money, lock keys, ledger event types and state machines.

pub mod error;
pub mod ledger;
pub mod lock_keys;
pub mod lottery;
pub mod money;
pub mod types;
pub mod withdrawal;
