//! Row models and DTOs, one module per table family.

pub mod account;
pub mod ledger;
pub mod lock;
pub mod lottery;
pub mod shop;
pub mod task;
pub mod withdrawal;
