//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept any `PgExecutor` (the pool, or a connection inside a transaction)
//! as the first argument.

pub mod account_repo;
pub mod ledger_repo;
pub mod lock_repo;
pub mod lottery_repo;
pub mod shop_repo;
pub mod task_repo;
pub mod withdrawal_repo;

pub use account_repo::AccountRepo;
pub use ledger_repo::LedgerRepo;
pub use lock_repo::LockRepo;
pub use lottery_repo::{LotteryRepo, LotteryTicketRepo};
pub use shop_repo::{ItemRepo, PurchasedItemRepo};
pub use task_repo::{TaskCompletionRepo, TaskRepo};
pub use withdrawal_repo::WithdrawalRepo;
