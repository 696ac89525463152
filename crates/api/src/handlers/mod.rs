pub mod accounts;
pub mod lotteries;
pub mod referrals;
pub mod withdrawals;
