use std::str::FromStr;

use rewards_core::money::{validate_non_negative_amount, validate_positive_amount};
use rewards_core::types::Amount;
use rust_decimal::Decimal;

/// Default level-1 referral reward.
pub const DEFAULT_REFERRAL_LEVEL1_REWARD: Decimal = Decimal::from_parts(300, 0, 0, false, 2);

/// Default level-2 referral reward.
pub const DEFAULT_REFERRAL_LEVEL2_REWARD: Decimal = Decimal::from_parts(100, 0, 0, false, 2);

/// Default smallest amount a subject may withdraw.
pub const DEFAULT_MIN_WITHDRAWAL_AMOUNT: Decimal = Decimal::from_parts(100, 0, 0, false, 2);

/// Reward amounts and limits used by the processors.
#[derive(Debug, Clone)]
pub struct EconomyConfig {
    pub referral_level1_reward: Amount,
    pub referral_level2_reward: Amount,
    pub min_withdrawal_amount: Amount,
}

impl EconomyConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `REFERRAL_LEVEL1_REWARD` | `3.00`  |
    /// | `REFERRAL_LEVEL2_REWARD` | `1.00`  |
    /// | `MIN_WITHDRAWAL_AMOUNT`  | `1.00`  |
    pub fn from_env() -> Result<Self, String> {
        let referral_level1_reward =
            amount_var("REFERRAL_LEVEL1_REWARD", DEFAULT_REFERRAL_LEVEL1_REWARD)?;
        validate_non_negative_amount(referral_level1_reward)
            .map_err(|e| format!("REFERRAL_LEVEL1_REWARD: {e}"))?;

        let referral_level2_reward =
            amount_var("REFERRAL_LEVEL2_REWARD", DEFAULT_REFERRAL_LEVEL2_REWARD)?;
        validate_non_negative_amount(referral_level2_reward)
            .map_err(|e| format!("REFERRAL_LEVEL2_REWARD: {e}"))?;

        let min_withdrawal_amount =
            amount_var("MIN_WITHDRAWAL_AMOUNT", DEFAULT_MIN_WITHDRAWAL_AMOUNT)?;
        validate_positive_amount(min_withdrawal_amount)
            .map_err(|e| format!("MIN_WITHDRAWAL_AMOUNT: {e}"))?;

        Ok(Self {
            referral_level1_reward,
            referral_level2_reward,
            min_withdrawal_amount,
        })
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            referral_level1_reward: DEFAULT_REFERRAL_LEVEL1_REWARD,
            referral_level2_reward: DEFAULT_REFERRAL_LEVEL2_REWARD,
            min_withdrawal_amount: DEFAULT_MIN_WITHDRAWAL_AMOUNT,
        }
    }
}

fn amount_var(name: &str, default: Amount) -> Result<Amount, String> {
    match std::env::var(name) {
        Ok(raw) => Decimal::from_str(raw.trim())
            .map_err(|_| format!("{name} must be a decimal amount, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
