//! Referral crediting: level 1 (direct referrer) and cascading level 2.

use rewards_coordinator::Ledger;
use rewards_core::ledger::{reference, EventType};
use rewards_core::lock_keys;
use rewards_core::types::{Amount, DbId};
use rewards_db::repositories::AccountRepo;
use rewards_events::bus::kinds;
use rewards_events::EconomicEvent;
use serde::Serialize;
use sqlx::PgConnection;

use crate::{Economy, EconomyError};

/// Credit paid to the referrer's own referrer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondLevelCredit {
    pub referrer_id: DbId,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReferralOutcome {
    Credited {
        referrer_id: DbId,
        new_subject_id: DbId,
        amount: Amount,
        second_level: Option<SecondLevelCredit>,
    },
    /// This referral was credited by an earlier call.
    AlreadyCredited {
        referrer_id: DbId,
        new_subject_id: DbId,
    },
    /// The new subject already exists without this referrer.
    NotEligible {
        new_subject_id: DbId,
        reason: String,
    },
}

impl Economy {
    /// Credit the referrer of a newly joined subject, and that referrer's own
    /// referrer, exactly once per new subject.
    ///
    /// Both credits commit together or not at all. A repeated call for the
    /// same pair returns [`ReferralOutcome::AlreadyCredited`].
    pub async fn credit_referral(
        &self,
        referrer_id: DbId,
        new_subject_id: DbId,
    ) -> Result<ReferralOutcome, EconomyError> {
        if referrer_id == new_subject_id {
            return Err(EconomyError::validation("A subject cannot refer itself"));
        }

        let level1 = self.config.referral_level1_reward;
        let level2 = self.config.referral_level2_reward;

        let outcome = self
            .coordinator
            .transactional_with_lock(&lock_keys::referral_credit(new_subject_id), move |conn| {
                Box::pin(credit_referral_tx(conn, referrer_id, new_subject_id, level1, level2))
            })
            .await?;

        if let ReferralOutcome::Credited {
            amount,
            second_level,
            ..
        } = &outcome
        {
            tracing::info!(referrer_id, new_subject_id, amount = %amount, "Referral credited");
            self.notify(
                EconomicEvent::new(kinds::REFERRAL_CREDITED, referrer_id).with_payload(
                    serde_json::json!({
                        "level": 1,
                        "amount": amount,
                        "new_subject_id": new_subject_id,
                    }),
                ),
            );
            if let Some(credit) = second_level {
                self.notify(
                    EconomicEvent::new(kinds::REFERRAL_CREDITED, credit.referrer_id).with_payload(
                        serde_json::json!({
                            "level": 2,
                            "amount": credit.amount,
                            "new_subject_id": new_subject_id,
                        }),
                    ),
                );
            }
        }

        Ok(outcome)
    }
}

async fn credit_referral_tx(
    conn: &mut PgConnection,
    referrer_id: DbId,
    new_subject_id: DbId,
    level1_reward: Amount,
    level2_reward: Amount,
) -> Result<ReferralOutcome, EconomyError> {
    let referrer = AccountRepo::find_by_id(&mut *conn, referrer_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("account", referrer_id))?;

    let new_account = AccountRepo::ensure(&mut *conn, new_subject_id, Some(referrer_id)).await?;
    if new_account.referrer_id != Some(referrer_id) {
        return Ok(ReferralOutcome::NotEligible {
            new_subject_id,
            reason: format!("Subject {new_subject_id} was not referred by {referrer_id}"),
        });
    }

    let witness = reference(new_subject_id);
    if Ledger::has_event(&mut *conn, referrer_id, EventType::ReferralLevel1, &witness).await? {
        return Ok(ReferralOutcome::AlreadyCredited {
            referrer_id,
            new_subject_id,
        });
    }

    AccountRepo::credit(&mut *conn, referrer_id, level1_reward).await?;
    AccountRepo::increment_referral_count(&mut *conn, referrer_id).await?;
    Ledger::record_event(
        &mut *conn,
        referrer_id,
        EventType::ReferralLevel1,
        level1_reward,
        &witness,
    )
    .await?;

    let mut second_level = None;
    if let Some(grand_referrer) = referrer.referrer_id {
        if grand_referrer != new_subject_id
            && !level2_reward.is_zero()
            && !Ledger::has_event(&mut *conn, grand_referrer, EventType::ReferralLevel2, &witness)
                .await?
        {
            AccountRepo::credit(&mut *conn, grand_referrer, level2_reward).await?;
            Ledger::record_event(
                &mut *conn,
                grand_referrer,
                EventType::ReferralLevel2,
                level2_reward,
                &witness,
            )
            .await?;
            second_level = Some(SecondLevelCredit {
                referrer_id: grand_referrer,
                amount: level2_reward,
            });
        }
    }

    Ok(ReferralOutcome::Credited {
        referrer_id,
        new_subject_id,
        amount: level1_reward,
        second_level,
    })
}
