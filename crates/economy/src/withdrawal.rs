//! Withdrawal requests and their approve/reject state machine.
//!
//! Funds leave the balance when the request is made. Approval only moves
//! the request to `approved`; rejection moves it to `rejected` and refunds
//! the exact held amount. Only a `pending` request transitions, so the
//! refund can never run twice.

use rewards_coordinator::Ledger;
use rewards_core::error::CoreError;
use rewards_core::ledger::{reference, EventType};
use rewards_core::lock_keys;
use rewards_core::money::validate_positive_amount;
use rewards_core::types::{Amount, DbId};
use rewards_core::withdrawal::{WithdrawalDecision, WithdrawalStatus};
use rewards_db::models::withdrawal::WithdrawalRequest;
use rewards_db::repositories::{AccountRepo, WithdrawalRepo};
use rewards_events::bus::kinds;
use rewards_events::EconomicEvent;
use serde::Serialize;
use sqlx::PgConnection;

use crate::{Economy, EconomyError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WithdrawalOutcome {
    Approved {
        request_id: DbId,
        subject_id: DbId,
        amount: Amount,
    },
    Rejected {
        request_id: DbId,
        subject_id: DbId,
        refunded: Amount,
    },
    /// The request had already left `pending`; nothing changed.
    AlreadyProcessed {
        request_id: DbId,
        status: WithdrawalStatus,
    },
}

impl Economy {
    /// Open a `pending` request, holding `amount` from the balance.
    pub async fn request_withdrawal(
        &self,
        subject_id: DbId,
        amount: Amount,
    ) -> Result<WithdrawalRequest, EconomyError> {
        validate_positive_amount(amount).map_err(EconomyError::validation)?;
        let minimum = self.config.min_withdrawal_amount;
        if amount < minimum {
            return Err(EconomyError::validation(format!(
                "Withdrawal amount {amount} is below the minimum of {minimum}"
            )));
        }

        let request = self
            .coordinator
            .transactional_with_lock(&lock_keys::profile(subject_id), move |conn| {
                Box::pin(request_tx(conn, subject_id, amount))
            })
            .await?;

        tracing::info!(
            request_id = request.id,
            subject_id,
            amount = %amount,
            "Withdrawal requested"
        );
        self.notify(
            EconomicEvent::new(kinds::WITHDRAWAL_REQUESTED, subject_id)
                .with_payload(serde_json::json!({ "request_id": request.id, "amount": amount })),
        );

        Ok(request)
    }

    pub async fn approve_withdrawal(
        &self,
        request_id: DbId,
    ) -> Result<WithdrawalOutcome, EconomyError> {
        self.decide_withdrawal(request_id, WithdrawalDecision::Approve)
            .await
    }

    pub async fn reject_withdrawal(
        &self,
        request_id: DbId,
    ) -> Result<WithdrawalOutcome, EconomyError> {
        self.decide_withdrawal(request_id, WithdrawalDecision::Reject)
            .await
    }

    async fn decide_withdrawal(
        &self,
        request_id: DbId,
        decision: WithdrawalDecision,
    ) -> Result<WithdrawalOutcome, EconomyError> {
        let outcome = self
            .coordinator
            .transactional_with_lock(&lock_keys::withdrawal(request_id), move |conn| {
                Box::pin(decide_tx(conn, request_id, decision))
            })
            .await?;

        match &outcome {
            WithdrawalOutcome::Approved {
                subject_id, amount, ..
            } => {
                tracing::info!(request_id, subject_id, amount = %amount, "Withdrawal approved");
                self.notify(
                    EconomicEvent::new(kinds::WITHDRAWAL_APPROVED, *subject_id).with_payload(
                        serde_json::json!({ "request_id": request_id, "amount": amount }),
                    ),
                );
            }
            WithdrawalOutcome::Rejected {
                subject_id,
                refunded,
                ..
            } => {
                tracing::info!(request_id, subject_id, refunded = %refunded, "Withdrawal rejected");
                self.notify(
                    EconomicEvent::new(kinds::WITHDRAWAL_REJECTED, *subject_id).with_payload(
                        serde_json::json!({ "request_id": request_id, "refunded": refunded }),
                    ),
                );
            }
            WithdrawalOutcome::AlreadyProcessed { status, .. } => {
                tracing::debug!(request_id, status = %status, "Withdrawal already processed");
            }
        }

        Ok(outcome)
    }
}

async fn request_tx(
    conn: &mut PgConnection,
    subject_id: DbId,
    amount: Amount,
) -> Result<WithdrawalRequest, EconomyError> {
    let account = AccountRepo::find_by_id(&mut *conn, subject_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("account", subject_id))?;

    if AccountRepo::debit_if_sufficient(&mut *conn, subject_id, amount)
        .await?
        .is_none()
    {
        return Err(CoreError::InsufficientFunds {
            subject_id,
            required: amount,
            available: account.balance,
        }
        .into());
    }

    let request = WithdrawalRepo::create(&mut *conn, subject_id, amount).await?;
    Ledger::record_event(
        conn,
        subject_id,
        EventType::WithdrawalHold,
        amount,
        &reference(request.id),
    )
    .await?;

    Ok(request)
}

async fn decide_tx(
    conn: &mut PgConnection,
    request_id: DbId,
    decision: WithdrawalDecision,
) -> Result<WithdrawalOutcome, EconomyError> {
    let request = WithdrawalRepo::find_for_update(&mut *conn, request_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("withdrawal_request", request_id))?;
    let current = request
        .status()
        .map_err(|e| EconomyError::Core(CoreError::Internal(e)))?;

    let Some(next) = current.apply(decision) else {
        return Ok(WithdrawalOutcome::AlreadyProcessed {
            request_id,
            status: current,
        });
    };

    let Some(updated) = WithdrawalRepo::transition_from_pending(&mut *conn, request_id, next).await?
    else {
        return Err(CoreError::Conflict(format!(
            "Withdrawal request {request_id} left pending concurrently"
        ))
        .into());
    };

    if !decision.refunds() {
        return Ok(WithdrawalOutcome::Approved {
            request_id,
            subject_id: updated.subject_id,
            amount: updated.amount,
        });
    }

    AccountRepo::refund(&mut *conn, updated.subject_id, updated.amount).await?;
    Ledger::record_event(
        conn,
        updated.subject_id,
        EventType::WithdrawalRefund,
        updated.amount,
        &reference(request_id),
    )
    .await?;

    Ok(WithdrawalOutcome::Rejected {
        request_id,
        subject_id: updated.subject_id,
        refunded: updated.amount,
    })
}
