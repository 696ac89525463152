//! Handlers for the `/withdrawals` resource.
//!
//! Requests are opened by subjects; approve and reject are admin decisions.
//! Deciding an already-decided request reports `already_processed`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rewards_core::types::{Amount, DbId};
use rewards_db::models::withdrawal::WithdrawalRequest;
use rewards_economy::WithdrawalOutcome;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::{data, Envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWithdrawal {
    pub subject_id: DbId,
    pub amount: Amount,
}

/// POST /api/v1/withdrawals
pub async fn request_withdrawal(
    State(state): State<AppState>,
    Json(input): Json<CreateWithdrawal>,
) -> AppResult<(StatusCode, Envelope<WithdrawalRequest>)> {
    let request = state
        .economy
        .request_withdrawal(input.subject_id, input.amount)
        .await?;
    Ok((StatusCode::CREATED, data(request)))
}

/// POST /api/v1/withdrawals/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<WithdrawalOutcome>> {
    let outcome = state.economy.approve_withdrawal(id).await?;
    Ok(data(outcome))
}

/// POST /api/v1/withdrawals/{id}/reject
///
/// Refunds the held amount exactly once.
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<WithdrawalOutcome>> {
    let outcome = state.economy.reject_withdrawal(id).await?;
    Ok(data(outcome))
}
