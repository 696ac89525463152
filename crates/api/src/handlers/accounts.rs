//! Handlers for the `/accounts` resource.
//!
//! Reads go straight to the pool. Purchases and task claims run through the
//! economy's processors.

use axum::extract::{Path, Query, State};
use axum::Json;
use rewards_coordinator::Ledger;
use rewards_core::error::CoreError;
use rewards_core::types::DbId;
use rewards_db::models::account::Account;
use rewards_db::models::ledger::LedgerEntry;
use rewards_db::repositories::AccountRepo;
use rewards_economy::{PurchaseOutcome, TaskClaimOutcome};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::{data, Envelope};
use crate::state::AppState;

/// Default number of ledger entries returned when `limit` is omitted.
const DEFAULT_LEDGER_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub item_id: DbId,
}

/// GET /api/v1/accounts/{id}
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<Account>> {
    let account = AccountRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "account",
            id,
        }))?;
    Ok(data(account))
}

/// GET /api/v1/accounts/{id}/ledger?limit=
///
/// Newest entries first. `limit` is clamped to the ledger's maximum page.
pub async fn ledger_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<LedgerQuery>,
) -> AppResult<Envelope<Vec<LedgerEntry>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LEDGER_LIMIT);
    if limit < 1 {
        return Err(AppError::BadRequest("limit must be at least 1".into()));
    }
    let entries = Ledger::history(&state.pool, id, limit).await?;
    Ok(data(entries))
}

/// POST /api/v1/accounts/{id}/purchases
///
/// Buying an item the account already owns returns `already_owned`.
pub async fn purchase_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PurchaseRequest>,
) -> AppResult<Envelope<PurchaseOutcome>> {
    let outcome = state.economy.purchase_item(id, input.item_id).await?;
    Ok(data(outcome))
}

/// POST /api/v1/accounts/{id}/tasks/{task_id}/claim
pub async fn claim_task(
    State(state): State<AppState>,
    Path((id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Envelope<TaskClaimOutcome>> {
    let outcome = state.economy.claim_task(id, task_id).await?;
    Ok(data(outcome))
}
