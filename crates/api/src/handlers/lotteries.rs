//! Handlers for the `/lotteries` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rewards_core::types::DbId;
use rewards_economy::{DrawOutcome, TicketPurchase};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::{data, Envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BuyTicketRequest {
    pub subject_id: DbId,
}

/// POST /api/v1/lotteries/{id}/tickets
///
/// Returns 201 with the sold ticket. Refused with 409 once the lottery is
/// closed, or while a draw holds the lottery's lease.
pub async fn buy_ticket(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<BuyTicketRequest>,
) -> AppResult<(StatusCode, Envelope<TicketPurchase>)> {
    let purchase = state.economy.buy_lottery_ticket(id, input.subject_id).await?;
    Ok((StatusCode::CREATED, data(purchase)))
}

/// POST /api/v1/lotteries/{id}/draw
pub async fn draw(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<DrawOutcome>> {
    let outcome = state.economy.draw_lottery(id).await?;
    Ok(data(outcome))
}
