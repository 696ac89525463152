//! Handler for referral credits, typically called by the bot when a new
//! subject arrives through a referral link.

use axum::extract::State;
use axum::Json;
use rewards_core::types::DbId;
use rewards_economy::ReferralOutcome;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::{data, Envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreditReferralRequest {
    pub referrer_id: DbId,
    pub new_subject_id: DbId,
}

/// POST /api/v1/referrals/credit
///
/// Safe to retry: a repeated call for the same new subject returns
/// `already_credited` and pays nothing.
pub async fn credit_referral(
    State(state): State<AppState>,
    Json(input): Json<CreditReferralRequest>,
) -> AppResult<Envelope<ReferralOutcome>> {
    let outcome = state
        .economy
        .credit_referral(input.referrer_id, input.new_subject_id)
        .await?;
    Ok(data(outcome))
}
