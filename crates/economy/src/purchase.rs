//! Item purchase.
//!
//! The ownership record's primary key is the idempotency boundary: the
//! insert itself rejects a second purchase. The lease only keeps two
//! attempts from both passing the balance check before either inserts.

use rewards_coordinator::Ledger;
use rewards_core::error::CoreError;
use rewards_core::ledger::{reference, EventType};
use rewards_core::lock_keys;
use rewards_core::types::{Amount, DbId};
use rewards_db::repositories::{AccountRepo, ItemRepo, PurchasedItemRepo};
use rewards_events::bus::kinds;
use rewards_events::EconomicEvent;
use serde::Serialize;
use sqlx::PgConnection;

use crate::{Economy, EconomyError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    Purchased {
        subject_id: DbId,
        item_id: DbId,
        price: Amount,
        balance: Amount,
    },
    AlreadyOwned {
        subject_id: DbId,
        item_id: DbId,
    },
}

impl Economy {
    /// Buy an item for a subject: own it at most once, pay for it at most once.
    ///
    /// Insufficient funds is an error and leaves no ownership record behind.
    pub async fn purchase_item(
        &self,
        subject_id: DbId,
        item_id: DbId,
    ) -> Result<PurchaseOutcome, EconomyError> {
        let outcome = self
            .coordinator
            .transactional_with_lock(&lock_keys::purchase(subject_id, item_id), move |conn| {
                Box::pin(purchase_item_tx(conn, subject_id, item_id))
            })
            .await?;

        if let PurchaseOutcome::Purchased { price, .. } = &outcome {
            tracing::info!(subject_id, item_id, price = %price, "Item purchased");
            self.notify(
                EconomicEvent::new(kinds::ITEM_PURCHASED, subject_id)
                    .with_payload(serde_json::json!({ "item_id": item_id, "price": price })),
            );
        }

        Ok(outcome)
    }
}

async fn purchase_item_tx(
    conn: &mut PgConnection,
    subject_id: DbId,
    item_id: DbId,
) -> Result<PurchaseOutcome, EconomyError> {
    let item = ItemRepo::find_by_id(&mut *conn, item_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("item", item_id))?;
    if !item.is_active {
        return Err(EconomyError::validation(format!(
            "Item {item_id} is not available for purchase"
        )));
    }

    let account = AccountRepo::find_by_id(&mut *conn, subject_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("account", subject_id))?;

    if PurchasedItemRepo::insert_if_absent(&mut *conn, subject_id, item_id)
        .await?
        .is_none()
    {
        return Ok(PurchaseOutcome::AlreadyOwned {
            subject_id,
            item_id,
        });
    }

    let Some(balance) = AccountRepo::debit_if_sufficient(&mut *conn, subject_id, item.price).await?
    else {
        return Err(CoreError::InsufficientFunds {
            subject_id,
            required: item.price,
            available: account.balance,
        }
        .into());
    };

    Ledger::record_event(
        &mut *conn,
        subject_id,
        EventType::Purchase,
        item.price,
        &reference(item_id),
    )
    .await?;

    Ok(PurchaseOutcome::Purchased {
        subject_id,
        item_id,
        price: item.price,
        balance,
    })
}
