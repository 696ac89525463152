//! Shop items and ownership records.

use rewards_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub price: Amount,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a catalog item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub price: Amount,
}

/// A row from the `purchased_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchasedItem {
    pub subject_id: DbId,
    pub item_id: DbId,
    pub level: i32,
    pub purchased_at: Timestamp,
}
