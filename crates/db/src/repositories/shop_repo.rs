//! Repositories for the `items` and `purchased_items` tables.

use rewards_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::shop::{CreateItem, Item, PurchasedItem};

// ---------------------------------------------------------------------------
// ItemRepo
// ---------------------------------------------------------------------------

/// Column list for `items` queries.
const ITEM_COLUMNS: &str = "id, name, price, is_active, created_at";

/// Read access to the shop catalog (catalog management lives elsewhere).
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new catalog item, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateItem) -> Result<Item, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO items (name, price) VALUES ($1, $2) RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.name)
            .bind(input.price)
            .fetch_one(executor)
            .await
    }

    /// Find an item by its primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Item>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}

// ---------------------------------------------------------------------------
// PurchasedItemRepo
// ---------------------------------------------------------------------------

/// Column list for `purchased_items` queries.
const OWNERSHIP_COLUMNS: &str = "subject_id, item_id, level, purchased_at";

/// Ownership records; the `(subject_id, item_id)` key admits one per pair.
pub struct PurchasedItemRepo;

impl PurchasedItemRepo {
    /// Record ownership. Returns `None` when the subject already owns the item.
    pub async fn insert_if_absent<'e, E>(
        executor: E,
        subject_id: DbId,
        item_id: DbId,
    ) -> Result<Option<PurchasedItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO purchased_items (subject_id, item_id) VALUES ($1, $2) \
             ON CONFLICT (subject_id, item_id) DO NOTHING \
             RETURNING {OWNERSHIP_COLUMNS}"
        );
        sqlx::query_as::<_, PurchasedItem>(&query)
            .bind(subject_id)
            .bind(item_id)
            .fetch_optional(executor)
            .await
    }

    /// Find the ownership record for a `(subject_id, item_id)` pair.
    pub async fn find<'e, E>(
        executor: E,
        subject_id: DbId,
        item_id: DbId,
    ) -> Result<Option<PurchasedItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {OWNERSHIP_COLUMNS} FROM purchased_items \
             WHERE subject_id = $1 AND item_id = $2"
        );
        sqlx::query_as::<_, PurchasedItem>(&query)
            .bind(subject_id)
            .bind(item_id)
            .fetch_optional(executor)
            .await
    }

    /// List everything a subject owns, oldest purchase first.
    pub async fn list_by_subject<'e, E>(
        executor: E,
        subject_id: DbId,
    ) -> Result<Vec<PurchasedItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {OWNERSHIP_COLUMNS} FROM purchased_items \
             WHERE subject_id = $1 ORDER BY purchased_at ASC"
        );
        sqlx::query_as::<_, PurchasedItem>(&query)
            .bind(subject_id)
            .fetch_all(executor)
            .await
    }
}
