//! Tasks and completion records.

use rewards_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub reward: Amount,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a task definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub reward: Amount,
}

/// A row from the `task_completions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskCompletion {
    pub subject_id: DbId,
    pub task_id: DbId,
    pub completed_at: Timestamp,
}
