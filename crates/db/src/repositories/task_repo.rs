//! Repositories for the `tasks` and `task_completions` tables.

use rewards_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::task::{CreateTask, Task, TaskCompletion};

/// Name of the primary key that makes a task claimable once per subject.
pub const COMPLETION_CONSTRAINT: &str = "pk_task_completions";

// ---------------------------------------------------------------------------
// TaskRepo
// ---------------------------------------------------------------------------

/// Column list for `tasks` queries.
const TASK_COLUMNS: &str = "id, title, reward, is_active, created_at";

/// Read access to task definitions.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task definition, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateTask) -> Result<Task, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO tasks (title, reward) VALUES ($1, $2) RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(input.reward)
            .fetch_one(executor)
            .await
    }

    /// Find a task by its primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Task>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}

// ---------------------------------------------------------------------------
// TaskCompletionRepo
// ---------------------------------------------------------------------------

/// Column list for `task_completions` queries.
const COMPLETION_COLUMNS: &str = "subject_id, task_id, completed_at";

/// Completion records, keyed by `(subject_id, task_id)`.
pub struct TaskCompletionRepo;

impl TaskCompletionRepo {
    /// Insert a completion record.
    ///
    /// A second insert for the same pair fails with a unique violation on
    /// [`COMPLETION_CONSTRAINT`]; a concurrent one blocks until the first
    /// transaction settles and then fails the same way.
    pub async fn insert<'e, E>(
        executor: E,
        subject_id: DbId,
        task_id: DbId,
    ) -> Result<TaskCompletion, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO task_completions (subject_id, task_id) VALUES ($1, $2) \
             RETURNING {COMPLETION_COLUMNS}"
        );
        sqlx::query_as::<_, TaskCompletion>(&query)
            .bind(subject_id)
            .bind(task_id)
            .fetch_one(executor)
            .await
    }

    /// Count completion records for a pair (0 or 1).
    pub async fn count<'e, E>(
        executor: E,
        subject_id: DbId,
        task_id: DbId,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM task_completions WHERE subject_id = $1 AND task_id = $2",
        )
        .bind(subject_id)
        .bind(task_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }
}
