//! Task reward claims.
//!
//! No lease: the completion record's primary key `(subject_id, task_id)` is
//! the idempotency boundary. A concurrent second insert waits for the first
//! transaction and then fails with a unique violation, which is reported as
//! [`TaskClaimOutcome::AlreadyCompleted`].

use async_trait::async_trait;
use rewards_coordinator::Ledger;
use rewards_core::ledger::{reference, EventType};
use rewards_core::types::{Amount, DbId};
use rewards_db::is_unique_violation;
use rewards_db::models::task::Task;
use rewards_db::repositories::task_repo::COMPLETION_CONSTRAINT;
use rewards_db::repositories::{AccountRepo, TaskCompletionRepo, TaskRepo};
use rewards_events::bus::kinds;
use rewards_events::EconomicEvent;
use serde::Serialize;

use crate::{Economy, EconomyError};

/// External check that a subject actually did what a task asks
/// (e.g. joined a channel). Consulted before anything is written.
#[async_trait]
pub trait TaskVerifier: Send + Sync {
    async fn verify(&self, subject_id: DbId, task: &Task) -> Result<bool, EconomyError>;
}

/// Verifier that accepts every claim.
#[derive(Debug, Default)]
pub struct AlwaysVerified;

#[async_trait]
impl TaskVerifier for AlwaysVerified {
    async fn verify(&self, _subject_id: DbId, _task: &Task) -> Result<bool, EconomyError> {
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskClaimOutcome {
    Rewarded {
        subject_id: DbId,
        task_id: DbId,
        reward: Amount,
    },
    AlreadyCompleted {
        subject_id: DbId,
        task_id: DbId,
    },
}

impl Economy {
    /// Record a task completion and pay its reward, at most once per pair.
    pub async fn claim_task(
        &self,
        subject_id: DbId,
        task_id: DbId,
    ) -> Result<TaskClaimOutcome, EconomyError> {
        let task = TaskRepo::find_by_id(self.pool(), task_id)
            .await?
            .ok_or_else(|| EconomyError::not_found("task", task_id))?;
        if !task.is_active {
            return Err(EconomyError::validation(format!("Task {task_id} is not active")));
        }

        if !self.verifier.verify(subject_id, &task).await? {
            return Err(EconomyError::Verification(format!(
                "Subject {subject_id} has not completed task {task_id}"
            )));
        }

        let mut tx = self.pool().begin().await?;

        AccountRepo::ensure(&mut *tx, subject_id, None).await?;

        match TaskCompletionRepo::insert(&mut *tx, subject_id, task_id).await {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e, Some(COMPLETION_CONSTRAINT)) => {
                tx.rollback().await?;
                tracing::debug!(subject_id, task_id, "Task already completed");
                return Ok(TaskClaimOutcome::AlreadyCompleted {
                    subject_id,
                    task_id,
                });
            }
            Err(e) => return Err(e.into()),
        }

        AccountRepo::credit(&mut *tx, subject_id, task.reward).await?;
        Ledger::record_event(
            &mut *tx,
            subject_id,
            EventType::TaskReward,
            task.reward,
            &reference(task_id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(subject_id, task_id, reward = %task.reward, "Task reward paid");
        self.notify(
            EconomicEvent::new(kinds::TASK_REWARDED, subject_id)
                .with_payload(serde_json::json!({ "task_id": task_id, "reward": task.reward })),
        );

        Ok(TaskClaimOutcome::Rewarded {
            subject_id,
            task_id,
            reward: task.reward,
        })
    }
}
