//! # Job Run Repository
//!
//! Provides database persistence for job runs.
//!
//! ## Overview
//!
//! This repository handles:
//! - Starting new runs
//! - Looking up the single active run
//! - Completing runs
//! - Run history retrieval

use crate::{JobRun, JobRunId, JobStatus, Result, SyncError};
use async_trait::async_trait;
use chrono::Utc;
use core_roster::StoreError;
use sqlx::{FromRow, SqlitePool};
use tracing::info;

// ============================================================================
// Repository Trait
// ============================================================================

/// Repository trait for job run persistence
#[async_trait]
pub trait JobStateRepository: Send + Sync {
    /// Create a fresh `IN_PROGRESS` run starting now
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when
    /// another run is still in progress
    async fn start_new_run(&self) -> Result<JobRun>;

    /// The run currently `IN_PROGRESS`, if any
    async fn get_active_run(&self) -> Result<Option<JobRun>>;

    /// Persist a status change and return the updated run
    ///
    /// The transition is validated against the stored state, not the
    /// caller's copy.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidStateTransition`] if the stored run is
    /// already completed
    async fn set_status(&self, run: &JobRun, status: JobStatus) -> Result<JobRun>;

    async fn find_by_id(&self, id: JobRunId) -> Result<Option<JobRun>>;

    /// Most recent runs first
    async fn get_history(&self, limit: u32) -> Result<Vec<JobRun>>;
}

/// SQLite implementation of JobStateRepository
pub struct SqliteJobStateRepository {
    pool: SqlitePool,
}

impl SqliteJobStateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a job run
#[derive(Debug, FromRow)]
struct JobRunRow {
    id: i64,
    status: String,
    started_at: i64,
    ended_at: Option<i64>,
}

impl TryFrom<JobRunRow> for JobRun {
    type Error = SyncError;

    fn try_from(row: JobRunRow) -> Result<Self> {
        Ok(JobRun {
            id: JobRunId::new(row.id),
            status: row.status.parse()?,
            started_at: row.started_at,
            ended_at: row.ended_at,
        })
    }
}

#[async_trait]
impl JobStateRepository for SqliteJobStateRepository {
    async fn start_new_run(&self) -> Result<JobRun> {
        let started_at = Utc::now().timestamp();

        let result = sqlx::query("INSERT INTO job_runs (status, started_at) VALUES (?, ?)")
            .bind(JobStatus::InProgress.as_str())
            .bind(started_at)
            .execute(&self.pool)
            .await?;

        let run = JobRun::started(JobRunId::new(result.last_insert_rowid()), started_at);
        info!(run_id = %run.id, "Started new job run");
        Ok(run)
    }

    async fn get_active_run(&self) -> Result<Option<JobRun>> {
        let row = sqlx::query_as::<_, JobRunRow>(
            "SELECT id, status, started_at, ended_at FROM job_runs
             WHERE status = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(JobStatus::InProgress.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(JobRun::try_from).transpose()
    }

    async fn set_status(&self, run: &JobRun, status: JobStatus) -> Result<JobRun> {
        let stored = self.find_by_id(run.id).await?.ok_or_else(|| {
            SyncError::Store(StoreError::Unexpected(format!(
                "Job run {} not found",
                run.id
            )))
        })?;

        let updated = stored.transition_to(status)?;

        sqlx::query("UPDATE job_runs SET status = ?, ended_at = ? WHERE id = ?")
            .bind(updated.status.as_str())
            .bind(updated.ended_at)
            .bind(updated.id.get())
            .execute(&self.pool)
            .await?;

        info!(run_id = %updated.id, status = %updated.status, "Job run updated");
        Ok(updated)
    }

    async fn find_by_id(&self, id: JobRunId) -> Result<Option<JobRun>> {
        let row = sqlx::query_as::<_, JobRunRow>(
            "SELECT id, status, started_at, ended_at FROM job_runs WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(JobRun::try_from).transpose()
    }

    async fn get_history(&self, limit: u32) -> Result<Vec<JobRun>> {
        let rows = sqlx::query_as::<_, JobRunRow>(
            "SELECT id, status, started_at, ended_at FROM job_runs ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JobRun::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_roster::create_test_pool;

    #[tokio::test]
    async fn test_start_and_find_active_run() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteJobStateRepository::new(pool);

        assert!(repo.get_active_run().await.unwrap().is_none());

        let run = repo.start_new_run().await.unwrap();
        assert_eq!(run.status, JobStatus::InProgress);
        assert!(run.ended_at.is_none());

        let active = repo.get_active_run().await.unwrap();
        assert_eq!(active, Some(run));
    }

    #[tokio::test]
    async fn test_complete_run() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteJobStateRepository::new(pool);
        let run = repo.start_new_run().await.unwrap();

        let completed = repo.set_status(&run, JobStatus::Completed).await.unwrap();
        assert_eq!(completed.status, JobStatus::Completed);
        assert!(completed.ended_at.is_some());

        assert!(repo.get_active_run().await.unwrap().is_none());
        let stored = repo.find_by_id(run.id).await.unwrap().unwrap();
        assert_eq!(stored, completed);
    }

    #[tokio::test]
    async fn test_completed_run_is_final() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteJobStateRepository::new(pool);
        let run = repo.start_new_run().await.unwrap();
        repo.set_status(&run, JobStatus::Completed).await.unwrap();

        // The stale copy still says IN_PROGRESS; the stored state wins
        let result = repo.set_status(&run, JobStatus::Completed).await;
        assert!(matches!(
            result,
            Err(SyncError::InvalidStateTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_single_active_run_enforced() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteJobStateRepository::new(pool);
        repo.start_new_run().await.unwrap();

        let second = repo.start_new_run().await;
        assert_eq!(second.unwrap_err().code(), "DATABASE.TRANSACTION.ERROR");
    }

    #[tokio::test]
    async fn test_set_status_unknown_run() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteJobStateRepository::new(pool);
        let ghost = JobRun::started(JobRunId::new(42), 0);

        let result = repo.set_status(&ghost, JobStatus::Completed).await;
        assert_eq!(result.unwrap_err().code(), "DATABASE.ERROR");
    }

    #[tokio::test]
    async fn test_get_history() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteJobStateRepository::new(pool);

        for _ in 0..3 {
            let run = repo.start_new_run().await.unwrap();
            repo.set_status(&run, JobStatus::Completed).await.unwrap();
        }
        let current = repo.start_new_run().await.unwrap();

        let history = repo.get_history(2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, current.id);
        assert!(history[0].id > history[1].id);
        assert_eq!(history[1].status, JobStatus::Completed);
    }
}
