//! # Processed-Set Repository
//!
//! Records which players a job run has finished with. Markers are
//! append-only and scoped to one run; a marker for a player under an older
//! run does not count as processed for the current one.

use crate::{JobRunId, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

/// A player completed within a given run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedMarker {
    pub player_id: String,
    pub job_run_id: JobRunId,
    /// Unix seconds, UTC
    pub processed_at: i64,
}

// ============================================================================
// Repository Trait
// ============================================================================

/// Read side of the processed set, plus standalone marking
///
/// The engine writes markers through [`UnitOfWork::mark_processed`] so the
/// marker commits together with the player. `exists` and `mark_processed`
/// here serve audits, tooling and test setup.
///
/// [`UnitOfWork::mark_processed`]: crate::unit_of_work::UnitOfWork::mark_processed
#[async_trait]
pub trait ProcessedPlayerRepository: Send + Sync {
    /// Whether the player has a marker under any run
    async fn exists(&self, player_id: &str) -> Result<bool>;

    /// Record the player as processed for the run
    ///
    /// Marking the same pair twice leaves a single marker.
    async fn mark_processed(&self, player_id: &str, run_id: JobRunId) -> Result<()>;

    /// All markers of a run in insertion order
    async fn list_for_run(&self, run_id: JobRunId) -> Result<Vec<ProcessedMarker>>;

    async fn count_for_run(&self, run_id: JobRunId) -> Result<u64>;
}

pub struct SqliteProcessedPlayerRepository {
    pool: SqlitePool,
}

impl SqliteProcessedPlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProcessedMarkerRow {
    player_id: String,
    job_run_id: i64,
    processed_at: i64,
}

impl From<ProcessedMarkerRow> for ProcessedMarker {
    fn from(row: ProcessedMarkerRow) -> Self {
        Self {
            player_id: row.player_id,
            job_run_id: JobRunId::new(row.job_run_id),
            processed_at: row.processed_at,
        }
    }
}

/// Insert a marker on an existing connection
pub async fn insert_marker(
    conn: &mut SqliteConnection,
    player_id: &str,
    run_id: JobRunId,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO processed_players (player_id, job_run_id, processed_at)
         VALUES (?, ?, ?)
         ON CONFLICT(player_id, job_run_id) DO NOTHING",
    )
    .bind(player_id)
    .bind(run_id.get())
    .bind(Utc::now().timestamp())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[async_trait]
impl ProcessedPlayerRepository for SqliteProcessedPlayerRepository {
    async fn exists(&self, player_id: &str) -> Result<bool> {
        let (found,): (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM processed_players WHERE player_id = ?)")
                .bind(player_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(found != 0)
    }

    async fn mark_processed(&self, player_id: &str, run_id: JobRunId) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        insert_marker(&mut conn, player_id, run_id).await
    }

    async fn list_for_run(&self, run_id: JobRunId) -> Result<Vec<ProcessedMarker>> {
        let rows = sqlx::query_as::<_, ProcessedMarkerRow>(
            "SELECT player_id, job_run_id, processed_at
             FROM processed_players
             WHERE job_run_id = ?
             ORDER BY id",
        )
        .bind(run_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProcessedMarker::from).collect())
    }

    async fn count_for_run(&self, run_id: JobRunId) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM processed_players WHERE job_run_id = ?")
                .bind(run_id.get())
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }
}
