//! # Synchronization Engine
//!
//! Runs one resumable synchronization of a club roster.
//!
//! ## Workflow
//!
//! 1. Look up the active job run (read-only)
//! 2. Fetch the full roster from the provider
//! 3. Start a new run if none was active
//! 4. Skip players already marked for the run
//! 5. For each remaining player, in one unit of work: save if absent, mark
//!    processed, commit
//! 6. Complete the run once it has a marker for every distinct player id
//!    in the roster
//!
//! A failure stops the pass. Players committed before the failure stay
//! committed, the run stays `IN_PROGRESS`, and the next invocation resumes
//! from the remaining players.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::SyncEngine;
//!
//! let engine = SyncEngine::with_sqlite(provider, pool);
//! let report = engine.run_sync(ClubId::new(5)?).await?;
//! ```

use crate::fault::{FaultPoint, NoFault};
use crate::processed::{ProcessedPlayerRepository, SqliteProcessedPlayerRepository};
use crate::repository::{JobStateRepository, SqliteJobStateRepository};
use crate::unit_of_work::{SqliteUnitOfWorkProvider, UnitOfWork, UnitOfWorkProvider};
use crate::{JobRun, JobRunId, JobStatus, Result, SyncError};
use bridge_traits::provider::PlayerProvider;
use core_roster::{ClubId, Player};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one invocation of [`SyncEngine::run_sync`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub run_id: JobRunId,
    /// Players returned by the provider
    pub fetched: usize,
    /// Players already marked for this run before the pass
    pub skipped: usize,
    /// Players marked during this pass
    pub processed: usize,
    /// Players newly inserted into the store during this pass
    pub saved: usize,
    /// Run status after the pass
    pub status: JobStatus,
}

pub struct SyncEngine {
    provider: Arc<dyn PlayerProvider>,
    jobs: Arc<dyn JobStateRepository>,
    processed: Arc<dyn ProcessedPlayerRepository>,
    units: Arc<dyn UnitOfWorkProvider>,
    fault: Arc<dyn FaultPoint>,
}

impl SyncEngine {
    pub fn new(
        provider: Arc<dyn PlayerProvider>,
        jobs: Arc<dyn JobStateRepository>,
        processed: Arc<dyn ProcessedPlayerRepository>,
        units: Arc<dyn UnitOfWorkProvider>,
    ) -> Self {
        Self {
            provider,
            jobs,
            processed,
            units,
            fault: Arc::new(NoFault),
        }
    }

    /// Engine backed by the SQLite store on `pool`
    pub fn with_sqlite(provider: Arc<dyn PlayerProvider>, pool: SqlitePool) -> Self {
        Self::new(
            provider,
            Arc::new(SqliteJobStateRepository::new(pool.clone())),
            Arc::new(SqliteProcessedPlayerRepository::new(pool.clone())),
            Arc::new(SqliteUnitOfWorkProvider::new(pool)),
        )
    }

    /// Replace the fault point invoked after each committed player
    pub fn with_fault_point(mut self, fault: Arc<dyn FaultPoint>) -> Self {
        self.fault = fault;
        self
    }

    /// Synchronize the roster of `club_id`
    ///
    /// # Errors
    ///
    /// - [`SyncError::Provider`] if the roster fetch fails; no run is created
    ///   or modified
    /// - [`SyncError::Store`] if any store operation fails
    /// - [`SyncError::Interrupted`] if the fault point stops the pass
    #[instrument(skip_all, fields(club_id = %club_id))]
    pub async fn run_sync(&self, club_id: ClubId) -> Result<SyncReport> {
        info!("Starting roster sync");

        let active = self.jobs.get_active_run().await.map_err(|e| {
            error!(code = e.code(), error = %e, "Failed to look up active job run");
            e
        })?;

        let roster = self.provider.fetch_roster(club_id).await.map_err(|e| {
            error!(code = e.code(), error = %e, "Failed to fetch roster");
            SyncError::Provider(e)
        })?;

        let run = match active {
            Some(run) => {
                info!(run_id = %run.id, "Resuming job run");
                run
            }
            None => self.jobs.start_new_run().await.map_err(|e| {
                error!(code = e.code(), error = %e, "Failed to start job run");
                e
            })?,
        };

        self.process_roster(&run, &roster).await.map_err(|e| {
            error!(run_id = %run.id, code = e.code(), error = %e, "Roster sync stopped");
            e
        })
    }

    async fn process_roster(&self, run: &JobRun, roster: &[Player]) -> Result<SyncReport> {
        let mut done: HashSet<String> = self
            .processed
            .list_for_run(run.id)
            .await?
            .into_iter()
            .map(|marker| marker.player_id)
            .collect();

        let skipped = roster.iter().filter(|p| done.contains(&p.id)).count();
        // A player listed twice still gets a single marker per run
        let expected = roster
            .iter()
            .map(|p| p.id.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;
        let mut processed_in_run = done.len() as u64;

        info!(
            run_id = %run.id,
            fetched = roster.len(),
            to_process = roster.len() - skipped,
            "Roster fetched"
        );

        let mut report = SyncReport {
            run_id: run.id,
            fetched: roster.len(),
            skipped,
            processed: 0,
            saved: 0,
            status: run.status,
        };

        for player in roster {
            if done.contains(&player.id) {
                continue;
            }

            if self.process_player(player, run.id).await? {
                report.saved += 1;
            }
            done.insert(player.id.clone());
            report.processed += 1;
            processed_in_run += 1;

            self.fault.after_commit(processed_in_run)?;
        }

        let total = self.processed.count_for_run(run.id).await?;
        if total >= expected {
            let completed = self.jobs.set_status(run, JobStatus::Completed).await?;
            report.status = completed.status;
            info!(
                run_id = %run.id,
                processed = report.processed,
                saved = report.saved,
                "Job run completed"
            );
        } else {
            warn!(
                run_id = %run.id,
                marked = total,
                expected,
                "Job run still in progress"
            );
        }

        Ok(report)
    }

    /// Process one player atomically; returns whether it was newly saved
    async fn process_player(&self, player: &Player, run_id: JobRunId) -> Result<bool> {
        let result = async {
            let mut uow = self.units.begin().await?;

            match Self::apply(uow.as_mut(), player, run_id).await {
                Ok(saved) => {
                    uow.commit().await?;
                    Ok::<_, SyncError>(saved)
                }
                Err(e) => {
                    if let Err(rollback) = uow.rollback().await {
                        warn!(player_id = %player.id, error = %rollback, "Rollback failed");
                    }
                    Err(e)
                }
            }
        }
        .await;

        match &result {
            Ok(saved) => debug!(player_id = %player.id, saved, "Player processed"),
            Err(e) => error!(
                player_id = %player.id,
                run_id = %run_id,
                code = e.code(),
                error = %e,
                "Failed to process player"
            ),
        }

        result
    }

    /// Save the player if absent and mark it, inside `uow`
    async fn apply(uow: &mut dyn UnitOfWork, player: &Player, run_id: JobRunId) -> Result<bool> {
        let saved = if uow.find_player(&player.id).await?.is_none() {
            uow.save_player(player).await?;
            true
        } else {
            debug!(player_id = %player.id, "Player already stored, skipping save");
            false
        };

        uow.mark_processed(&player.id, run_id).await?;
        Ok(saved)
    }
}
