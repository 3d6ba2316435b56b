//! Integration tests for resumable roster sync
//!
//! These tests drive the engine against an in-memory store and a scripted
//! provider and verify:
//! - Completion of empty and full rosters
//! - Resume after an interruption without redoing committed players
//! - Existing player data is never overwritten
//! - Fetch failures leave the store untouched
//! - At most one run is in progress at a time

use async_trait::async_trait;
use bridge_traits::{PlayerProvider, ProviderError};
use core_roster::{
    create_test_pool, ClubId, Player, PlayerRepository, SqlitePlayerRepository,
};
use core_sync::{
    InterruptAfter, JobStateRepository, JobStatus, ProcessedPlayerRepository,
    SqliteJobStateRepository, SqliteProcessedPlayerRepository, SyncEngine, SyncError,
};
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Scripted Provider
// ============================================================================

/// Provider that replays queued responses in order
struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<Vec<Player>, ProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn then_roster(self, players: Vec<Player>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(players));
        self
    }

    fn then_error(self, error: ProviderError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlayerProvider for ScriptedProvider {
    async fn fetch_roster(&self, _club_id: ClubId) -> Result<Vec<Player>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::Unclassified {
                    message: "no scripted response".to_string(),
                })
            })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn club() -> ClubId {
    ClubId::new(5).unwrap()
}

fn player(id: &str) -> Player {
    Player::new(id, format!("Player {}", id), "Centre-Back")
        .with_nationality(["Spain"])
        .with_market_value(1_000_000)
}

fn roster(ids: &[&str]) -> Vec<Player> {
    ids.iter().map(|id| player(id)).collect()
}

async fn marked_ids(pool: &SqlitePool, run_id: core_sync::JobRunId) -> Vec<String> {
    SqliteProcessedPlayerRepository::new(pool.clone())
        .list_for_run(run_id)
        .await
        .unwrap()
        .into_iter()
        .map(|marker| marker.player_id)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_empty_roster_completes_immediately() {
    let pool = create_test_pool().await.unwrap();
    let provider = Arc::new(ScriptedProvider::new().then_roster(Vec::new()));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let report = engine.run_sync(club()).await.unwrap();

    assert_eq!(report.fetched, 0);
    assert_eq!(report.processed, 0);
    assert_eq!(report.status, JobStatus::Completed);

    let jobs = SqliteJobStateRepository::new(pool.clone());
    let run = jobs.find_by_id(report.run_id).await.unwrap().unwrap();
    assert_eq!(run.status, JobStatus::Completed);
    assert!(run.ended_at.is_some());
    assert!(marked_ids(&pool, report.run_id).await.is_empty());
}

#[tokio::test]
async fn test_full_roster_saved_in_fetch_order() {
    let pool = create_test_pool().await.unwrap();
    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["30", "10", "20"])));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let report = engine.run_sync(club()).await.unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(report.saved, 3);
    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(marked_ids(&pool, report.run_id).await, vec!["30", "10", "20"]);

    let players = SqlitePlayerRepository::new(pool);
    assert_eq!(players.count().await.unwrap(), 3);
    let stored = players.find_by_id("10").await.unwrap().unwrap();
    assert_eq!(stored, player("10"));
}

#[tokio::test]
async fn test_interrupted_run_resumes_remaining_players() {
    let pool = create_test_pool().await.unwrap();
    let jobs = SqliteJobStateRepository::new(pool.clone());

    // First invocation stops after the second commit
    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["1", "2", "3"])));
    let engine = SyncEngine::with_sqlite(provider, pool.clone())
        .with_fault_point(Arc::new(InterruptAfter(2)));

    let error = engine.run_sync(club()).await.unwrap_err();
    assert!(matches!(error, SyncError::Interrupted { processed: 2 }));
    assert_eq!(error.code(), "SYNC.INTERRUPTED");

    let run = jobs.get_active_run().await.unwrap().unwrap();
    assert_eq!(run.status, JobStatus::InProgress);
    assert_eq!(marked_ids(&pool, run.id).await, vec!["1", "2"]);

    let players = SqlitePlayerRepository::new(pool.clone());
    assert_eq!(players.count().await.unwrap(), 2);
    assert!(players.find_by_id("3").await.unwrap().is_none());

    // Second invocation picks up the same run and only processes player 3
    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["1", "2", "3"])));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let report = engine.run_sync(club()).await.unwrap();
    assert_eq!(report.run_id, run.id);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.processed, 1);
    assert_eq!(report.saved, 1);
    assert_eq!(report.status, JobStatus::Completed);

    assert_eq!(marked_ids(&pool, run.id).await, vec!["1", "2", "3"]);
    assert_eq!(players.count().await.unwrap(), 3);
    assert!(jobs.get_active_run().await.unwrap().is_none());
}

#[tokio::test]
async fn test_resume_completes_when_roster_shrinks() {
    let pool = create_test_pool().await.unwrap();
    let jobs = SqliteJobStateRepository::new(pool.clone());

    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["1", "2", "3"])));
    let engine = SyncEngine::with_sqlite(provider, pool.clone())
        .with_fault_point(Arc::new(InterruptAfter(2)));
    engine.run_sync(club()).await.unwrap_err();
    let run = jobs.get_active_run().await.unwrap().unwrap();

    // Player 1 left the club; its marker still counts towards the run
    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["2", "3"])));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());
    let report = engine.run_sync(club()).await.unwrap();

    assert_eq!(report.run_id, run.id);
    assert_eq!(report.fetched, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(marked_ids(&pool, run.id).await, vec!["1", "2", "3"]);
    assert!(jobs.get_active_run().await.unwrap().is_none());
}

#[tokio::test]
async fn test_repeated_player_does_not_block_completion() {
    let pool = create_test_pool().await.unwrap();
    let jobs = SqliteJobStateRepository::new(pool.clone());
    let provider = Arc::new(
        ScriptedProvider::new()
            .then_roster(roster(&["1", "2", "1"]))
            .then_roster(roster(&["1", "2", "1"])),
    );
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let first = engine.run_sync(club()).await.unwrap();
    assert_eq!(first.status, JobStatus::Completed);
    assert_eq!(marked_ids(&pool, first.run_id).await, vec!["1", "2"]);

    let second = engine.run_sync(club()).await.unwrap();
    assert_ne!(second.run_id, first.run_id);
    assert_eq!(second.status, JobStatus::Completed);

    let history = jobs.get_history(10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|run| run.status == JobStatus::Completed));
}

#[tokio::test]
async fn test_unusual_optional_values_are_stored() {
    let pool = create_test_pool().await.unwrap();
    let odd = Player::new("9", "Player 9", "Goalkeeper").with_market_value(-1);
    let provider = Arc::new(ScriptedProvider::new().then_roster(vec![player("8"), odd.clone()]));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let report = engine.run_sync(club()).await.unwrap();

    assert_eq!(report.saved, 2);
    assert_eq!(report.status, JobStatus::Completed);
    let stored = SqlitePlayerRepository::new(pool).find_by_id("9").await.unwrap();
    assert_eq!(stored, Some(odd));
}

#[tokio::test]
async fn test_stored_player_is_marked_but_not_overwritten() {
    let pool = create_test_pool().await.unwrap();
    let players = SqlitePlayerRepository::new(pool.clone());

    let existing = Player::new("7", "Existing Name", "Right Winger");
    players.save(&existing).await.unwrap();

    let updated = Player::new("7", "Renamed", "Left Winger").with_market_value(5);
    let provider = Arc::new(ScriptedProvider::new().then_roster(vec![updated]));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let report = engine.run_sync(club()).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.saved, 0);
    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(marked_ids(&pool, report.run_id).await, vec!["7"]);

    let stored = players.find_by_id("7").await.unwrap().unwrap();
    assert_eq!(stored, existing);
    assert_eq!(players.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_fetch_failure_creates_no_run() {
    let pool = create_test_pool().await.unwrap();
    let provider = Arc::new(
        ScriptedProvider::new().then_error(ProviderError::Server { status: 503 }),
    );
    let engine = SyncEngine::with_sqlite(provider.clone(), pool.clone());

    let error = engine.run_sync(club()).await.unwrap_err();

    assert!(matches!(
        error,
        SyncError::Provider(ProviderError::Server { status: 503 })
    ));
    assert_eq!(error.code(), "API.SERVER.ERROR");
    assert_eq!(provider.calls(), 1);

    let jobs = SqliteJobStateRepository::new(pool.clone());
    assert!(jobs.get_history(10).await.unwrap().is_empty());
    assert_eq!(SqlitePlayerRepository::new(pool).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_fetch_failure_leaves_active_run_untouched() {
    let pool = create_test_pool().await.unwrap();
    let jobs = SqliteJobStateRepository::new(pool.clone());

    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["1", "2"])));
    let engine = SyncEngine::with_sqlite(provider, pool.clone())
        .with_fault_point(Arc::new(InterruptAfter(1)));
    engine.run_sync(club()).await.unwrap_err();
    let before = jobs.get_active_run().await.unwrap().unwrap();

    let provider = Arc::new(ScriptedProvider::new().then_error(ProviderError::Validation {
        status: 422,
        payload: "{\"detail\":\"unknown club\"}".to_string(),
    }));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());
    let error = engine.run_sync(club()).await.unwrap_err();

    assert_eq!(error.code(), "API.VALIDATION.FAILED");
    assert!(error.to_string().contains("unknown club"));

    let after = jobs.get_active_run().await.unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(marked_ids(&pool, after.id).await, vec!["1"]);
}

#[tokio::test]
async fn test_store_failure_keeps_committed_players() {
    let pool = create_test_pool().await.unwrap();
    let jobs = SqliteJobStateRepository::new(pool.clone());
    let players = SqlitePlayerRepository::new(pool.clone());

    let broken = vec![player("1"), Player::new("2", "", "Goalkeeper"), player("3")];
    let provider = Arc::new(ScriptedProvider::new().then_roster(broken));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let error = engine.run_sync(club()).await.unwrap_err();
    assert!(matches!(error, SyncError::Store(_)));
    assert_eq!(error.code(), "DATABASE.ERROR");

    let run = jobs.get_active_run().await.unwrap().unwrap();
    assert_eq!(marked_ids(&pool, run.id).await, vec!["1"]);
    assert_eq!(players.count().await.unwrap(), 1);

    // Once the provider data is fixed the same run finishes
    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["1", "2", "3"])));
    let engine = SyncEngine::with_sqlite(provider, pool.clone());
    let report = engine.run_sync(club()).await.unwrap();

    assert_eq!(report.run_id, run.id);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.processed, 2);
    assert_eq!(report.status, JobStatus::Completed);
}

#[tokio::test]
async fn test_rerun_after_completion_starts_new_run() {
    let pool = create_test_pool().await.unwrap();
    let provider = Arc::new(
        ScriptedProvider::new()
            .then_roster(roster(&["1", "2"]))
            .then_roster(roster(&["1", "2"])),
    );
    let engine = SyncEngine::with_sqlite(provider, pool.clone());

    let first = engine.run_sync(club()).await.unwrap();
    let second = engine.run_sync(club()).await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(second.skipped, 0);
    assert_eq!(second.processed, 2);
    assert_eq!(second.saved, 0);
    assert_eq!(second.status, JobStatus::Completed);

    let processed = SqliteProcessedPlayerRepository::new(pool.clone());
    assert_eq!(processed.count_for_run(first.run_id).await.unwrap(), 2);
    assert_eq!(processed.count_for_run(second.run_id).await.unwrap(), 2);
    assert_eq!(SqlitePlayerRepository::new(pool).count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_at_most_one_active_run() {
    let pool = create_test_pool().await.unwrap();
    let jobs = SqliteJobStateRepository::new(pool.clone());

    // The second invocation resumes and stops after the last commit
    for stop_at in [2, 3] {
        let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["1", "2", "3"])));
        let engine = SyncEngine::with_sqlite(provider, pool.clone())
            .with_fault_point(Arc::new(InterruptAfter(stop_at)));
        let _ = engine.run_sync(club()).await;

        let active = jobs
            .get_history(10)
            .await
            .unwrap()
            .into_iter()
            .filter(|run| run.status == JobStatus::InProgress)
            .count();
        assert_eq!(active, 1);
    }

    let provider = Arc::new(ScriptedProvider::new().then_roster(roster(&["1", "2", "3"])));
    SyncEngine::with_sqlite(provider, pool.clone())
        .run_sync(club())
        .await
        .unwrap();

    let history = jobs.get_history(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, JobStatus::Completed);
}
