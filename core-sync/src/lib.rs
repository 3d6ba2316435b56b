//! # Roster Sync Module
//!
//! Resumable synchronization of a club roster into the local store.
//!
//! ## Overview
//!
//! A sync invocation fetches the full roster from a [`PlayerProvider`]
//! and stores every player that is not yet known. Progress is recorded per
//! player under a job run, so an invocation that stops partway resumes in
//! the next one without redoing committed work.
//!
//! ## Components
//!
//! - **Job Run State Machine** (`job`): `IN_PROGRESS → COMPLETED` lifecycle
//! - **Job State Repository** (`repository`): Persistence of runs, at most one active
//! - **Processed Set** (`processed`): Per-run markers of finished players
//! - **Unit of Work** (`unit_of_work`): Atomic save-and-mark per player
//! - **Fault Point** (`fault`): Interruption hook used by resume tests
//! - **Sync Engine** (`engine`): Orchestrates one invocation
//!
//! [`PlayerProvider`]: bridge_traits::PlayerProvider

pub mod engine;
pub mod error;
pub mod fault;
pub mod job;
pub mod processed;
pub mod repository;
pub mod unit_of_work;

pub use engine::{SyncEngine, SyncReport};
pub use error::{Result, SyncError};
pub use fault::{FaultPoint, InterruptAfter, NoFault};
pub use job::{JobRun, JobRunId, JobStatus};
pub use processed::{ProcessedMarker, ProcessedPlayerRepository, SqliteProcessedPlayerRepository};
pub use repository::{JobStateRepository, SqliteJobStateRepository};
pub use unit_of_work::{
    SqliteUnitOfWork, SqliteUnitOfWorkProvider, UnitOfWork, UnitOfWorkProvider,
};
