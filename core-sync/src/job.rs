//! # Job Run State Machine
//!
//! Tracks one logical synchronization attempt that may span several
//! process invocations.
//!
//! ## State Machine
//!
//! ```text
//! IN_PROGRESS → COMPLETED
//! ```
//!
//! `COMPLETED` is terminal. A run is never deleted, so completed runs form an
//! audit trail.

use crate::{Result, SyncError};
use chrono::Utc;
use core_roster::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ID Types
// ============================================================================

/// Store-assigned identifier of a job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobRunId(i64);

impl JobRunId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for JobRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Status Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    /// Get the string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
        }
    }
}

impl FromStr for JobStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "IN_PROGRESS" => Ok(JobStatus::InProgress),
            "COMPLETED" => Ok(JobStatus::Completed),
            _ => Err(StoreError::Unexpected(format!("Invalid job status: {}", s)).into()),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Job Run Entity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub id: JobRunId,
    pub status: JobStatus,
    /// Unix seconds, UTC
    pub started_at: i64,
    /// Set when the run completes
    pub ended_at: Option<i64>,
}

impl JobRun {
    /// A freshly started run
    pub fn started(id: JobRunId, started_at: i64) -> Self {
        Self {
            id,
            status: JobStatus::InProgress,
            started_at,
            ended_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == JobStatus::InProgress
    }

    /// Mark the run completed and stamp its end time
    ///
    /// # Errors
    ///
    /// Returns an error if the run is already completed
    pub fn complete(self) -> Result<Self> {
        self.transition_to(JobStatus::Completed)
    }

    /// Apply a status change
    ///
    /// Setting `IN_PROGRESS` on an active run is a no-op.
    pub fn transition_to(mut self, to: JobStatus) -> Result<Self> {
        self.validate_transition(to)?;

        if to == JobStatus::Completed {
            self.status = JobStatus::Completed;
            self.ended_at = Some(Utc::now().timestamp());
        }

        Ok(self)
    }

    /// Seconds between start and end, if the run has ended
    pub fn duration_secs(&self) -> Option<i64> {
        self.ended_at.map(|end| end - self.started_at)
    }

    fn validate_transition(&self, to: JobStatus) -> Result<()> {
        if self.status.is_terminal() {
            return Err(SyncError::InvalidStateTransition {
                from: self.status.to_string(),
                to: to.to_string(),
                reason: "Completed runs are final".to_string(),
            });
        }

        Ok(())
    }
}
