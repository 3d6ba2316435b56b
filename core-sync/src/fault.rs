//! Fault injection point invoked after every per-player commit
//!
//! Production code uses [`NoFault`]. Tests inject [`InterruptAfter`] to stop
//! a run partway through and then check that the next invocation resumes.

use crate::{Result, SyncError};

pub trait FaultPoint: Send + Sync {
    /// Called with the run's processed count after each committed player
    fn after_commit(&self, processed_in_run: u64) -> Result<()>;
}

/// Never interrupts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFault;

impl FaultPoint for NoFault {
    fn after_commit(&self, _processed_in_run: u64) -> Result<()> {
        Ok(())
    }
}

/// Interrupts once the run's processed count reaches the given value
#[derive(Debug, Clone, Copy)]
pub struct InterruptAfter(pub u64);

impl FaultPoint for InterruptAfter {
    fn after_commit(&self, processed_in_run: u64) -> Result<()> {
        if processed_in_run == self.0 {
            return Err(SyncError::Interrupted {
                processed: processed_in_run,
            });
        }
        Ok(())
    }
}
