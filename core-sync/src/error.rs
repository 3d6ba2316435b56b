use bridge_traits::error::ProviderError;
use core_roster::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Sync interrupted after {processed} processed players")]
    Interrupted { processed: u64 },

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },
}

impl SyncError {
    pub const INTERRUPTED_CODE: &'static str = "SYNC.INTERRUPTED";
    pub const INVALID_TRANSITION_CODE: &'static str = "SYNC.INVALID_STATE_TRANSITION";

    /// Stable machine-readable code of the underlying classification
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::Provider(e) => e.code(),
            SyncError::Store(e) => e.code(),
            SyncError::Interrupted { .. } => Self::INTERRUPTED_CODE,
            SyncError::InvalidStateTransition { .. } => Self::INVALID_TRANSITION_CODE,
        }
    }
}

impl From<sqlx::Error> for SyncError {
    fn from(error: sqlx::Error) -> Self {
        SyncError::Store(StoreError::from(error))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
