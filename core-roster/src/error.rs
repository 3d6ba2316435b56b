use thiserror::Error;

/// Failure raised by any of the store capabilities.
///
/// Both variants are fatal to the processing step that triggered them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying storage or transaction failed.
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Anything else, e.g. a stored row that violates a model invariant.
    #[error("Unexpected store error: {0}")]
    Unexpected(String),
}

impl StoreError {
    pub const PERSISTENCE_CODE: &'static str = "DATABASE.TRANSACTION.ERROR";
    pub const UNEXPECTED_CODE: &'static str = "DATABASE.ERROR";

    /// Build a persistence error that carries no driver cause
    pub fn persistence(message: impl Into<String>) -> Self {
        StoreError::Persistence {
            message: message.into(),
            source: None,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Persistence { .. } => Self::PERSISTENCE_CODE,
            StoreError::Unexpected(_) => Self::UNEXPECTED_CODE,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        StoreError::Persistence {
            message: error.to_string(),
            source: Some(error),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        StoreError::persistence(format!("Migration failed: {}", error))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A club id of zero
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Club id must be a positive integer, got {0}")]
pub struct InvalidClubId(pub u32);
