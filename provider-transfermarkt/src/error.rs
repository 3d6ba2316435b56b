//! Error types for the Transfermarkt provider

use bridge_traits::error::{BridgeError, ProviderError};
use thiserror::Error;

/// Transfermarkt provider errors
#[derive(Error, Debug)]
pub enum TransfermarktError {
    /// API answered with a server error after transport retries
    #[error("Transfermarkt server error (status {status_code})")]
    ServerError { status_code: u16 },

    /// API rejected the request parameters
    #[error("Transfermarkt rejected the request (status {status_code}): {body}")]
    ValidationFailed { status_code: u16, body: String },

    /// API returned a status this client does not handle
    #[error("Transfermarkt API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Transport error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for Transfermarkt operations
pub type Result<T> = std::result::Result<T, TransfermarktError>;

impl TransfermarktError {
    /// Classify a non-success HTTP status
    pub fn from_status(status_code: u16, body: String) -> Self {
        match status_code {
            500..=599 => TransfermarktError::ServerError { status_code },
            400 | 422 => TransfermarktError::ValidationFailed { status_code, body },
            _ => TransfermarktError::ApiError {
                status_code,
                message: body,
            },
        }
    }
}

impl From<TransfermarktError> for ProviderError {
    fn from(error: TransfermarktError) -> Self {
        match error {
            TransfermarktError::ServerError { status_code } => ProviderError::Server {
                status: status_code,
            },
            TransfermarktError::ValidationFailed { status_code, body } => {
                ProviderError::Validation {
                    status: status_code,
                    payload: body,
                }
            }
            TransfermarktError::ApiError { .. } | TransfermarktError::ParseError(_) => {
                ProviderError::Unclassified {
                    message: error.to_string(),
                }
            }
            TransfermarktError::BridgeError(e) => e.into(),
        }
    }
}
