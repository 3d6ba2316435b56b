use thiserror::Error;

/// Transport-level failure raised by an [`HttpClient`](crate::http::HttpClient)
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl BridgeError {
    /// True when no response was received from the remote end
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            BridgeError::Timeout(_) | BridgeError::Connect(_) | BridgeError::Transport(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

// =============================================================================
// Provider errors
// =============================================================================

/// Classification of a [`ProviderError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    Network,
    Server,
    Validation,
    Unclassified,
}

/// Failure of a roster fetch, classified by cause
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider could not be reached (DNS, refused connection, timeout)
    #[error("Provider unreachable: {message}")]
    Network { message: String },

    /// The provider answered with a 5xx status
    #[error("Provider server error (HTTP {status})")]
    Server { status: u16 },

    /// The provider rejected the request (400 or 422)
    #[error("Provider rejected the request (HTTP {status}): {payload}")]
    Validation { status: u16, payload: String },

    /// Anything else: unexpected status, undecodable body
    #[error("Provider request failed: {message}")]
    Unclassified { message: String },
}

impl ProviderError {
    pub const NETWORK_CODE: &'static str = "API.NETWORK.UNREACHABLE";
    pub const SERVER_CODE: &'static str = "API.SERVER.ERROR";
    pub const VALIDATION_CODE: &'static str = "API.VALIDATION.FAILED";
    pub const UNCLASSIFIED_CODE: &'static str = "API.REQUEST_FAILED";

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Network { .. } => ProviderErrorKind::Network,
            ProviderError::Server { .. } => ProviderErrorKind::Server,
            ProviderError::Validation { .. } => ProviderErrorKind::Validation,
            ProviderError::Unclassified { .. } => ProviderErrorKind::Unclassified,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ProviderErrorKind::Network => Self::NETWORK_CODE,
            ProviderErrorKind::Server => Self::SERVER_CODE,
            ProviderErrorKind::Validation => Self::VALIDATION_CODE,
            ProviderErrorKind::Unclassified => Self::UNCLASSIFIED_CODE,
        }
    }

    /// Network and server failures may succeed if attempted later
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ProviderErrorKind::Network | ProviderErrorKind::Server
        )
    }
}

impl From<BridgeError> for ProviderError {
    fn from(error: BridgeError) -> Self {
        if error.is_network() {
            ProviderError::Network {
                message: error.to_string(),
            }
        } else {
            ProviderError::Unclassified {
                message: error.to_string(),
            }
        }
    }
}
