//! # Bridge Traits
//!
//! Abstraction traits for the remote side of the roster synchronization.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry
//! - [`PlayerProvider`](provider::PlayerProvider) - Source of club rosters
//!
//! ## Error Handling
//!
//! Transports report [`BridgeError`](error::BridgeError). Providers convert
//! those, together with HTTP status codes, into the
//! [`ProviderError`](error::ProviderError) taxonomy seen by the sync engine.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` bounds so implementations can be shared
//! across async tasks.

pub mod error;
pub mod http;
pub mod provider;

pub use error::{BridgeError, ProviderError, ProviderErrorKind};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use provider::PlayerProvider;
