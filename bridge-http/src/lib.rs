//! # HTTP Bridge Implementation
//!
//! Default [`HttpClient`](bridge_traits::HttpClient) for native targets,
//! built on `reqwest` with rustls.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_http::ReqwestHttpClient;
//! use std::time::Duration;
//!
//! let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(30))?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
