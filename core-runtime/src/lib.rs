//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the roster sync job:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate establishes the configuration and logging conventions used
//! throughout the workspace. The binary builds a [`JobConfig`](config::JobConfig)
//! and initializes logging before anything else runs.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{JobConfig, JobConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
