//! # Job Configuration Module
//!
//! Provides configuration for one roster synchronization run.
//!
//! ## Overview
//!
//! The configuration uses a builder to construct a [`JobConfig`] and
//! validates it fail-fast, so a bad value is reported before the database is
//! opened or the provider is contacted.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::JobConfig;
//!
//! let config = JobConfig::builder()
//!     .club_id(131)
//!     .database_url("sqlite:roster.db")
//!     .build()?;
//! ```
//!
//! ## Environment
//!
//! [`JobConfig::from_env`] reads a `.env` file when present and then:
//!
//! | Variable | Default |
//! |---|---|
//! | `ROSTER_CLUB_ID` | `5` |
//! | `ROSTER_DATABASE_URL` | `sqlite:roster.db` |
//! | `ROSTER_PROVIDER_URL` | `https://transfermarkt-api.fly.dev` |
//! | `ROSTER_HTTP_TIMEOUT_SECS` | `30` |
//! | `ROSTER_HTTP_MAX_RETRIES` | `3` |
//! | `ROSTER_LOG_FORMAT` | `pretty` in debug builds, `json` otherwise |
//! | `ROSTER_LOG_LEVEL` | `info` |
//! | `ROSTER_LOG_FILTER` | none |

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LogLevel, LoggingConfig};
use core_roster::ClubId;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CLUB_ID: u32 = 5;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:roster.db";
pub const DEFAULT_PROVIDER_URL: &str = "https://transfermarkt-api.fly.dev";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_RETRIES: u32 = 3;

/// Validated configuration of a sync job
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Club whose roster is synchronized
    pub club_id: ClubId,
    /// `sqlite:` URL of the local store
    pub database_url: String,
    /// Provider API base URL
    pub provider_base_url: String,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Transport retries after the first attempt
    pub http_max_retries: u32,
    pub logging: LoggingConfig,
}

impl JobConfig {
    pub fn builder() -> JobConfigBuilder {
        JobConfigBuilder::default()
    }

    /// Build the configuration from the process environment
    ///
    /// Loads `.env` from the working directory first, if one exists.
    /// Variables already set in the environment take precedence.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|_| None)
    }

    /// Like [`JobConfig::from_env`], but `overrides` wins over the environment
    pub fn from_env_with<F>(overrides: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("Failed to read .env file: {}", e))),
        }

        Self::from_lookup(|key| overrides(key).or_else(|| std::env::var(key).ok()))
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = JobConfigBuilder::default();

        if let Some(value) = lookup("ROSTER_CLUB_ID") {
            builder = builder.club_id(parse_var("ROSTER_CLUB_ID", &value)?);
        }
        if let Some(value) = lookup("ROSTER_DATABASE_URL") {
            builder = builder.database_url(value);
        }
        if let Some(value) = lookup("ROSTER_PROVIDER_URL") {
            builder = builder.provider_base_url(value);
        }
        if let Some(value) = lookup("ROSTER_HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse_var("ROSTER_HTTP_TIMEOUT_SECS", &value)?;
            builder = builder.http_timeout(Duration::from_secs(secs));
        }
        if let Some(value) = lookup("ROSTER_HTTP_MAX_RETRIES") {
            builder = builder.http_max_retries(parse_var("ROSTER_HTTP_MAX_RETRIES", &value)?);
        }

        let mut logging = LoggingConfig::default();
        if let Some(value) = lookup("ROSTER_LOG_FORMAT") {
            logging = logging.with_format(LogFormat::from_str(&value)?);
        }
        if let Some(value) = lookup("ROSTER_LOG_LEVEL") {
            logging = logging.with_level(LogLevel::from_str(&value)?);
        }
        if let Some(value) = lookup("ROSTER_LOG_FILTER") {
            logging = logging.with_filter(value);
        }

        builder.logging(logging).build()
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", name, value)))
}

/// Builder for [`JobConfig`]
#[derive(Debug, Clone)]
pub struct JobConfigBuilder {
    club_id: u32,
    database_url: String,
    provider_base_url: String,
    http_timeout: Duration,
    http_max_retries: u32,
    logging: LoggingConfig,
}

impl Default for JobConfigBuilder {
    fn default() -> Self {
        Self {
            club_id: DEFAULT_CLUB_ID,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            provider_base_url: DEFAULT_PROVIDER_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            http_max_retries: DEFAULT_HTTP_MAX_RETRIES,
            logging: LoggingConfig::default(),
        }
    }
}

impl JobConfigBuilder {
    pub fn club_id(mut self, club_id: u32) -> Self {
        self.club_id = club_id;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn provider_base_url(mut self, url: impl Into<String>) -> Self {
        self.provider_base_url = url.into();
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn http_max_retries(mut self, retries: u32) -> Self {
        self.http_max_retries = retries;
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the club id is zero, a URL is empty or
    /// the HTTP timeout is zero.
    pub fn build(self) -> Result<JobConfig> {
        let club_id = ClubId::new(self.club_id).map_err(|e| Error::Config(e.to_string()))?;

        if self.database_url.trim().is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if self.provider_base_url.trim().is_empty() {
            return Err(Error::Config("Provider base URL cannot be empty".to_string()));
        }

        if self.http_timeout.is_zero() {
            return Err(Error::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }

        Ok(JobConfig {
            club_id,
            database_url: self.database_url,
            provider_base_url: self.provider_base_url,
            http_timeout: self.http_timeout,
            http_max_retries: self.http_max_retries,
            logging: self.logging,
        })
    }
}
