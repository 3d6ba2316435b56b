//! # Transfermarkt Provider
//!
//! Implements the `PlayerProvider` trait for the Transfermarkt API.
//!
//! ## Overview
//!
//! This module provides:
//! - Roster retrieval for a single club
//! - Wire types mapping one-to-one onto `Player`
//! - Classification of failures into network, server, validation and
//!   unclassified errors

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{TransfermarktConnector, DEFAULT_BASE_URL};
pub use error::{Result, TransfermarktError};
pub use types::{TransfermarktPlayer, TransfermarktResponse};
