//! # Roster Store
//!
//! Owns the local roster database.
//!
//! ## Overview
//!
//! This crate provides:
//! - The [`Player`] entity and the [`ClubId`] newtype
//! - SQLite pool creation with embedded migrations
//! - The player repository used as the entity store
//! - [`StoreError`], shared by every store capability

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use error::{InvalidClubId, Result, StoreError};
pub use models::{ClubId, Player};
pub use repositories::{PlayerRepository, SqlitePlayerRepository};
