//! # Repository Pattern Implementation
//!
//! Repository traits and their SQLite implementations for roster data.
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling

pub mod player;

pub use player::{find_player, insert_player, PlayerRepository, SqlitePlayerRepository};
