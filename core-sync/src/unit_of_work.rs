//! # Unit of Work
//!
//! The per-player atomic boundary: lookup, conditional save and processed
//! marker are applied together or not at all.
//!
//! A unit of work that is dropped without [`UnitOfWork::commit`] rolls back.

use crate::processed::insert_marker;
use crate::{JobRunId, Result};
use async_trait::async_trait;
use core_roster::repositories::{find_player, insert_player};
use core_roster::Player;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Store operations that share one transaction
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_player(&mut self, id: &str) -> Result<Option<Player>>;

    async fn save_player(&mut self, player: &Player) -> Result<()>;

    async fn mark_processed(&mut self, player_id: &str, run_id: JobRunId) -> Result<()>;

    // Consume self so the unit cannot be used after commit/rollback
    async fn commit(self: Box<Self>) -> Result<()>;
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// A factory for units of work
#[async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}

#[derive(Debug, Clone)]
pub struct SqliteUnitOfWorkProvider {
    pool: SqlitePool,
}

impl SqliteUnitOfWorkProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkProvider for SqliteUnitOfWorkProvider {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteUnitOfWork { tx }))
    }
}

pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn find_player(&mut self, id: &str) -> Result<Option<Player>> {
        Ok(find_player(&mut self.tx, id).await?)
    }

    async fn save_player(&mut self, player: &Player) -> Result<()> {
        Ok(insert_player(&mut self.tx, player).await?)
    }

    async fn mark_processed(&mut self, player_id: &str, run_id: JobRunId) -> Result<()> {
        insert_marker(&mut self.tx, player_id, run_id).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
