//! Player repository trait and implementation
//!
//! Besides the pool-backed [`SqlitePlayerRepository`], this module exposes
//! connection-level helpers ([`find_player`], [`insert_player`]) so a caller
//! holding an open transaction can read and write players inside it.

use crate::error::{Result, StoreError};
use crate::models::Player;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

/// Entity store interface for players
///
/// The sync engine reaches the store through the connection-level
/// [`find_player`] and [`insert_player`] inside its own transaction. This
/// pool-backed interface serves audits, tooling and test setup.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Insert a new player
    ///
    /// # Errors
    /// Returns error if:
    /// - A player with the same ID already exists
    /// - Player validation fails
    /// - Database error occurs
    async fn save(&self, player: &Player) -> Result<()>;

    /// Find a player by its external ID
    ///
    /// # Returns
    /// - `Ok(Some(player))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(&self, id: &str) -> Result<Option<Player>>;

    /// Count stored players
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of PlayerRepository
pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    /// Create a new SQLite player repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn save(&self, player: &Player) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        insert_player(&mut tx, player).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Player>> {
        let mut conn = self.pool.acquire().await?;
        find_player(&mut conn, id).await
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================

#[derive(Debug, FromRow)]
struct PlayerRow {
    id: String,
    name: String,
    position: String,
    date_of_birth: Option<String>,
    age: Option<i64>,
    height: Option<i64>,
    foot: Option<String>,
    joined_on: Option<String>,
    signed_from: Option<String>,
    contract: Option<String>,
    market_value: Option<i64>,
    status: Option<String>,
}

impl PlayerRow {
    fn into_player(self, nationality: Vec<String>) -> Result<Player> {
        let age = optional_u32(self.age, "age", &self.id)?;
        let height = optional_u32(self.height, "height", &self.id)?;

        let player = Player {
            id: self.id,
            name: self.name,
            position: self.position,
            nationality,
            date_of_birth: self.date_of_birth,
            age,
            height,
            foot: self.foot,
            joined_on: self.joined_on,
            signed_from: self.signed_from,
            contract: self.contract,
            market_value: self.market_value,
            status: self.status,
        };

        player.validate().map_err(StoreError::Unexpected)?;
        Ok(player)
    }
}

fn optional_u32(value: Option<i64>, field: &str, player_id: &str) -> Result<Option<u32>> {
    value
        .map(|v| {
            u32::try_from(v).map_err(|_| {
                StoreError::Unexpected(format!(
                    "Stored {} {} of player {} is out of range",
                    field, v, player_id
                ))
            })
        })
        .transpose()
}

/// Load a player and its nationalities on an existing connection
pub async fn find_player(conn: &mut SqliteConnection, id: &str) -> Result<Option<Player>> {
    let row = sqlx::query_as::<_, PlayerRow>(
        "SELECT id, name, position, date_of_birth, age, height, foot, joined_on,
                signed_from, contract, market_value, status
         FROM players WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let nationality: Vec<(String,)> = sqlx::query_as(
        "SELECT nationality FROM player_nationalities WHERE player_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    row.into_player(nationality.into_iter().map(|(n,)| n).collect())
        .map(Some)
}

/// Insert a player and its nationalities on an existing connection
///
/// The caller owns the transaction boundary. A duplicate ID surfaces as a
/// persistence error from the primary key.
pub async fn insert_player(conn: &mut SqliteConnection, player: &Player) -> Result<()> {
    player
        .validate()
        .map_err(|msg| StoreError::Unexpected(format!("Refusing to store player: {}", msg)))?;

    sqlx::query(
        "INSERT INTO players (
            id, name, position, date_of_birth, age, height, foot, joined_on,
            signed_from, contract, market_value, status, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&player.id)
    .bind(&player.name)
    .bind(&player.position)
    .bind(&player.date_of_birth)
    .bind(player.age.map(i64::from))
    .bind(player.height.map(i64::from))
    .bind(&player.foot)
    .bind(&player.joined_on)
    .bind(&player.signed_from)
    .bind(&player.contract)
    .bind(player.market_value)
    .bind(&player.status)
    .bind(Utc::now().timestamp())
    .execute(&mut *conn)
    .await?;

    for (position, nationality) in player.nationality.iter().enumerate() {
        sqlx::query(
            "INSERT INTO player_nationalities (player_id, position, nationality) VALUES (?, ?, ?)",
        )
        .bind(&player.id)
        .bind(position as i64)
        .bind(nationality)
        .execute(&mut *conn)
        .await?;
    }

    debug!(player_id = %player.id, "Inserted player");
    Ok(())
}
