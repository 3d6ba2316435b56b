//! Domain models for the club roster
//!
//! A [`Player`] is created from provider data and stored once; the store
//! never rewrites an existing record.

use crate::error::InvalidClubId;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Club identity
// =============================================================================

/// Identifier of the club whose roster is synchronized
///
/// Always positive; zero is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ClubId(u32);

impl ClubId {
    pub fn new(id: u32) -> Result<Self, InvalidClubId> {
        if id == 0 {
            return Err(InvalidClubId(id));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ClubId {
    type Error = InvalidClubId;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClubId> for u32 {
    fn from(id: ClubId) -> Self {
        id.0
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Player
// =============================================================================

/// A football player as reported by the roster provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// External identifier, stable across provider calls
    pub id: String,
    pub name: String,
    pub position: String,
    /// Country names in provider order
    #[serde(default)]
    pub nationality: Vec<String>,
    pub date_of_birth: Option<String>,
    pub age: Option<u32>,
    /// Height in centimetres
    pub height: Option<u32>,
    /// Preferred foot
    pub foot: Option<String>,
    pub joined_on: Option<String>,
    /// Prior club
    pub signed_from: Option<String>,
    /// Contract expiry
    pub contract: Option<String>,
    pub market_value: Option<i64>,
    pub status: Option<String>,
}

impl Player {
    /// Create a player with only the mandatory fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.into(),
            nationality: Vec::new(),
            date_of_birth: None,
            age: None,
            height: None,
            foot: None,
            joined_on: None,
            signed_from: None,
            contract: None,
            market_value: None,
            status: None,
        }
    }

    pub fn with_nationality<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nationality = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_market_value(mut self, value: i64) -> Self {
        self.market_value = Some(value);
        self
    }

    /// Validate the mandatory fields
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Player id cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err(format!("Player {} has an empty name", self.id));
        }

        if self.position.trim().is_empty() {
            return Err(format!("Player {} has an empty position", self.id));
        }

        Ok(())
    }
}
