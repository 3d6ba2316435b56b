//! Transfermarkt API response types
//!
//! Data structures for deserializing `GET /clubs/{id}/players` responses.

use core_roster::Player;
use serde::{Deserialize, Serialize};

/// Player entry of a club roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfermarktPlayer {
    pub id: String,
    pub name: String,
    pub position: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Country names, primary nationality first
    #[serde(default)]
    pub nationality: Vec<String>,

    /// Height in centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foot: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_on: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_from: Option<String>,

    /// Contract expiry date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<TransfermarktPlayer> for Player {
    fn from(wire: TransfermarktPlayer) -> Self {
        Player {
            id: wire.id,
            name: wire.name,
            position: wire.position,
            nationality: wire.nationality,
            date_of_birth: wire.date_of_birth,
            age: wire.age,
            height: wire.height,
            foot: wire.foot,
            joined_on: wire.joined_on,
            signed_from: wire.signed_from,
            contract: wire.contract,
            market_value: wire.market_value,
            status: wire.status,
        }
    }
}

/// Club players response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfermarktResponse {
    /// Club identifier echoed back by the API
    pub id: String,

    /// Time the API refreshed its cached data
    #[serde(default)]
    pub updated_at: Option<String>,

    pub players: Vec<TransfermarktPlayer>,
}
