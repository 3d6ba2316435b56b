//! Roster provider abstraction

use async_trait::async_trait;
use core_roster::{ClubId, Player};

use crate::error::ProviderError;

/// Read-only source of club rosters
///
/// Implementations perform no side effects besides the remote call, and
/// retry transient transport failures before returning.
#[async_trait]
pub trait PlayerProvider: Send + Sync {
    /// Fetch the full current roster of a club, in provider order
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] classified as network, server,
    /// validation or unclassified.
    async fn fetch_roster(&self, club_id: ClubId) -> Result<Vec<Player>, ProviderError>;
}
