//! Transfermarkt API connector implementation
//!
//! Implements the `PlayerProvider` trait over the public Transfermarkt API.

use async_trait::async_trait;
use bridge_traits::error::ProviderError;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::provider::PlayerProvider;
use core_roster::{ClubId, Player};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::error::{Result, TransfermarktError};
use crate::types::TransfermarktResponse;

/// Public Transfermarkt API base URL
pub const DEFAULT_BASE_URL: &str = "https://transfermarkt-api.fly.dev";

/// Transfermarkt API connector
///
/// # Features
///
/// - Single roster request per club, no pagination
/// - Transport retries for connection failures, 5xx and 429 via `HttpClient`
/// - Status classification into the provider error taxonomy
///
/// # Example
///
/// ```ignore
/// use provider_transfermarkt::TransfermarktConnector;
/// use bridge_traits::PlayerProvider;
///
/// let connector = TransfermarktConnector::new(http_client);
/// let players = connector.fetch_roster(ClubId::new(5)?).await?;
/// ```
pub struct TransfermarktConnector {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    retry_policy: RetryPolicy,
    timeout: Duration,
}

impl TransfermarktConnector {
    /// Create a connector against the public API
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL)
    }

    /// Create a connector against a custom base URL
    pub fn with_base_url(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
            retry_policy: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn players_url(&self, club_id: ClubId) -> String {
        format!("{}/clubs/{}/players", self.base_url, club_id)
    }

    fn parse_roster(response: &HttpResponse) -> Result<Vec<Player>> {
        let body: TransfermarktResponse = response
            .json()
            .map_err(|e| TransfermarktError::ParseError(e.to_string()))?;

        debug!(
            club = %body.id,
            updated_at = ?body.updated_at,
            players = body.players.len(),
            "Parsed roster response"
        );

        Ok(body.players.into_iter().map(Player::from).collect())
    }

    async fn get_players(&self, club_id: ClubId) -> Result<Vec<Player>> {
        let request = HttpRequest::get(self.players_url(club_id))
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self
            .http_client
            .execute_with_retry(request, self.retry_policy.clone())
            .await?;

        if !response.is_success() {
            return Err(TransfermarktError::from_status(
                response.status,
                response.text(),
            ));
        }

        Self::parse_roster(&response)
    }
}

#[async_trait]
impl PlayerProvider for TransfermarktConnector {
    #[instrument(skip_all, fields(club_id = %club_id))]
    async fn fetch_roster(&self, club_id: ClubId) -> std::result::Result<Vec<Player>, ProviderError> {
        info!("Fetching roster from Transfermarkt");

        match self.get_players(club_id).await {
            Ok(players) => {
                info!(players = players.len(), "Fetched roster");
                Ok(players)
            }
            Err(e) => {
                let error = ProviderError::from(e);
                error!(code = error.code(), error = %error, "Roster fetch failed");
                Err(error)
            }
        }
    }
}
