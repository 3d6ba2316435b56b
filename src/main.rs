//! `roster-sync` binary.
//!
//! Runs one invocation of the roster sync job and exits `0` on success or
//! `1` on failure. Interrupted runs resume on the next invocation.
//!
//! # Usage
//!
//! ```sh
//! roster-sync --club-id 5 --database-url sqlite:roster.db
//! ```

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use bridge_http::ReqwestHttpClient;
use bridge_traits::RetryPolicy;
use clap::Parser;
use core_roster::{create_pool, DatabaseConfig, StoreError};
use core_runtime::{init_logging, JobConfig};
use core_sync::{SyncEngine, SyncError, SyncReport};
use provider_transfermarkt::TransfermarktConnector;
use tracing::{error, info};

use crate::cli::Args;

/// Code logged for failures before the engine runs.
const SETUP_ERROR_CODE: &str = "JOB.SETUP.ERROR";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match JobConfig::from_env_with(|key| args.lookup(key)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("roster-sync: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.logging.clone()) {
        eprintln!("roster-sync: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(report) => {
            info!(
                club_id = %config.club_id,
                run_id = %report.run_id,
                fetched = report.fetched,
                processed = report.processed,
                saved = report.saved,
                status = %report.status,
                "Roster sync finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                club_id = %config.club_id,
                code = error_code(&e),
                error = %format!("{:#}", e),
                "Roster sync failed"
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &JobConfig) -> Result<SyncReport> {
    let pool = create_pool(DatabaseConfig::from_url(&config.database_url))
        .await
        .context("Failed to open roster database")?;

    let retry_policy = RetryPolicy {
        max_retries: config.http_max_retries,
        ..RetryPolicy::default()
    };
    let http_client = ReqwestHttpClient::with_timeout(config.http_timeout)
        .context("Failed to create HTTP client")?
        .with_retry_policy(retry_policy.clone());

    let provider =
        TransfermarktConnector::with_base_url(Arc::new(http_client), &config.provider_base_url)
            .with_retry_policy(retry_policy)
            .with_timeout(config.http_timeout);

    let engine = SyncEngine::with_sqlite(Arc::new(provider), pool.clone());
    let result = engine.run_sync(config.club_id).await;

    pool.close().await;
    Ok(result?)
}

fn error_code(error: &anyhow::Error) -> &'static str {
    if let Some(e) = error.downcast_ref::<SyncError>() {
        e.code()
    } else if let Some(e) = error.downcast_ref::<StoreError>() {
        e.code()
    } else {
        SETUP_ERROR_CODE
    }
}
