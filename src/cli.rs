//! Command line arguments of the `roster-sync` binary

use clap::Parser;
use core_runtime::LogFormat;

/// Synchronize a club roster into the local store.
///
/// Values not given on the command line come from `ROSTER_*` environment
/// variables or a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "roster-sync", version)]
#[command(about = "Resumable club roster synchronization")]
pub struct Args {
    /// Club whose roster is synchronized.
    #[arg(short, long, env = "ROSTER_CLUB_ID")]
    pub club_id: Option<u32>,

    /// SQLite URL of the local store, e.g. `sqlite:roster.db`.
    #[arg(short, long, env = "ROSTER_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Log output format: pretty, json or compact.
    #[arg(long, env = "ROSTER_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl Args {
    /// Configuration variable set by a command line flag, if any
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "ROSTER_CLUB_ID" => self.club_id.map(|id| id.to_string()),
            "ROSTER_DATABASE_URL" => self.database_url.clone(),
            "ROSTER_LOG_FORMAT" => self.log_format.map(|format| format.as_str().to_string()),
            _ => None,
        }
    }
}
