use serde::Deserialize;
use std::env;
use std::fs;

use crate::error::{Error, Result};
use crate::models::WatchEntry;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub solana: SolanaConfig,
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaConfig {
    pub rpc_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Path to the watchlist JSON file
    pub watchlist_path: String,
    /// Delay between accounts in seconds (default: 5)
    pub pacing_delay_secs: u64,
    /// Last-activity staleness cutoff in seconds (default: 10800 = 3 hours)
    pub stale_threshold_secs: i64,
    /// SOL balance below this is flagged low (default: 0.025)
    pub low_balance_threshold_sol: f64,
    /// Display symbol for the watched token column (default: NOS)
    pub token_symbol: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            solana: SolanaConfig {
                rpc_url: env::var("SOLANA_RPC_URL")
                    .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string()),
            },
            scanner: ScannerConfig {
                watchlist_path: env::var("WATCHLIST_PATH")
                    .unwrap_or_else(|_| "watchlist.json".to_string()),
                pacing_delay_secs: env::var("SCAN_PACING_SECONDS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                stale_threshold_secs: env::var("STALE_THRESHOLD_SECONDS")
                    .unwrap_or_else(|_| "10800".to_string())
                    .parse()?,
                low_balance_threshold_sol: env::var("LOW_BALANCE_THRESHOLD_SOL")
                    .unwrap_or_else(|_| "0.025".to_string())
                    .parse()?,
                token_symbol: env::var("TOKEN_SYMBOL").unwrap_or_else(|_| "NOS".to_string()),
            },
        })
    }
}

/// Load the ordered watchlist from a JSON file.
///
/// An unreadable or unparseable file is a fatal startup error; an empty
/// list is valid and yields a zero-row report.
pub fn load_watchlist(path: &str) -> Result<Vec<WatchEntry>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read watchlist {}: {}", path, e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("Failed to parse watchlist {}: {}", path, e)))
}
