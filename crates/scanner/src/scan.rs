use chrono::{Local, Utc};
use colored::Colorize;
use shared::config::ScannerConfig;
use shared::models::WatchEntry;
use shared::Result;
use std::time::Duration;
use tracing::{debug, info, warn};

use blockchain::SolanaClient;

use crate::evaluate::{
    evaluate_account, resolve_token_balance, AccountReading, AccountReport, ActivityStatus,
    ScanOutcome, SkipReason, Thresholds,
};
use crate::report::{format_elapsed, ReportTable, TIMESTAMP_FORMAT};

/// Drives the watchlist through the per-account pipeline, one account at
/// a time, and accumulates the report.
pub struct Scanner {
    client: SolanaClient,
    thresholds: Thresholds,
    pacing: Duration,
    token_symbol: String,
}

impl Scanner {
    pub fn new(client: SolanaClient, config: &ScannerConfig) -> Self {
        Self {
            client,
            thresholds: Thresholds {
                stale_after: chrono::Duration::seconds(config.stale_threshold_secs),
                low_balance_sol: config.low_balance_threshold_sol,
            },
            pacing: Duration::from_secs(config.pacing_delay_secs),
            token_symbol: config.token_symbol.clone(),
        }
    }

    /// Walk the watchlist in order. A failing account is logged and left
    /// out of the report; the loop moves on to the next one.
    pub async fn run(&self, watchlist: &[WatchEntry]) -> ReportTable {
        let mut table = ReportTable::new(&self.token_symbol);

        for (index, entry) in watchlist.iter().enumerate() {
            println!(
                "{}",
                format!("Account: {}, Name: {}", entry.account, entry.name).cyan()
            );

            match self.scan_account(entry).await {
                Ok(ScanOutcome::Row(report)) => {
                    self.announce(&report);
                    table.push(report);
                }
                Ok(ScanOutcome::Skipped(SkipReason::NoSignatures)) => {
                    info!("No confirmed signatures found for {}", entry.name);
                }
                Ok(ScanOutcome::Skipped(SkipReason::MissingBlockTime)) => {
                    debug!(
                        "Latest signature for {} has no block time, skipping",
                        entry.name
                    );
                }
                Err(e) => {
                    warn!("Error scanning account {} ({}): {}", entry.name, entry.account, e);
                }
            }

            // Pacing runs between accounts, not after the last one
            if index + 1 < watchlist.len() && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        table
    }

    /// Fetch the three readings for one account and evaluate them.
    async fn scan_account(&self, entry: &WatchEntry) -> Result<ScanOutcome> {
        let token_accounts = self.client.get_token_accounts(&entry.account).await?;

        match resolve_token_balance(entry, &token_accounts)? {
            Some(balance) => println!(
                "{}",
                format!("{} Balance: {:.2} {}", self.token_symbol, balance, self.token_symbol)
                    .green()
            ),
            None => println!(
                "No {} balance found for {} with pubkey {}",
                self.token_symbol, entry.name, entry.target_pubkey
            ),
        }

        let lamports = self.client.get_sol_balance(&entry.account).await?;
        let latest_signature = self.client.get_latest_signature(&entry.account).await?;

        let reading = AccountReading {
            token_accounts,
            lamports,
            latest_signature,
        };

        evaluate_account(entry, &reading, Utc::now(), &self.thresholds)
    }

    fn announce(&self, report: &AccountReport) {
        let line = format!(
            "Last Confirmed Signature: {} ({})",
            report
                .last_activity
                .with_timezone(&Local)
                .format(TIMESTAMP_FORMAT),
            format_elapsed(report.elapsed),
        );

        match report.activity {
            ActivityStatus::Active => println!("{}\n", line.green()),
            ActivityStatus::Stale => println!("{}\n", line.red()),
        }
    }
}
