use blockchain::types::{SignatureInfo, TokenAccountEntry};
use chrono::{DateTime, Duration, Utc};
use shared::models::WatchEntry;
use shared::{Error, Result};
use solana_sdk::native_token::lamports_to_sol;

/// Everything fetched for one account before evaluation.
#[derive(Debug, Clone)]
pub struct AccountReading {
    pub token_accounts: Vec<TokenAccountEntry>,
    pub lamports: u64,
    pub latest_signature: Option<SignatureInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Active,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceHealth {
    Healthy,
    Low,
}

/// Why an account produced no report row this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The address has no confirmed signatures at all.
    NoSignatures,
    /// A signature exists but carries no block time.
    MissingBlockTime,
}

/// Result of evaluating one account: a finished report entry, or the
/// reason the account is left out of this cycle.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Row(AccountReport),
    Skipped(SkipReason),
}

/// Computed balances and activity for one account, before the report
/// table assigns it an ID.
#[derive(Debug, Clone)]
pub struct AccountReport {
    pub name: String,
    pub account: String,
    pub sol_balance: f64,
    pub token_balance: f64,
    pub last_activity: DateTime<Utc>,
    pub elapsed: Duration,
    pub activity: ActivityStatus,
    pub health: BalanceHealth,
}

#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Accounts whose last activity is older than this are flagged stale
    pub stale_after: Duration,
    /// SOL balances below this are flagged low
    pub low_balance_sol: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stale_after: Duration::hours(3),
            low_balance_sol: 0.025,
        }
    }
}

/// Find the balance of the watched token account, scaled to display units.
///
/// A missing entry is not an error; the wallet simply holds none of the
/// watched token. An unparseable raw amount is a per-account error.
pub fn resolve_token_balance(
    entry: &WatchEntry,
    token_accounts: &[TokenAccountEntry],
) -> Result<Option<f64>> {
    let Some(found) = token_accounts.iter().find(|t| t.pubkey == entry.target_pubkey) else {
        return Ok(None);
    };

    let raw: u64 = found.amount.parse().map_err(|e| {
        Error::InvalidTokenAmount(format!(
            "amount {:?} for {}: {}",
            found.amount, entry.name, e
        ))
    })?;

    Ok(Some(spl_token::amount_to_ui_amount(raw, found.decimals)))
}

/// Stale strictly beyond the cutoff; exactly at the cutoff is still active.
pub fn classify_activity(elapsed: Duration, stale_after: Duration) -> ActivityStatus {
    if elapsed > stale_after {
        ActivityStatus::Stale
    } else {
        ActivityStatus::Active
    }
}

/// Low strictly below the cutoff; exactly at the cutoff is still healthy.
pub fn classify_health(sol_balance: f64, low_threshold: f64) -> BalanceHealth {
    if sol_balance < low_threshold {
        BalanceHealth::Low
    } else {
        BalanceHealth::Healthy
    }
}

/// Evaluate one account from its three RPC readings.
///
/// The RPC reports a missing block time either as null or as zero; both
/// mean the account has nothing to anchor its activity to, so it yields
/// no row.
pub fn evaluate_account(
    entry: &WatchEntry,
    reading: &AccountReading,
    now: DateTime<Utc>,
    thresholds: &Thresholds,
) -> Result<ScanOutcome> {
    let token_balance = resolve_token_balance(entry, &reading.token_accounts)?.unwrap_or(0.0);
    let sol_balance = lamports_to_sol(reading.lamports);

    let Some(signature) = &reading.latest_signature else {
        return Ok(ScanOutcome::Skipped(SkipReason::NoSignatures));
    };

    let Some(block_time) = signature.block_time.filter(|t| *t != 0) else {
        return Ok(ScanOutcome::Skipped(SkipReason::MissingBlockTime));
    };

    let last_activity = DateTime::from_timestamp(block_time, 0)
        .ok_or_else(|| Error::SolanaRpc(format!("Block time {} out of range", block_time)))?;
    let elapsed = now - last_activity;

    Ok(ScanOutcome::Row(AccountReport {
        name: entry.name.clone(),
        account: entry.account.clone(),
        sol_balance,
        token_balance,
        last_activity,
        elapsed,
        activity: classify_activity(elapsed, thresholds.stale_after),
        health: classify_health(sol_balance, thresholds.low_balance_sol),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> WatchEntry {
        WatchEntry {
            account: "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".to_string(),
            target_pubkey: "T1".to_string(),
            name: "node-01".to_string(),
        }
    }

    fn token_account(pubkey: &str, amount: &str, decimals: u8) -> TokenAccountEntry {
        TokenAccountEntry {
            pubkey: pubkey.to_string(),
            mint: "nosXBVoaCTtYdLvKY6Csb4AC8JCdQKKAaWYtx2ZMoo7".to_string(),
            amount: amount.to_string(),
            decimals,
        }
    }

    fn signature_at(block_time: Option<i64>) -> SignatureInfo {
        SignatureInfo {
            signature: "5j7s6NiJS3JAkvgkoc18WVAsiSaci2pxB2A6ueCJP4tprA2TFg9wSyTLeYouxPBJEMzJinENTkpA52YStRW5Dia7".to_string(),
            slot: 250_000_000,
            block_time,
            confirmation_status: None,
        }
    }

    fn reading(
        token_accounts: Vec<TokenAccountEntry>,
        lamports: u64,
        latest_signature: Option<SignatureInfo>,
    ) -> AccountReading {
        AccountReading {
            token_accounts,
            lamports,
            latest_signature,
        }
    }

    // A fixed whole-second instant keeps elapsed arithmetic exact.
    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_755_000_000, 0).unwrap()
    }

    #[test]
    fn test_resolve_token_balance_scales_by_decimals() {
        let accounts = vec![token_account("T1", "150000000", 8)];
        let balance = resolve_token_balance(&entry(), &accounts).unwrap();
        assert_eq!(balance, Some(1.5));
    }

    #[test]
    fn test_resolve_token_balance_decimals_zero_means_no_scaling() {
        let accounts = vec![token_account("T1", "42", 0)];
        let balance = resolve_token_balance(&entry(), &accounts).unwrap();
        assert_eq!(balance, Some(42.0));
    }

    #[test]
    fn test_resolve_token_balance_missing_entry_is_none_not_error() {
        let accounts = vec![token_account("some-other-account", "42", 0)];
        let balance = resolve_token_balance(&entry(), &accounts).unwrap();
        assert_eq!(balance, None);
    }

    #[test]
    fn test_resolve_token_balance_bad_amount_is_per_account_error() {
        let accounts = vec![token_account("T1", "not-a-number", 8)];
        let result = resolve_token_balance(&entry(), &accounts);
        assert!(matches!(result, Err(Error::InvalidTokenAmount(_))));
    }

    #[test]
    fn test_activity_boundary_exactly_at_cutoff_is_active() {
        let cutoff = Duration::hours(3);
        assert_eq!(classify_activity(cutoff, cutoff), ActivityStatus::Active);
        assert_eq!(
            classify_activity(cutoff + Duration::seconds(1), cutoff),
            ActivityStatus::Stale
        );
        assert_eq!(
            classify_activity(Duration::seconds(60), cutoff),
            ActivityStatus::Active
        );
    }

    #[test]
    fn test_health_boundary_exactly_at_cutoff_is_healthy() {
        assert_eq!(classify_health(0.025, 0.025), BalanceHealth::Healthy);
        assert_eq!(classify_health(0.5, 0.025), BalanceHealth::Healthy);
        assert_eq!(classify_health(0.0249, 0.025), BalanceHealth::Low);
    }

    #[test]
    fn test_evaluate_produces_row_with_converted_balances() {
        let now = fixed_now();
        let r = reading(
            vec![token_account("T1", "150000000", 8)],
            500_000_000,
            Some(signature_at(Some(now.timestamp() - 60))),
        );

        let outcome = evaluate_account(&entry(), &r, now, &Thresholds::default()).unwrap();
        let ScanOutcome::Row(report) = outcome else {
            panic!("Expected a report row");
        };

        assert_eq!(report.token_balance, 1.5);
        assert_eq!(report.sol_balance, 0.5);
        assert_eq!(report.elapsed, Duration::seconds(60));
        assert_eq!(report.activity, ActivityStatus::Active);
        assert_eq!(report.health, BalanceHealth::Healthy);
    }

    #[test]
    fn test_evaluate_missing_token_account_reports_zero_balance() {
        let now = fixed_now();
        let r = reading(
            Vec::new(),
            500_000_000,
            Some(signature_at(Some(now.timestamp() - 60))),
        );

        let outcome = evaluate_account(&entry(), &r, now, &Thresholds::default()).unwrap();
        let ScanOutcome::Row(report) = outcome else {
            panic!("Expected a report row");
        };

        assert_eq!(report.token_balance, 0.0);
    }

    #[test]
    fn test_evaluate_no_signatures_skips() {
        let now = fixed_now();
        let r = reading(vec![token_account("T1", "150000000", 8)], 500_000_000, None);

        let outcome = evaluate_account(&entry(), &r, now, &Thresholds::default()).unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Skipped(SkipReason::NoSignatures)
        ));
    }

    #[test]
    fn test_evaluate_zero_block_time_skips() {
        let now = fixed_now();
        let r = reading(
            vec![token_account("T1", "150000000", 8)],
            500_000_000,
            Some(signature_at(Some(0))),
        );

        let outcome = evaluate_account(&entry(), &r, now, &Thresholds::default()).unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Skipped(SkipReason::MissingBlockTime)
        ));
    }

    #[test]
    fn test_evaluate_null_block_time_skips() {
        let now = fixed_now();
        let r = reading(
            vec![token_account("T1", "150000000", 8)],
            500_000_000,
            Some(signature_at(None)),
        );

        let outcome = evaluate_account(&entry(), &r, now, &Thresholds::default()).unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Skipped(SkipReason::MissingBlockTime)
        ));
    }

    #[test]
    fn test_evaluate_stale_account_past_cutoff() {
        let now = fixed_now();
        let four_hours_ago = now.timestamp() - 4 * 3600;
        let r = reading(
            vec![token_account("T1", "150000000", 8)],
            10_000_000,
            Some(signature_at(Some(four_hours_ago))),
        );

        let outcome = evaluate_account(&entry(), &r, now, &Thresholds::default()).unwrap();
        let ScanOutcome::Row(report) = outcome else {
            panic!("Expected a report row");
        };

        assert_eq!(report.activity, ActivityStatus::Stale);
        // 0.01 SOL, below the 0.025 cutoff
        assert_eq!(report.health, BalanceHealth::Low);
    }
}
