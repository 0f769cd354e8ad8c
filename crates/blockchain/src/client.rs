use anyhow::Context;
use shared::{Error, Result};
use solana_account_decoder::UiAccountData;
use solana_client::rpc_client::{GetConfirmedSignaturesForAddress2Config, RpcClient};
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::types::{SignatureInfo, TokenAccountEntry};

/// Solana client wrapper for the three RPC calls the scanner needs.
///
/// One network round trip per call, no retries; transport failures and
/// malformed responses surface as errors.
pub struct SolanaClient {
    client: RpcClient,
}

impl SolanaClient {
    /// Create a new Solana client for the given RPC endpoint
    pub fn new(rpc_url: String) -> Self {
        info!("Initializing Solana client with RPC: {}", rpc_url);

        let client = RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed());

        Self { client }
    }

    /// Validate a Solana wallet address format
    pub fn validate_address(&self, address: &str) -> Result<Pubkey> {
        Pubkey::from_str(address).map_err(|e| {
            warn!("Invalid wallet address format: {} - {}", address, e);
            Error::InvalidWalletAddress(format!("Invalid Solana address format: {}", e))
        })
    }

    /// Get all SPL token accounts for a wallet address.
    ///
    /// An empty list is a valid result; an entry the parser cannot walk
    /// fails the whole call.
    pub async fn get_token_accounts(&self, owner: &str) -> Result<Vec<TokenAccountEntry>> {
        let pubkey = self.validate_address(owner)?;

        debug!("Fetching token accounts for address: {}", owner);

        let accounts = self
            .client
            .get_token_accounts_by_owner(&pubkey, TokenAccountsFilter::ProgramId(spl_token::id()))
            .map_err(|e| Error::SolanaRpc(format!("getTokenAccountsByOwner failed: {}", e)))?;

        let mut entries = Vec::with_capacity(accounts.len());
        for account in accounts {
            let entry = parse_token_account(&account.pubkey, &account.account.data)
                .map_err(|e| Error::SolanaRpc(format!("Malformed token account in response: {}", e)))?;
            entries.push(entry);
        }

        debug!("Retrieved {} token accounts for {}", entries.len(), owner);
        Ok(entries)
    }

    /// Get SOL balance for a wallet address (in lamports)
    pub async fn get_sol_balance(&self, address: &str) -> Result<u64> {
        let pubkey = self.validate_address(address)?;

        debug!("Fetching SOL balance for address: {}", address);

        let balance = self
            .client
            .get_balance(&pubkey)
            .map_err(|e| Error::SolanaRpc(format!("getBalance failed: {}", e)))?;

        debug!("Retrieved SOL balance: {} lamports", balance);
        Ok(balance)
    }

    /// Get the most recent confirmed signature for an address.
    ///
    /// Returns `None` when the address has no signature history at all.
    pub async fn get_latest_signature(&self, address: &str) -> Result<Option<SignatureInfo>> {
        let pubkey = self.validate_address(address)?;

        debug!("Fetching latest signature for address: {}", address);

        let config = GetConfirmedSignaturesForAddress2Config {
            limit: Some(1),
            ..Default::default()
        };

        let signatures = self
            .client
            .get_signatures_for_address_with_config(&pubkey, config)
            .map_err(|e| Error::SolanaRpc(format!("getSignaturesForAddress failed: {}", e)))?;

        Ok(signatures.into_iter().next().map(|status| SignatureInfo {
            signature: status.signature,
            slot: status.slot,
            block_time: status.block_time,
            confirmation_status: status.confirmation_status,
        }))
    }

    /// Health check for Solana RPC connectivity
    pub async fn health_check(&self) -> Result<()> {
        self.client
            .get_latest_blockhash()
            .map_err(|e| Error::SolanaRpc(format!("Health check failed: {}", e)))?;

        Ok(())
    }
}

/// Walk a jsonParsed token account down to its pubkey, mint, raw amount
/// and decimals.
fn parse_token_account(pubkey: &str, data: &UiAccountData) -> anyhow::Result<TokenAccountEntry> {
    match data {
        UiAccountData::Json(parsed_account) => {
            let info = parsed_account
                .parsed
                .get("info")
                .ok_or_else(|| anyhow::anyhow!("Missing info field"))?;

            let mint = info
                .get("mint")
                .and_then(|v| v.as_str())
                .ok_or_else(|| anyhow::anyhow!("Missing mint field"))?
                .to_string();

            let token_amount = info
                .get("tokenAmount")
                .ok_or_else(|| anyhow::anyhow!("Missing tokenAmount field"))?;

            let amount = token_amount
                .get("amount")
                .and_then(|v| v.as_str())
                .ok_or_else(|| anyhow::anyhow!("Missing amount field"))?
                .to_string();

            let decimals = token_amount
                .get("decimals")
                .and_then(|v| v.as_u64())
                .ok_or_else(|| anyhow::anyhow!("Missing decimals field"))?;
            let decimals = u8::try_from(decimals).context("Decimals out of range")?;

            Ok(TokenAccountEntry {
                pubkey: pubkey.to_string(),
                mint,
                amount,
                decimals,
            })
        }
        _ => Err(anyhow::anyhow!("Expected JSON parsed account data")),
    }
}
