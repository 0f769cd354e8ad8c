use serde::{Deserialize, Serialize};
use solana_transaction_status::TransactionConfirmationStatus;

/// A token account owned by a watched wallet, from the jsonParsed encoding.
///
/// The amount stays as the textual integer the RPC returns; scaling to a
/// display value happens at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenAccountEntry {
    pub pubkey: String,
    pub mint: String,
    pub amount: String,
    pub decimals: u8,
}

/// The most recent confirmed signature for an address.
#[derive(Debug, Clone)]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    /// Unix seconds; the RPC may omit the timestamp entirely.
    pub block_time: Option<i64>,
    pub confirmation_status: Option<TransactionConfirmationStatus>,
}
