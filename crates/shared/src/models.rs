use serde::{Deserialize, Serialize};

/// One watched account: the wallet address, the token account to read
/// the balance from, and a display name for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    pub account: String,
    pub target_pubkey: String,
    pub name: String,
}
