pub mod client;
pub mod types;

pub use client::SolanaClient;
pub use types::*;
