use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Solana RPC error: {0}")]
    SolanaRpc(String),

    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(String),

    #[error("Invalid token amount: {0}")]
    InvalidTokenAmount(String),
}

pub type Result<T> = std::result::Result<T, Error>;
