use anyhow::Result;
use blockchain::SolanaClient;
use scanner::Scanner;
use shared::config::{load_watchlist, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scanner=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Solana watchlist scanner");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let watchlist = load_watchlist(&config.scanner.watchlist_path)?;
    tracing::info!("Watchlist loaded with {} accounts", watchlist.len());

    // Initialize Solana client
    let client = SolanaClient::new(config.solana.rpc_url.clone());
    if let Err(e) = client.health_check().await {
        tracing::warn!("RPC health check failed: {}", e);
    }

    let scanner = Scanner::new(client, &config.scanner);

    println!();
    let report = scanner.run(&watchlist).await;
    report.print();

    Ok(())
}
