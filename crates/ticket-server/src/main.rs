//! UDP ticket server.

use clap::Parser;
use ticket_server::config::Config;
use ticket_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let inventory = config.load_inventory()?;
    info!(
        file = %config.events_file.display(),
        events = inventory.len(),
        "inventory loaded"
    );

    tokio::select! {
        result = server::run(config, inventory) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
            Ok(())
        }
    }
}
