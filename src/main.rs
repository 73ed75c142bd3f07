use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use wallet_views::application::app;
use wallet_views::domain::calendar::FixedOffsetCalendar;
use wallet_views::domain::models::LedgerId;
use wallet_views::infrastructure::{logging, shutdown::ShutdownChannel};
use wallet_views::service;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Per-account ledger views (balances, daily history, counterparties) with REST API"
)]
struct WalletViewsProgram {
    /// Listen port REST API
    #[arg(short, long, default_value_t = 3000)]
    listen_port: u16,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Hours east of UTC at which calendar days start
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_hours: i32,

    /// Identifier of the ledger served by this process
    #[arg(long, default_value_t = 1)]
    ledger_id: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = WalletViewsProgram::parse();

    logging::init(&args.log_level)?;

    let calendar = FixedOffsetCalendar::from_hours(args.utc_offset_hours)
        .ok_or_else(|| anyhow!("UTC offset out of range: {}", args.utc_offset_hours))?;

    let shutdown = ShutdownChannel::new();

    let app = Arc::new(app::App::new(
        Arc::new(calendar),
        LedgerId::new(args.ledger_id),
    ));

    // Start the API server
    let server_handle = tokio::spawn(service::api::start_server(
        shutdown.clone(),
        app.clone(),
        args.listen_port,
    ));

    // Wait for shutdown signal
    signal::ctrl_c().await?;
    tracing::warn!("Received Ctrl+C, shutting down...");
    shutdown.trigger();

    if let Err(e) = server_handle.await? {
        tracing::error!("API server error: {:?}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
