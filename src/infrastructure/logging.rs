use anyhow::Result;
use std::str::FromStr;
use tracing::Level;

/// Installs the global fmt subscriber at `log_level` ("info", "debug", ...).
pub fn init(log_level: &str) -> Result<()> {
    let level = Level::from_str(log_level)?;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
