mod app;
mod client;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Arc};

use tracing_subscriber::EnvFilter;

use crate::{
    client::SupabaseClient,
    config::AppConfig,
    error::{AppError, Result},
};

/// Logs go to a file: the terminal belongs to the UI.
fn init_logging(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let level = &config.log_level;
    let filter = EnvFilter::try_new(format!("expense_tui={level},engine={level}"))
        .map_err(|err| AppError::Logging(err.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_logging(&config)?;
    tracing::info!(url = %config.supabase_url, table = %config.table, "starting");

    let client = SupabaseClient::new(&config)?;
    let mut app = app::App::new(&config, Arc::new(client.clone()), Arc::new(client));
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!("exiting with error: {err}");
    }
    result
}
