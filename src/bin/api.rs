//! Daybook API Server
//!
//! Run with: cargo run --bin daybook-api
//!
//! # Configuration
//!
//! Read from the first `config.toml` found in the user config dir,
//! `/etc/daybook/` or the working directory, then overridden by:
//! - `DAYBOOK_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `DAYBOOK_API_PORT`: Port to listen on (default: 8086)
//! - `DAYBOOK_DEFAULT_PAGE_LIMIT` / `DAYBOOK_MAX_PAGE_LIMIT`: Page sizes
//! - `DAYBOOK_UTC_OFFSET_MINUTES`: Offset that decides "today"
//! - `DAYBOOK_LOG_LEVEL` / `DAYBOOK_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter, wins over the configured level

use daybook::api::{serve, AppState};
use daybook::config::Config;
use daybook::source::InMemoryStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = Config::load_default();
    daybook::logging::init(&loaded.config.logging)?;
    loaded.report();
    let config = loaded.config;

    tracing::info!("Starting Daybook API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        default_limit = config.pagination.default_limit,
        max_limit = config.pagination.max_limit,
        utc_offset_minutes = config.clock.utc_offset_minutes,
        "Configuration loaded"
    );

    let source = Arc::new(InMemoryStore::new());
    let state = AppState::new(source, config);

    serve(state).await?;

    Ok(())
}
