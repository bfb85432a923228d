//! Telemed Vitals
//!
//! An MCP server for vitals recording and dashboard aggregation.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use telemed_vitals::analytics::SystemClock;
use telemed_vitals::client::ApiClient;
use telemed_vitals::config::Config;
use telemed_vitals::dashboard::DashboardState;
use telemed_vitals::db::Database;
use telemed_vitals::mcp::VitalsService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("telemed_vitals=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    eprintln!("Telemed Vitals v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    eprintln!("Database path: {}", config.database_path.display());
    eprintln!("Backend API: {}", config.api_url);

    let database = Database::open(&config.database_path)?;

    let clock = Arc::new(SystemClock);
    let dashboard = DashboardState::new(config.default_preset, clock.as_ref());
    let fetcher = Arc::new(ApiClient::new(config.api_url.clone(), config.api_token.clone()));

    let service = VitalsService::new(database, dashboard, fetcher, clock, config.patient_id.clone());

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
