//! Print the vitals dashboard as JSON
//!
//! Usage: vitals_report [PRESET] [--api]
//!
//! PRESET defaults to TELEMED_DEFAULT_PRESET (7d). With --api the readings are
//! fetched from the backend instead of the local store.

use std::sync::Mutex;

use telemed_vitals::analytics::{DatePreset, SystemClock};
use telemed_vitals::client::ApiClient;
use telemed_vitals::config::Config;
use telemed_vitals::dashboard::DashboardState;
use telemed_vitals::db::Database;
use telemed_vitals::tools::dashboard;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let mut use_api = false;
    let mut preset = config.default_preset;
    for arg in std::env::args().skip(1) {
        if arg == "--api" {
            use_api = true;
        } else {
            preset = arg.parse::<DatePreset>()?;
        }
    }

    let clock = SystemClock;
    let state = Mutex::new(DashboardState::new(preset, &clock));

    let loaded = if use_api {
        let client = ApiClient::new(config.api_url.clone(), config.api_token.clone());
        eprintln!("Fetching from {}", client.base_url());
        dashboard::sync_from_api(&client, config.patient_id.as_deref(), &state, &clock).await?
    } else {
        eprintln!("Database path: {}", config.database_path.display());
        let database = Database::open(&config.database_path)?;
        dashboard::load_from_store(&database, &state, &clock)?
    };
    for warning in &loaded.warnings {
        eprintln!("Warning: {}", warning);
    }

    let view = dashboard::get_vitals_dashboard(&state, &clock, None, None, None)?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
