//! Dashboard MCP Tools
//!
//! Load data into the shared dashboard state (local store or backend API),
//! adjust its date filter, and render it.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{Clock, DatePreset};
use crate::client::VitalsFetcher;
use crate::dashboard::{DashboardState, DashboardView};
use crate::db::Database;
use crate::models::{VitalRecord, VitalsReading};

/// Where the dashboard pulls its readings from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Store,
    Api,
}

impl DataSource {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "store" | "local" | "db" => Some(DataSource::Store),
            "api" | "backend" | "remote" => Some(DataSource::Api),
            _ => None,
        }
    }
}

/// Response for load_from_store and sync_from_api
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub source: &'static str,
    pub readings_loaded: usize,
    pub overview_loaded: bool,
    /// False when a newer load superseded this one
    pub applied: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

fn lock(state: &Mutex<DashboardState>) -> Result<MutexGuard<'_, DashboardState>, String> {
    state
        .lock()
        .map_err(|_| "Dashboard state is unavailable (lock poisoned)".to_string())
}

fn parse_preset(preset: &str) -> Result<DatePreset, String> {
    preset.parse().map_err(|e| format!("{}", e))
}

/// `Some("")` clears a bound; anything else must be `YYYY-MM-DD`
fn parse_bound(raw: &str) -> Result<Option<String>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|_| Some(trimmed.to_string()))
        .map_err(|_| format!("Invalid date: '{}'. Use YYYY-MM-DD", raw))
}

/// Replace the dashboard data with everything in the local store
pub fn load_from_store(
    db: &Database,
    state: &Mutex<DashboardState>,
    clock: &dyn Clock,
) -> Result<LoadResponse, String> {
    let ticket = lock(state)?.begin_load();

    let records = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))
        .and_then(|conn| {
            VitalRecord::list(&conn, None).map_err(|e| format!("Failed to list readings: {}", e))
        });
    let records = match records {
        Ok(records) => records,
        Err(e) => {
            lock(state)?.cancel_load(ticket);
            return Err(e);
        }
    };

    let readings: Vec<VitalsReading> = records.iter().map(VitalRecord::to_reading).collect();
    let readings_loaded = readings.len();
    let applied = lock(state)?.finish_load(ticket, Some(readings), None, clock);

    Ok(LoadResponse {
        source: "store",
        readings_loaded,
        overview_loaded: false,
        applied,
        warnings: Vec::new(),
    })
}

/// Fetch the vitals list and overview from the backend concurrently and apply
/// them. One failed request is tolerated and the previous data for that part is
/// kept; both failing is an error and leaves the state untouched.
pub async fn sync_from_api(
    fetcher: &dyn VitalsFetcher,
    patient_id: Option<&str>,
    state: &Mutex<DashboardState>,
    clock: &dyn Clock,
) -> Result<LoadResponse, String> {
    let ticket = lock(state)?.begin_load();

    let (vitals, overview) = tokio::join!(fetcher.fetch_vitals(), fetcher.fetch_overview(patient_id));

    let mut warnings = Vec::new();
    let vitals = match vitals {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch vitals list");
            warnings.push(format!("Vitals list unavailable: {}", e));
            None
        }
    };
    let overview = match overview {
        Ok(o) => Some(o),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch health overview");
            warnings.push(format!("Overview unavailable: {}", e));
            None
        }
    };

    if vitals.is_none() && overview.is_none() {
        lock(state)?.cancel_load(ticket);
        return Err(format!("Failed to load vitals from API: {}", warnings.join("; ")));
    }

    let readings_loaded = vitals.as_ref().map(Vec::len).unwrap_or(0);
    let overview_loaded = overview.is_some();
    let applied = lock(state)?.finish_load(ticket, vitals, overview, clock);

    Ok(LoadResponse {
        source: "api",
        readings_loaded,
        overview_loaded,
        applied,
        warnings,
    })
}

/// Render the dashboard, optionally applying a preset and then explicit bounds first
pub fn get_vitals_dashboard(
    state: &Mutex<DashboardState>,
    clock: &dyn Clock,
    preset: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DashboardView, String> {
    let preset = preset.map(parse_preset).transpose()?;
    let start = start.map(parse_bound).transpose()?;
    let end = end.map(parse_bound).transpose()?;

    let mut state = lock(state)?;
    if let Some(preset) = preset {
        state.select_preset(preset, clock);
    }
    if let Some(start) = start {
        state.set_start(start);
    }
    if let Some(end) = end {
        state.set_end(end);
    }

    Ok(state.view(clock))
}

/// Switch to a preset, discarding manual edits
pub fn set_dashboard_preset(
    state: &Mutex<DashboardState>,
    clock: &dyn Clock,
    preset: &str,
) -> Result<DashboardView, String> {
    let preset = parse_preset(preset)?;
    let mut state = lock(state)?;
    state.select_preset(preset, clock);
    Ok(state.view(clock))
}

/// Manually set either bound; an empty string clears it
pub fn set_dashboard_range(
    state: &Mutex<DashboardState>,
    clock: &dyn Clock,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DashboardView, String> {
    if start.is_none() && end.is_none() {
        return Err("Provide start_date and/or end_date".to_string());
    }
    get_vitals_dashboard(state, clock, None, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{FixedClock, Granularity};
    use crate::client::ClientError;
    use crate::models::{HealthOverview, VitalRecordCreate};
    use async_trait::async_trait;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock::on_date(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap())
    }

    fn state() -> Mutex<DashboardState> {
        Mutex::new(DashboardState::new(DatePreset::LastDays(7), &clock()))
    }

    struct StubFetcher {
        vitals: Option<Vec<VitalsReading>>,
        overview: Option<HealthOverview>,
    }

    fn unavailable(path: &str) -> ClientError {
        ClientError::Status {
            status: 503,
            path: path.to_string(),
            body: String::new(),
        }
    }

    #[async_trait]
    impl VitalsFetcher for StubFetcher {
        async fn fetch_vitals(&self) -> Result<Vec<VitalsReading>, ClientError> {
            self.vitals.clone().ok_or_else(|| unavailable("/health/vitals/"))
        }

        async fn fetch_overview(&self, _patient_id: Option<&str>) -> Result<HealthOverview, ClientError> {
            self.overview.clone().ok_or_else(|| unavailable("/health/overview/"))
        }
    }

    fn remote(date: &str, systolic: f64, diastolic: Option<f64>) -> VitalsReading {
        VitalsReading {
            date: date.to_string(),
            systolic: Some(systolic),
            diastolic,
            ..Default::default()
        }
    }

    #[test]
    fn test_data_source_aliases() {
        assert_eq!(DataSource::from_str("local"), Some(DataSource::Store));
        assert_eq!(DataSource::from_str("API"), Some(DataSource::Api));
        assert_eq!(DataSource::from_str("cloud"), None);
    }

    #[test]
    fn test_load_from_store_and_render() {
        let db = Database::open_in_memory().unwrap();
        {
            let conn = db.get_conn().unwrap();
            for (date, sys) in [("2024-01-18", 120), ("2024-01-19", 130), ("2024-01-02", 150)] {
                VitalRecord::create(
                    &conn,
                    &VitalRecordCreate {
                        date: date.to_string(),
                        blood_pressure_systolic: Some(sys),
                        blood_pressure_diastolic: Some(80),
                        ..Default::default()
                    },
                )
                .unwrap();
            }
        }

        let state = state();
        let loaded = load_from_store(&db, &state, &clock()).unwrap();
        assert_eq!(loaded.readings_loaded, 3);
        assert!(loaded.applied);

        let view = get_vitals_dashboard(&state, &clock(), None, None, None).unwrap();
        assert_eq!(view.vitals.mode, Granularity::MultiDay);
        assert_eq!(view.vitals.daily.len(), 2);
        let systolic = view.vitals.summary.systolic.unwrap();
        assert_eq!((systolic.min, systolic.avg, systolic.max), (120, 125, 130));
    }

    #[tokio::test]
    async fn test_sync_from_api() {
        let fetcher = StubFetcher {
            vitals: Some(vec![remote("2024-01-20", 120.0, Some(80.0)), remote("2024-01-20", 130.0, Some(85.0))]),
            overview: Some(HealthOverview::default()),
        };
        let state = state();

        let loaded = sync_from_api(&fetcher, Some("101"), &state, &clock()).await.unwrap();
        assert_eq!(loaded.readings_loaded, 2);
        assert!(loaded.overview_loaded);
        assert!(loaded.warnings.is_empty());

        let view = set_dashboard_preset(&state, &clock(), "today").unwrap();
        assert_eq!(view.vitals.mode, Granularity::SingleDay);
        assert_eq!(view.vitals.points.len(), 2);
    }

    #[tokio::test]
    async fn test_sync_falls_back_to_overview_vitals() {
        let overview = HealthOverview::from_json(&json!({
            "vitals": [ { "date": "2024-01-19", "bloodPressure": 118 } ]
        }));
        let fetcher = StubFetcher {
            vitals: None,
            overview: Some(overview),
        };
        let state = state();

        let loaded = sync_from_api(&fetcher, None, &state, &clock()).await.unwrap();
        assert_eq!(loaded.readings_loaded, 0);
        assert_eq!(loaded.warnings.len(), 1);

        let view = get_vitals_dashboard(&state, &clock(), None, None, None).unwrap();
        assert_eq!(view.vitals.readings.len(), 1);
        assert!(view.vitals.diastolic_missing);
        assert!(view.vitals.summary.diastolic.is_none());
    }

    #[tokio::test]
    async fn test_failed_vitals_request_keeps_previous_list() {
        let state = state();
        let good = StubFetcher {
            vitals: Some(vec![remote("2024-01-19", 120.0, Some(80.0))]),
            overview: Some(HealthOverview::default()),
        };
        sync_from_api(&good, None, &state, &clock()).await.unwrap();
        assert_eq!(state.lock().unwrap().series().len(), 1);

        let flaky = StubFetcher {
            vitals: None,
            overview: Some(HealthOverview::from_json(&json!({
                "vitals": [ { "date": "2024-01-20", "bloodPressure": 140 } ]
            }))),
        };
        let loaded = sync_from_api(&flaky, None, &state, &clock()).await.unwrap();
        assert!(loaded.applied);
        assert_eq!(loaded.warnings.len(), 1);

        let state = state.lock().unwrap();
        assert_eq!(state.series().len(), 1);
        assert_eq!(state.series()[0].systolic, Some(120.0));
    }

    #[tokio::test]
    async fn test_failed_sync_does_not_supersede_pending_load() {
        let state = state();
        let older = state.lock().unwrap().begin_load();

        let down = StubFetcher {
            vitals: None,
            overview: None,
        };
        assert!(sync_from_api(&down, None, &state, &clock()).await.is_err());

        let mut state = state.lock().unwrap();
        assert!(state.finish_load(older, Some(vec![remote("2024-01-19", 118.0, Some(76.0))]), None, &clock()));
        assert_eq!(state.series().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_fails_when_both_requests_fail() {
        let fetcher = StubFetcher {
            vitals: None,
            overview: None,
        };
        let state = state();
        let err = sync_from_api(&fetcher, None, &state, &clock()).await.unwrap_err();
        assert!(err.contains("503"));
        assert!(!state.lock().unwrap().is_loaded());
    }

    #[test]
    fn test_manual_range_and_clear() {
        let state = state();
        let view = set_dashboard_range(&state, &clock(), Some("2024-01-01"), None).unwrap();
        assert_eq!(view.vitals.range.start.as_deref(), Some("2024-01-01"));
        assert_eq!(view.vitals.range.end.as_deref(), Some("2024-01-20"));
        assert!(view.manual_range);

        let view = set_dashboard_range(&state, &clock(), Some(""), None).unwrap();
        assert_eq!(view.vitals.range.start, None);

        assert!(set_dashboard_range(&state, &clock(), Some("Jan 1"), None).is_err());
        assert!(set_dashboard_range(&state, &clock(), None, None).is_err());
    }

    #[test]
    fn test_invalid_preset() {
        let err = set_dashboard_preset(&state(), &clock(), "fortnight").unwrap_err();
        assert!(err.contains("Invalid date preset"));
    }
}
