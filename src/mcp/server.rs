//! Telemed Vitals MCP Server Implementation
//!
//! Exposes the readings store and the vitals dashboard as MCP tools.

use std::sync::{Arc, Mutex};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::analytics::Clock;
use crate::client::VitalsFetcher;
use crate::dashboard::DashboardState;
use crate::db::Database;
use crate::models::{VitalRecordCreate, VitalRecordUpdate};
use crate::tools::dashboard::{self, DataSource};
use crate::tools::readings;

/// Telemed Vitals MCP Service
#[derive(Clone)]
pub struct VitalsService {
    database: Database,
    dashboard: Arc<Mutex<DashboardState>>,
    fetcher: Arc<dyn VitalsFetcher>,
    clock: Arc<dyn Clock>,
    patient_id: Option<String>,
    tool_router: ToolRouter<VitalsService>,
}

impl VitalsService {
    pub fn new(
        database: Database,
        dashboard: DashboardState,
        fetcher: Arc<dyn VitalsFetcher>,
        clock: Arc<dyn Clock>,
        patient_id: Option<String>,
    ) -> Self {
        Self {
            database,
            dashboard: Arc::new(Mutex::new(dashboard)),
            fetcher,
            clock,
            patient_id,
            tool_router: Self::tool_router(),
        }
    }

    async fn refresh(&self, source: DataSource, patient_id: Option<&str>) -> Result<dashboard::LoadResponse, String> {
        match source {
            DataSource::Store => dashboard::load_from_store(&self.database, &self.dashboard, self.clock.as_ref()),
            DataSource::Api => {
                let patient_id = patient_id.or(self.patient_id.as_deref());
                dashboard::sync_from_api(self.fetcher.as_ref(), patient_id, &self.dashboard, self.clock.as_ref()).await
            }
        }
    }

    fn is_loaded(&self) -> bool {
        self.dashboard.lock().map(|s| s.is_loaded()).unwrap_or(false)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Reading Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordVitalReadingParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
    /// Systolic blood pressure (mmHg)
    pub systolic: Option<i64>,
    /// Diastolic blood pressure (mmHg)
    pub diastolic: Option<i64>,
    /// Heart rate (BPM)
    pub heart_rate: Option<i64>,
    /// Weight (lbs)
    pub weight: Option<f64>,
    /// Blood sugar (mg/dL)
    pub blood_sugar: Option<i64>,
    /// Temperature (°F)
    pub temperature: Option<f64>,
    pub notes: Option<String>,
    /// ISO 8601 timestamp; defaults to now
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadingIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListVitalReadingsParams {
    /// Inclusive start date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Only readings with this metric (systolic, diastolic, heart_rate, weight, blood_sugar, temperature)
    pub metric: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateVitalReadingParams {
    pub id: i64,
    pub date: Option<String>,
    pub systolic: Option<i64>,
    pub diastolic: Option<i64>,
    pub heart_rate: Option<i64>,
    pub weight: Option<f64>,
    pub blood_sugar: Option<i64>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
}

// ============================================================================
// Dashboard Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetVitalsDashboardParams {
    /// today, yesterday, <N>d (7d, 30d, 90d) or all
    pub preset: Option<String>,
    /// Manual start date (YYYY-MM-DD); "" clears it
    pub start_date: Option<String>,
    /// Manual end date (YYYY-MM-DD); "" clears it
    pub end_date: Option<String>,
    /// Reload first from "store" or "api"
    pub source: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetDashboardPresetParams {
    pub preset: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetDashboardRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SyncVitalsParams {
    /// Overrides the configured patient
    pub patient_id: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl VitalsService {
    #[tool(description = "Get instructions for recording vitals and reading the vitals dashboard. Call this when starting a vitals session.")]
    fn vitals_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::instructions::VITALS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(VITALS_INSTRUCTIONS)]))
    }

    // --- Readings ---

    #[tool(description = "Record a vital reading (any of blood pressure, heart rate, weight, blood sugar, temperature) for a date")]
    fn record_vital_reading(&self, Parameters(p): Parameters<RecordVitalReadingParams>) -> Result<CallToolResult, McpError> {
        let data = VitalRecordCreate {
            date: p.date,
            blood_pressure_systolic: p.systolic,
            blood_pressure_diastolic: p.diastolic,
            heart_rate: p.heart_rate,
            weight: p.weight,
            blood_sugar: p.blood_sugar,
            temperature: p.temperature,
            notes: p.notes,
            created_at: p.created_at,
        };
        let result = readings::record_vital_reading(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a vital reading by ID")]
    fn get_vital_reading(&self, Parameters(p): Parameters<ReadingIdParams>) -> Result<CallToolResult, McpError> {
        let result = readings::get_vital_reading(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(reading) => to_json(&reading),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Reading not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List vital readings newest first, optionally within a date range and/or only those with a given metric")]
    fn list_vital_readings(&self, Parameters(p): Parameters<ListVitalReadingsParams>) -> Result<CallToolResult, McpError> {
        let result = readings::list_vital_readings(&self.database, p.start_date.as_deref(), p.end_date.as_deref(), p.metric.as_deref(), p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update fields of a vital reading; omitted fields are left unchanged")]
    fn update_vital_reading(&self, Parameters(p): Parameters<UpdateVitalReadingParams>) -> Result<CallToolResult, McpError> {
        let data = VitalRecordUpdate {
            date: p.date,
            blood_pressure_systolic: p.systolic,
            blood_pressure_diastolic: p.diastolic,
            heart_rate: p.heart_rate,
            weight: p.weight,
            blood_sugar: p.blood_sugar,
            temperature: p.temperature,
            notes: p.notes,
        };
        let result = readings::update_vital_reading(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(reading) => to_json(&reading),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Reading not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Delete a vital reading")]
    fn delete_vital_reading(&self, Parameters(p): Parameters<ReadingIdParams>) -> Result<CallToolResult, McpError> {
        let result = readings::delete_vital_reading(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Dashboard ---

    #[tool(description = "Get the vitals dashboard: filtered readings, single-day chart points or per-day avg/min/max/range, blood pressure summary and the missing-diastolic flag. Optionally apply a preset or manual dates, or reload from \"store\" or \"api\" first.")]
    async fn get_vitals_dashboard(&self, Parameters(p): Parameters<GetVitalsDashboardParams>) -> Result<CallToolResult, McpError> {
        let source = match p.source.as_deref() {
            Some(s) => Some(DataSource::from_str(s).ok_or_else(|| {
                McpError::internal_error(format!("Invalid source: '{}'. Valid sources: store, api", s), None)
            })?),
            None if !self.is_loaded() => Some(DataSource::Store),
            None => None,
        };
        if let Some(source) = source {
            self.refresh(source, None).await.map_err(|e| McpError::internal_error(e, None))?;
        }

        let result = dashboard::get_vitals_dashboard(
            &self.dashboard,
            self.clock.as_ref(),
            p.preset.as_deref(),
            p.start_date.as_deref(),
            p.end_date.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Switch the dashboard to a date preset (today, yesterday, 7d, 30d, 90d, <N>d, all). Replaces any manual dates.")]
    fn set_dashboard_preset(&self, Parameters(p): Parameters<SetDashboardPresetParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::set_dashboard_preset(&self.dashboard, self.clock.as_ref(), &p.preset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Manually set the dashboard start and/or end date (YYYY-MM-DD). Pass an empty string to clear a bound.")]
    fn set_dashboard_range(&self, Parameters(p): Parameters<SetDashboardRangeParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::set_dashboard_range(
            &self.dashboard,
            self.clock.as_ref(),
            p.start_date.as_deref(),
            p.end_date.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Fetch the vitals list and health overview from the telemed backend into the dashboard")]
    async fn sync_vitals_from_api(&self, Parameters(p): Parameters<SyncVitalsParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .refresh(DataSource::Api, p.patient_id.as_deref())
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for VitalsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "telemed-vitals".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Telemed Vitals".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Telemed Vitals - vital sign recording and dashboard aggregation. \
                 IMPORTANT: Call vitals_instructions first. \
                 Readings: record/get/list/update/delete_vital_reading. \
                 Dashboard: get_vitals_dashboard (preset, start_date, end_date, source), \
                 set_dashboard_preset, set_dashboard_range. \
                 Backend: sync_vitals_from_api."
                    .into(),
            ),
        }
    }
}
