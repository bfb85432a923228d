//! Reading MCP Tools
//!
//! Record, inspect and edit vital readings in the local store.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{Metric, VitalRecord, VitalRecordCreate, VitalRecordUpdate};

/// Stored reading as returned by the tools
#[derive(Debug, Serialize)]
pub struct ReadingDetail {
    pub id: i64,
    pub date: String,
    pub blood_pressure: Option<String>,
    pub blood_pressure_systolic: Option<i64>,
    pub blood_pressure_diastolic: Option<i64>,
    pub heart_rate: Option<i64>,
    pub weight: Option<f64>,
    pub blood_sugar: Option<i64>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<VitalRecord> for ReadingDetail {
    fn from(record: VitalRecord) -> Self {
        let blood_pressure = record.to_reading().format_blood_pressure();
        Self {
            id: record.id,
            date: record.date,
            blood_pressure,
            blood_pressure_systolic: record.blood_pressure_systolic,
            blood_pressure_diastolic: record.blood_pressure_diastolic,
            heart_rate: record.heart_rate,
            weight: record.weight,
            blood_sugar: record.blood_sugar,
            temperature: record.temperature,
            notes: Some(record.notes).filter(|n| !n.is_empty()),
            created_at: record.created_at,
        }
    }
}

/// Response for list_vital_readings
#[derive(Debug, Serialize)]
pub struct ListReadingsResponse {
    pub readings: Vec<ReadingDetail>,
    pub total: usize,
}

/// Response for delete_vital_reading
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn validate_date(date: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("Invalid date: '{}'. Use YYYY-MM-DD", date))
}

fn validate_positive(name: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(format!("{} must be greater than 0", name))
        }
        _ => Ok(()),
    }
}

fn validate_metrics(
    systolic: Option<i64>,
    diastolic: Option<i64>,
    heart_rate: Option<i64>,
    weight: Option<f64>,
    blood_sugar: Option<i64>,
    temperature: Option<f64>,
) -> Result<(), String> {
    validate_positive("Systolic", systolic.map(|v| v as f64))?;
    validate_positive("Diastolic", diastolic.map(|v| v as f64))?;
    validate_positive("Heart rate", heart_rate.map(|v| v as f64))?;
    validate_positive("Weight", weight)?;
    validate_positive("Blood sugar", blood_sugar.map(|v| v as f64))?;
    validate_positive("Temperature", temperature)
}

/// Record a new reading
pub fn record_vital_reading(db: &Database, data: VitalRecordCreate) -> Result<ReadingDetail, String> {
    validate_date(&data.date)?;

    let has_metric = data.blood_pressure_systolic.is_some()
        || data.blood_pressure_diastolic.is_some()
        || data.heart_rate.is_some()
        || data.weight.is_some()
        || data.blood_sugar.is_some()
        || data.temperature.is_some();
    if !has_metric {
        return Err("At least one measurement is required".to_string());
    }

    validate_metrics(
        data.blood_pressure_systolic,
        data.blood_pressure_diastolic,
        data.heart_rate,
        data.weight,
        data.blood_sugar,
        data.temperature,
    )?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let record = VitalRecord::create(&conn, &data)
        .map_err(|e| format!("Failed to record reading: {}", e))?;

    tracing::info!(id = record.id, date = %record.date, "Recorded vital reading");
    Ok(record.into())
}

/// Get a reading by ID
pub fn get_vital_reading(db: &Database, id: i64) -> Result<Option<ReadingDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let record = VitalRecord::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get reading: {}", e))?;

    Ok(record.map(ReadingDetail::from))
}

/// List readings, newest first, optionally limited to a date range and to
/// readings that carry `metric`
pub fn list_vital_readings(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
    metric: Option<&str>,
    limit: Option<i64>,
) -> Result<ListReadingsResponse, String> {
    let metric = match metric {
        Some(m) => Some(Metric::from_str(m).ok_or_else(|| {
            format!("Invalid metric: '{}'. Valid metrics: systolic, diastolic, heart_rate, weight, blood_sugar, temperature", m)
        })?),
        None => None,
    };
    if let Some(start) = start_date {
        validate_date(start)?;
    }
    if let Some(end) = end_date {
        validate_date(end)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let records = match (start_date, end_date, metric) {
        (None, None, None) => VitalRecord::list(&conn, limit),
        _ => VitalRecord::list_by_date_range(
            &conn,
            start_date.unwrap_or("0000-01-01"),
            end_date.unwrap_or("9999-12-31"),
        ),
    }
    .map_err(|e| format!("Failed to list readings: {}", e))?;

    let mut readings: Vec<ReadingDetail> = records
        .into_iter()
        .filter(|r| metric.map_or(true, |m| m.value_of(&r.to_reading()).is_some()))
        .map(ReadingDetail::from)
        .collect();
    if let Some(limit) = limit.and_then(|l| usize::try_from(l).ok()) {
        readings.truncate(limit);
    }
    let total = readings.len();

    Ok(ListReadingsResponse { readings, total })
}

/// Update a reading
pub fn update_vital_reading(
    db: &Database,
    id: i64,
    data: VitalRecordUpdate,
) -> Result<Option<ReadingDetail>, String> {
    if let Some(date) = &data.date {
        validate_date(date)?;
    }
    validate_metrics(
        data.blood_pressure_systolic,
        data.blood_pressure_diastolic,
        data.heart_rate,
        data.weight,
        data.blood_sugar,
        data.temperature,
    )?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let record = VitalRecord::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update reading: {}", e))?;

    if record.is_some() && !data.is_empty() {
        tracing::info!(id, "Updated vital reading");
    }
    Ok(record.map(ReadingDetail::from))
}

/// Delete a reading
pub fn delete_vital_reading(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = VitalRecord::delete(&conn, id)
        .map_err(|e| format!("Failed to delete reading: {}", e))?;

    if !deleted {
        return Err(format!("Reading not found with id: {}", id));
    }

    tracing::info!(id, "Deleted vital reading");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}
