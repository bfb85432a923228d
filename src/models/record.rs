//! Stored vital reading
//!
//! Rows of the local `vital_readings` table and their conversion into
//! canonical [`VitalsReading`]s for the dashboard pipeline.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::VitalsReading;
use crate::db::{DbError, DbResult};

/// A reading persisted in the local store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalRecord {
    pub id: i64,
    pub date: String,
    pub blood_pressure_systolic: Option<i64>,
    pub blood_pressure_diastolic: Option<i64>,
    pub heart_rate: Option<i64>,
    pub weight: Option<f64>,
    pub blood_sugar: Option<i64>,
    pub temperature: Option<f64>,
    pub notes: String,
    pub created_at: String,
}

/// Data for recording a new reading
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalRecordCreate {
    pub date: String,
    pub blood_pressure_systolic: Option<i64>,
    pub blood_pressure_diastolic: Option<i64>,
    pub heart_rate: Option<i64>,
    pub weight: Option<f64>,
    pub blood_sugar: Option<i64>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
    /// Defaults to now
    pub created_at: Option<String>,
}

/// Data for updating a reading; `None` leaves a column untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalRecordUpdate {
    pub date: Option<String>,
    pub blood_pressure_systolic: Option<i64>,
    pub blood_pressure_diastolic: Option<i64>,
    pub heart_rate: Option<i64>,
    pub weight: Option<f64>,
    pub blood_sugar: Option<i64>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
}

impl VitalRecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.blood_pressure_systolic.is_none()
            && self.blood_pressure_diastolic.is_none()
            && self.heart_rate.is_none()
            && self.weight.is_none()
            && self.blood_sugar.is_none()
            && self.temperature.is_none()
            && self.notes.is_none()
    }
}

impl VitalRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            blood_pressure_systolic: row.get("blood_pressure_systolic")?,
            blood_pressure_diastolic: row.get("blood_pressure_diastolic")?,
            heart_rate: row.get("heart_rate")?,
            weight: row.get("weight")?,
            blood_sugar: row.get("blood_sugar")?,
            temperature: row.get("temperature")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new reading
    pub fn create(conn: &Connection, data: &VitalRecordCreate) -> DbResult<Self> {
        let created_at = data.created_at.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });

        conn.execute(
            r#"
            INSERT INTO vital_readings (
                date, blood_pressure_systolic, blood_pressure_diastolic, heart_rate,
                weight, blood_sugar, temperature, notes, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.date,
                data.blood_pressure_systolic,
                data.blood_pressure_diastolic,
                data.heart_rate,
                data.weight,
                data.blood_sugar,
                data.temperature,
                data.notes.clone().unwrap_or_default(),
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a reading by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM vital_readings WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List readings, newest first (same ordering as the backend list endpoint)
    pub fn list(conn: &Connection, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM vital_readings ORDER BY date DESC, created_at DESC LIMIT ?1",
        )?;
        // SQLite treats a negative LIMIT as unbounded
        let records = stmt
            .query_map([limit.unwrap_or(-1)], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// List readings whose date falls within `[start_date, end_date]`
    pub fn list_by_date_range(
        conn: &Connection,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM vital_readings WHERE date >= ?1 AND date <= ?2 ORDER BY date DESC, created_at DESC",
        )?;
        let records = stmt
            .query_map(params![start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Update a reading
    pub fn update(conn: &Connection, id: i64, data: &VitalRecordUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        let mut push = |column: &str, value: Box<dyn rusqlite::ToSql>| {
            params_vec.push(value);
            updates.push(format!("{} = ?{}", column, params_vec.len()));
        };

        if let Some(ref date) = data.date {
            push("date", Box::new(date.clone()));
        }
        if let Some(v) = data.blood_pressure_systolic {
            push("blood_pressure_systolic", Box::new(v));
        }
        if let Some(v) = data.blood_pressure_diastolic {
            push("blood_pressure_diastolic", Box::new(v));
        }
        if let Some(v) = data.heart_rate {
            push("heart_rate", Box::new(v));
        }
        if let Some(v) = data.weight {
            push("weight", Box::new(v));
        }
        if let Some(v) = data.blood_sugar {
            push("blood_sugar", Box::new(v));
        }
        if let Some(v) = data.temperature {
            push("temperature", Box::new(v));
        }
        if let Some(ref notes) = data.notes {
            push("notes", Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let sql = format!(
            "UPDATE vital_readings SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a reading
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM vital_readings WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Canonical reading for the dashboard pipeline
    pub fn to_reading(&self) -> VitalsReading {
        VitalsReading {
            id: Some(self.id),
            date: self.date.clone(),
            created_at: Some(self.created_at.clone()),
            systolic: self.blood_pressure_systolic.map(|v| v as f64),
            diastolic: self.blood_pressure_diastolic.map(|v| v as f64),
            heart_rate: self.heart_rate.map(|v| v as f64),
            weight: self.weight,
            blood_sugar: self.blood_sugar.map(|v| v as f64),
            temperature: self.temperature,
            notes: Some(self.notes.clone()).filter(|n| !n.is_empty()),
        }
    }
}
