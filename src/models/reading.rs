//! Vitals reading model
//!
//! The canonical shape every record takes before it enters the aggregation
//! pipeline. Backend responses are loosely shaped (snake_case model fields,
//! camelCase serializer fields, a legacy combined `bloodPressure` value), so
//! all aliases are folded into one field each here, at the boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recorded measurement event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Day the reading is attributed to, as received (parsed on demand)
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub systolic: Option<f64>,
    #[serde(default)]
    pub diastolic: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub blood_sugar: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

const DATE_KEYS: &[&str] = &["date", "recorded_on"];
const CREATED_AT_KEYS: &[&str] = &["createdAt", "created_at", "timestamp"];
const SYSTOLIC_KEYS: &[&str] = &["systolic", "blood_pressure_systolic", "bloodPressureSystolic"];
const DIASTOLIC_KEYS: &[&str] = &["diastolic", "blood_pressure_diastolic", "bloodPressureDiastolic"];
const LEGACY_BP_KEYS: &[&str] = &["bloodPressure", "blood_pressure"];
const HEART_RATE_KEYS: &[&str] = &["heartRate", "heart_rate", "pulse"];
const WEIGHT_KEYS: &[&str] = &["weight"];
const BLOOD_SUGAR_KEYS: &[&str] = &["bloodSugar", "blood_sugar", "glucose"];
const TEMPERATURE_KEYS: &[&str] = &["temperature", "temp"];

impl VitalsReading {
    /// Normalize one API record. Returns `None` for anything that isn't a JSON object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let (legacy_systolic, legacy_diastolic) = LEGACY_BP_KEYS
            .iter()
            .filter_map(|key| obj.get(*key))
            .map(parse_combined_bp)
            .find(|(s, _)| s.is_some())
            .unwrap_or((None, None));

        Some(Self {
            id: obj.get("id").and_then(json_i64),
            date: first_string(obj, DATE_KEYS).unwrap_or_default(),
            created_at: first_string(obj, CREATED_AT_KEYS),
            systolic: first_number(obj, SYSTOLIC_KEYS).or(legacy_systolic),
            diastolic: first_number(obj, DIASTOLIC_KEYS).or(legacy_diastolic),
            heart_rate: first_number(obj, HEART_RATE_KEYS),
            weight: first_number(obj, WEIGHT_KEYS),
            blood_sugar: first_number(obj, BLOOD_SUGAR_KEYS),
            temperature: first_number(obj, TEMPERATURE_KEYS),
            notes: first_string(obj, &["notes"]),
        })
    }

    /// Normalize a list of API records, dropping entries that aren't objects
    pub fn from_json_list(values: &[Value]) -> Vec<Self> {
        let readings: Vec<Self> = values.iter().filter_map(Self::from_json).collect();
        if readings.len() < values.len() {
            tracing::debug!(
                dropped = values.len() - readings.len(),
                "Dropped non-object vitals records during normalization"
            );
        }
        readings
    }

    /// Systolic present but diastolic absent
    pub fn is_missing_diastolic(&self) -> bool {
        self.systolic.is_some_and(f64::is_finite) && !self.diastolic.is_some_and(f64::is_finite)
    }

    /// Format the blood pressure for display ("120/80", "118/--")
    pub fn format_blood_pressure(&self) -> Option<String> {
        let systolic = self.systolic?;
        let diastolic = self
            .diastolic
            .map(|d| format!("{}", d.round() as i64))
            .unwrap_or_else(|| "--".to_string());
        Some(format!("{}/{}", systolic.round() as i64, diastolic))
    }
}

/// First non-empty string value among `keys`
fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
}

/// First numeric value among `keys`
fn first_number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|key| obj.get(*key)).find_map(json_number)
}

/// Numbers and numeric strings; everything else (and NaN/inf) is absent
fn json_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

fn json_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Legacy combined blood pressure: a bare number is systolic, "S/D" carries both
fn parse_combined_bp(value: &Value) -> (Option<f64>, Option<f64>) {
    match value {
        Value::String(s) if s.contains('/') => {
            let mut parts = s.splitn(2, '/');
            let systolic = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
            let diastolic = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
            (
                systolic.filter(|v| v.is_finite()),
                diastolic.filter(|v| v.is_finite()),
            )
        }
        other => (json_number(other), None),
    }
}
