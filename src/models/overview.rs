//! Health overview model
//!
//! The backend's overview payload: latest-value cards per vital plus an
//! abbreviated vitals list used when the full list is unavailable.

use serde::Serialize;
use serde_json::Value;

use super::VitalsReading;

/// Trend reported by the backend for an overview card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    Normal,
    Unknown,
}

/// Display hints for a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendLabel {
    pub icon: &'static str,
    pub color: &'static str,
    pub text: &'static str,
}

impl Trend {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "improving" => Trend::Improving,
            "stable" => Trend::Stable,
            "declining" => Trend::Declining,
            "normal" => Trend::Normal,
            _ => Trend::Unknown,
        }
    }

    pub fn label(&self) -> TrendLabel {
        let (icon, color, text) = match self {
            Trend::Improving => ("arrow-up", "success", "Improving"),
            Trend::Stable => ("minus", "primary", "Stable"),
            Trend::Declining => ("arrow-down", "danger", "Declining"),
            Trend::Normal => ("check", "success", "Normal"),
            Trend::Unknown => ("question", "secondary", "Unknown"),
        };
        TrendLabel { icon, color, text }
    }
}

/// Card keys in display order: (key, label, unit)
const CARD_KEYS: [(&str, &str, Option<&str>); 5] = [
    ("bloodPressure", "Blood Pressure", None),
    ("heartRate", "Heart Rate", Some("BPM")),
    ("weight", "Weight", Some("lbs")),
    ("bloodSugar", "Blood Sugar", Some("mg/dL")),
    ("temperature", "Temperature", Some("°F")),
];

/// One latest-value card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewCard {
    pub key: &'static str,
    pub label: &'static str,
    pub current: Option<String>,
    pub unit: Option<&'static str>,
    pub trend: Trend,
    pub trend_label: TrendLabel,
    pub last_reading: Option<String>,
}

/// Parsed overview payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOverview {
    pub patient_id: Option<i64>,
    pub cards: Vec<OverviewCard>,
    pub vitals: Vec<VitalsReading>,
}

impl HealthOverview {
    /// Parse the overview object. Missing sections parse as empty.
    pub fn from_json(value: &Value) -> Self {
        let patient_id = value.get("patientId").and_then(Value::as_i64);

        let cards = match value.get("overview") {
            Some(overview) => CARD_KEYS
                .iter()
                .filter_map(|(key, label, unit)| {
                    let item = overview.get(*key)?.as_object()?;
                    let trend = item
                        .get("trend")
                        .and_then(Value::as_str)
                        .map(Trend::from_str)
                        .unwrap_or(Trend::Unknown);
                    Some(OverviewCard {
                        key: *key,
                        label: *label,
                        current: item.get("current").and_then(display_value),
                        unit: *unit,
                        trend,
                        trend_label: trend.label(),
                        last_reading: item
                            .get("lastReading")
                            .and_then(Value::as_str)
                            .map(String::from),
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        let vitals = value
            .get("vitals")
            .and_then(Value::as_array)
            .map(|list| VitalsReading::from_json_list(list))
            .unwrap_or_default();

        Self {
            patient_id,
            cards,
            vitals,
        }
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
