//! Tracked vital metrics
//!
//! The six numeric series the dashboard aggregates, with their export keys
//! and per-metric rounding precision.

use serde::{Deserialize, Serialize};

use super::VitalsReading;

/// A numeric vital tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Systolic,
    Diastolic,
    HeartRate,
    Weight,
    BloodSugar,
    Temperature,
}

impl Metric {
    /// Every tracked metric, in output order
    pub const ALL: [Metric; 6] = [
        Metric::Systolic,
        Metric::Diastolic,
        Metric::HeartRate,
        Metric::Weight,
        Metric::BloodSugar,
        Metric::Temperature,
    ];

    /// Canonical key used in exported field names (`avg_<key>`, `min_<key>`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Systolic => "systolic",
            Metric::Diastolic => "diastolic",
            Metric::HeartRate => "heartRate",
            Metric::Weight => "weight",
            Metric::BloodSugar => "bloodSugar",
            Metric::Temperature => "temperature",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "systolic" | "sys" => Some(Metric::Systolic),
            "diastolic" | "dia" => Some(Metric::Diastolic),
            "heartrate" | "heart_rate" | "hr" | "pulse" => Some(Metric::HeartRate),
            "weight" => Some(Metric::Weight),
            "bloodsugar" | "blood_sugar" | "glucose" => Some(Metric::BloodSugar),
            "temperature" | "temp" => Some(Metric::Temperature),
            _ => None,
        }
    }

    /// Decimal places kept when averaging this metric
    pub fn precision(&self) -> u32 {
        match self {
            Metric::BloodSugar => 0,
            _ => 1,
        }
    }

    /// Position of this metric in [`Metric::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Metric::Systolic => 0,
            Metric::Diastolic => 1,
            Metric::HeartRate => 2,
            Metric::Weight => 3,
            Metric::BloodSugar => 4,
            Metric::Temperature => 5,
        }
    }

    /// The reading's value for this metric, if present and finite
    pub fn value_of(&self, reading: &VitalsReading) -> Option<f64> {
        let value = match self {
            Metric::Systolic => reading.systolic,
            Metric::Diastolic => reading.diastolic,
            Metric::HeartRate => reading.heart_rate,
            Metric::Weight => reading.weight,
            Metric::BloodSugar => reading.blood_sugar,
            Metric::Temperature => reading.temperature,
        };
        value.filter(|v| v.is_finite())
    }
}
