//! Blood-pressure summary and the missing-diastolic signal

use serde::Serialize;

use super::daily::AggregatedDailyStat;
use super::round_half_up;
use crate::models::{Metric, VitalsReading};

/// Whole-number min/avg/max for one blood-pressure component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub min: i64,
    pub avg: i64,
    pub max: i64,
}

impl SummaryStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self {
            min: round_half_up(min, 0) as i64,
            avg: round_half_up(avg, 0) as i64,
            max: round_half_up(max, 0) as i64,
        })
    }
}

/// Overall blood pressure across the filtered range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BpSummary {
    pub systolic: Option<SummaryStats>,
    pub diastolic: Option<SummaryStats>,
}

/// Summarize systolic and diastolic independently over every reading
pub fn summarize_blood_pressure(readings: &[VitalsReading]) -> BpSummary {
    let collect = |metric: Metric| -> Vec<f64> {
        readings.iter().filter_map(|r| metric.value_of(r)).collect()
    };
    BpSummary {
        systolic: SummaryStats::from_values(&collect(Metric::Systolic)),
        diastolic: SummaryStats::from_values(&collect(Metric::Diastolic)),
    }
}

/// Any reading with systolic but no diastolic
pub fn diastolic_missing_in_readings(readings: &[VitalsReading]) -> bool {
    readings.iter().any(VitalsReading::is_missing_diastolic)
}

/// Any day with a systolic average but no diastolic average
pub fn diastolic_missing_in_daily(daily: &[AggregatedDailyStat]) -> bool {
    daily.iter().any(|day| {
        day.stats(Metric::Systolic).avg.is_some() && day.stats(Metric::Diastolic).avg.is_none()
    })
}
