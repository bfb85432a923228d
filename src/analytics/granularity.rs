//! Chart granularity
//!
//! A range that starts and ends on the same calendar date is charted reading
//! by reading; anything wider is charted as per-day aggregates.

use chrono::FixedOffset;
use serde::Serialize;

use super::time::{format_time_label, parse_date};
use crate::models::VitalsReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    SingleDay,
    MultiDay,
}

/// Single-day when both bounds resolve to the same calendar date
pub fn select_granularity(
    start: Option<&str>,
    end: Option<&str>,
    offset: FixedOffset,
) -> Granularity {
    let start = start.and_then(|s| parse_date(s, offset));
    let end = end.and_then(|s| parse_date(s, offset));
    match (start, end) {
        (Some(s), Some(e)) if s == e => Granularity::SingleDay,
        _ => Granularity::MultiDay,
    }
}

/// One reading plotted at its time of day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: String,
    #[serde(flatten)]
    pub reading: VitalsReading,
}

/// Label each reading with its time of day.
///
/// Uses `createdAt`, falling back to `date`; if neither formats, the label is
/// the raw `date`.
pub fn single_day_points(readings: &[VitalsReading], offset: FixedOffset) -> Vec<ChartPoint> {
    readings
        .iter()
        .map(|reading| {
            let source = reading
                .created_at
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(reading.date.as_str());
            let time = format_time_label(source, offset).unwrap_or_else(|| reading.date.clone());
            ChartPoint {
                time,
                reading: reading.clone(),
            }
        })
        .collect()
}
