//! Full vitals pipeline
//!
//! source → range filter → {single-day points | daily aggregates} + summary.
//! Pure: the same inputs and clock always produce the same view.

use serde::Serialize;

use super::daily::{aggregate_daily, AggregatedDailyStat};
use super::filter::filter_by_range;
use super::granularity::{select_granularity, single_day_points, ChartPoint, Granularity};
use super::source::resolve_series;
use super::summary::{
    diastolic_missing_in_daily, diastolic_missing_in_readings, summarize_blood_pressure, BpSummary,
};
use super::time::Clock;
use crate::models::VitalsReading;

/// Date inputs the view was built from; `None` is an open bound
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Everything the presentation layer binds to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsView {
    pub range: DateBounds,
    pub mode: Granularity,
    /// Filtered series, ascending by date
    pub readings: Vec<VitalsReading>,
    /// Single-day chart points (empty in multi-day mode)
    pub points: Vec<ChartPoint>,
    /// Multi-day chart rows (empty in single-day mode)
    pub daily: Vec<AggregatedDailyStat>,
    pub summary: BpSummary,
    pub diastolic_missing: bool,
    pub has_data: bool,
}

pub fn build_view(
    full: &[VitalsReading],
    overview: &[VitalsReading],
    start: Option<&str>,
    end: Option<&str>,
    clock: &dyn Clock,
) -> VitalsView {
    let offset = clock.offset();
    let series = resolve_series(full, overview);
    let readings = filter_by_range(series, start, end, offset);
    let mode = select_granularity(start, end, offset);

    let (points, daily, diastolic_missing) = match mode {
        Granularity::SingleDay => {
            let missing = diastolic_missing_in_readings(&readings);
            (single_day_points(&readings, offset), Vec::new(), missing)
        }
        Granularity::MultiDay => {
            let daily = aggregate_daily(&readings, offset);
            let missing = diastolic_missing_in_daily(&daily);
            (Vec::new(), daily, missing)
        }
    };

    let summary = summarize_blood_pressure(&readings);

    tracing::debug!(
        source = series.len(),
        in_range = readings.len(),
        ?mode,
        "Built vitals view"
    );

    VitalsView {
        range: DateBounds {
            start: start.map(String::from),
            end: end.map(String::from),
        },
        mode,
        has_data: !readings.is_empty(),
        readings,
        points,
        daily,
        summary,
        diastolic_missing,
    }
}
