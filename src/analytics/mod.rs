//! Vitals analytics
//!
//! The dashboard's data pipeline: pick a source series, resolve a date range,
//! filter, then either label readings for a single-day chart or aggregate them
//! per day, plus a blood-pressure summary. Nothing here fails; malformed input
//! is skipped.

pub mod daily;
pub mod filter;
pub mod granularity;
pub mod pipeline;
pub mod range;
pub mod source;
pub mod summary;
pub mod time;

pub use daily::{aggregate_daily, AggregatedDailyStat, MetricStats};
pub use filter::filter_by_range;
pub use granularity::{select_granularity, single_day_points, ChartPoint, Granularity};
pub use pipeline::{build_view, DateBounds, VitalsView};
pub use range::{resolve_range, DatePreset, PresetError, ResolvedRange};
pub use source::resolve_series;
pub use summary::{summarize_blood_pressure, BpSummary, SummaryStats};
pub use time::{Clock, FixedClock, SystemClock};

/// Round half up (toward +∞) to `precision` decimal places; 82.5 → 83
///
/// The scaled value is first snapped to 6 decimals so float noise from summing
/// decimal inputs (150.1 + 150.2 averaging to 150.14999999999998) still rounds
/// the way the decimal value would.
pub fn round_half_up(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = (value * factor * 1e6).round() / 1e6;
    (scaled + 0.5).floor() / factor
}
