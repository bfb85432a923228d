//! Daily aggregation
//!
//! Groups readings by calendar date and reduces each metric to
//! avg/min/max/range for multi-day charts.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::round_half_up;
use super::time::{format_date, parse_date};
use crate::models::{Metric, VitalsReading};

/// Aggregate of one metric over one day. All fields are `None` when the metric
/// had no readings that day.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct MetricStats {
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
}

/// Running totals for one metric within a bucket
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: u32,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn finish(&self, precision: u32) -> MetricStats {
        if self.count == 0 {
            return MetricStats::default();
        }
        let range = match (self.min, self.max) {
            (Some(lo), Some(hi)) => Some(hi - lo),
            _ => None,
        };
        MetricStats {
            avg: Some(round_half_up(self.sum / f64::from(self.count), precision)),
            min: self.min,
            max: self.max,
            range,
        }
    }
}

#[derive(Debug, Default)]
struct DailyBucket {
    metrics: [Accumulator; 6],
}

/// Per-day row for multi-day charts
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedDailyStat {
    pub date: String,
    stats: [MetricStats; 6],
}

impl AggregatedDailyStat {
    pub fn stats(&self, metric: Metric) -> &MetricStats {
        &self.stats[metric.index()]
    }
}

/// Serialized flat: `date`, then `avg_<metric>`, `min_<metric>`, `max_<metric>`,
/// `range_<metric>` for every metric, with `null` for empty metrics.
impl Serialize for AggregatedDailyStat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + Metric::ALL.len() * 4))?;
        map.serialize_entry("date", &self.date)?;
        for metric in Metric::ALL {
            let stats = self.stats(metric);
            let key = metric.key();
            map.serialize_entry(&format!("avg_{}", key), &stats.avg)?;
            map.serialize_entry(&format!("min_{}", key), &stats.min)?;
            map.serialize_entry(&format!("max_{}", key), &stats.max)?;
            map.serialize_entry(&format!("range_{}", key), &stats.range)?;
        }
        map.end()
    }
}

/// One row per distinct date present in `readings`, ascending.
///
/// Readings without a parseable date are skipped.
pub fn aggregate_daily(readings: &[VitalsReading], offset: FixedOffset) -> Vec<AggregatedDailyStat> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket> = BTreeMap::new();

    for reading in readings {
        let Some(date) = parse_date(&reading.date, offset) else {
            continue;
        };
        let bucket = buckets.entry(date).or_default();
        for metric in Metric::ALL {
            if let Some(value) = metric.value_of(reading) {
                bucket.metrics[metric.index()].push(value);
            }
        }
    }

    buckets
        .into_iter()
        .map(|(date, bucket)| AggregatedDailyStat {
            date: format_date(date),
            stats: Metric::ALL.map(|m| bucket.metrics[m.index()].finish(m.precision())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, Utc};
    use serde_json::{json, Value};

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    fn hr(date: &str, bpm: f64) -> VitalsReading {
        VitalsReading {
            date: date.to_string(),
            heart_rate: Some(bpm),
            ..Default::default()
        }
    }

    #[test]
    fn test_multi_day_heart_rate() {
        let readings = vec![hr("2024-01-10", 70.0), hr("2024-01-10", 74.0), hr("2024-01-11", 80.0)];
        let daily = aggregate_daily(&readings, utc());

        assert_eq!(daily.len(), 2);
        let first = daily[0].stats(Metric::HeartRate);
        assert_eq!(daily[0].date, "2024-01-10");
        assert_eq!(first.avg, Some(72.0));
        assert_eq!(first.min, Some(70.0));
        assert_eq!(first.max, Some(74.0));
        assert_eq!(first.range, Some(4.0));

        let second = daily[1].stats(Metric::HeartRate);
        assert_eq!(daily[1].date, "2024-01-11");
        assert_eq!(second.avg, Some(80.0));
        assert_eq!(second.min, Some(80.0));
        assert_eq!(second.max, Some(80.0));
        assert_eq!(second.range, Some(0.0));
    }

    #[test]
    fn test_empty_metric_is_all_null() {
        let daily = aggregate_daily(&[hr("2024-01-10", 70.0)], utc());
        let weight = daily[0].stats(Metric::Weight);
        assert_eq!(*weight, MetricStats::default());
        assert!(weight.avg.is_none() && weight.min.is_none() && weight.max.is_none() && weight.range.is_none());
    }

    #[test]
    fn test_one_row_per_present_date_only() {
        let readings = vec![hr("2024-01-12", 70.0), hr("2024-01-10", 74.0), hr("2024-01-12", 76.0)];
        let daily = aggregate_daily(&readings, utc());
        let dates: Vec<&str> = daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-10", "2024-01-12"]);
    }

    #[test]
    fn test_timestamps_bucket_by_calendar_day() {
        let readings = vec![hr("2024-01-10T07:00:00", 60.0), hr("2024-01-10T21:00:00", 64.0)];
        let daily = aggregate_daily(&readings, utc());
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].stats(Metric::HeartRate).avg, Some(62.0));
    }

    #[test]
    fn test_precision_per_metric() {
        let readings = vec![
            VitalsReading {
                date: "2024-01-10".to_string(),
                blood_sugar: Some(95.0),
                weight: Some(150.0),
                ..Default::default()
            },
            VitalsReading {
                date: "2024-01-10".to_string(),
                blood_sugar: Some(96.0),
                weight: Some(150.25),
                ..Default::default()
            },
        ];
        let daily = aggregate_daily(&readings, utc());
        // 95.5 -> 96, 150.125 -> 150.1
        assert_eq!(daily[0].stats(Metric::BloodSugar).avg, Some(96.0));
        assert_eq!(daily[0].stats(Metric::Weight).avg, Some(150.1));
        assert_eq!(daily[0].stats(Metric::Weight).range, Some(0.25));
    }

    #[test]
    fn test_decimal_half_rounds_up() {
        let readings: Vec<VitalsReading> = [150.1, 150.2]
            .into_iter()
            .map(|w| VitalsReading {
                date: "2024-01-10".to_string(),
                weight: Some(w),
                ..Default::default()
            })
            .collect();
        let daily = aggregate_daily(&readings, utc());
        assert_eq!(daily[0].stats(Metric::Weight).avg, Some(150.2));
    }

    #[test]
    fn test_non_finite_values_skipped_per_metric() {
        let reading = VitalsReading {
            date: "2024-01-10".to_string(),
            weight: Some(f64::NAN),
            heart_rate: Some(70.0),
            ..Default::default()
        };
        let daily = aggregate_daily(&[reading], utc());
        assert_eq!(daily[0].stats(Metric::Weight).avg, None);
        assert_eq!(daily[0].stats(Metric::HeartRate).avg, Some(70.0));
    }

    #[test]
    fn test_range_is_max_minus_min() {
        let readings = vec![hr("2024-01-10", 61.3), hr("2024-01-10", 88.9), hr("2024-01-10", 72.0)];
        let stats = *aggregate_daily(&readings, utc())[0].stats(Metric::HeartRate);
        assert_eq!(stats.range, Some(stats.max.unwrap() - stats.min.unwrap()));
    }

    #[test]
    fn test_serialized_shape_has_every_key() {
        let value = serde_json::to_value(&aggregate_daily(&[hr("2024-01-10", 70.0)], utc())[0]).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 25);
        assert_eq!(obj["date"], json!("2024-01-10"));
        assert_eq!(obj["avg_heartRate"], json!(70.0));
        assert_eq!(obj["range_heartRate"], json!(0.0));
        assert_eq!(obj["avg_systolic"], Value::Null);
        assert_eq!(obj["range_bloodSugar"], Value::Null);
    }
}
