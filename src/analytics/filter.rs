//! Range filter
//!
//! Restricts a series to `[start 00:00, end 23:59:59.999]` in local time and
//! orders it chronologically.

use chrono::{FixedOffset, NaiveDateTime, NaiveTime};

use super::time::{parse_date, parse_instant};
use crate::models::VitalsReading;

/// Last representable instant of a day at millisecond precision
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Filter `series` to readings dated within the bounds, sorted ascending by date.
///
/// An absent or unparseable bound leaves that side open. Readings whose `date`
/// is missing or unparseable are always dropped.
pub fn filter_by_range(
    series: &[VitalsReading],
    start: Option<&str>,
    end: Option<&str>,
    offset: FixedOffset,
) -> Vec<VitalsReading> {
    let lower = start
        .and_then(|s| parse_date(s, offset))
        .map(|d| d.and_time(NaiveTime::MIN));
    let upper = end
        .and_then(|s| parse_date(s, offset))
        .map(|d| d.and_time(end_of_day()));

    let mut dated: Vec<(NaiveDateTime, Option<NaiveDateTime>, &VitalsReading)> = series
        .iter()
        .filter_map(|r| {
            let at = parse_instant(&r.date, offset)?;
            let created = r.created_at.as_deref().and_then(|c| parse_instant(c, offset));
            Some((at, created, r))
        })
        .collect();

    let undated = series.len() - dated.len();
    if undated > 0 {
        tracing::debug!(undated, "Skipped readings without a usable date");
    }

    dated.retain(|(at, _, _)| {
        lower.map_or(true, |lo| *at >= lo) && upper.map_or(true, |hi| *at <= hi)
    });

    // Stable: same-day readings keep createdAt order, then input order
    dated.sort_by_key(|(at, created, _)| (*at, *created));

    dated.into_iter().map(|(_, _, r)| r.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, Utc};

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    fn on(date: &str) -> VitalsReading {
        VitalsReading {
            date: date.to_string(),
            ..Default::default()
        }
    }

    fn dates(readings: &[VitalsReading]) -> Vec<&str> {
        readings.iter().map(|r| r.date.as_str()).collect()
    }

    #[test]
    fn test_end_day_is_fully_included() {
        let series = vec![
            on("2024-01-15T23:59:59"),
            on("2024-01-16T00:00:00"),
            on("2024-01-14T00:00:00"),
            on("2024-01-13T23:59:59"),
        ];
        let filtered = filter_by_range(&series, Some("2024-01-14"), Some("2024-01-15"), utc());
        assert_eq!(dates(&filtered), vec!["2024-01-14T00:00:00", "2024-01-15T23:59:59"]);
    }

    #[test]
    fn test_sorted_ascending() {
        let series = vec![on("2024-01-12"), on("2024-01-10"), on("2024-01-11")];
        let filtered = filter_by_range(&series, Some("2024-01-01"), Some("2024-01-31"), utc());
        assert_eq!(dates(&filtered), vec!["2024-01-10", "2024-01-11", "2024-01-12"]);
    }

    #[test]
    fn test_same_day_ordered_by_created_at() {
        let mut late = on("2024-01-15");
        late.created_at = Some("2024-01-15T18:00:00".to_string());
        let mut early = on("2024-01-15");
        early.created_at = Some("2024-01-15T07:00:00".to_string());

        let filtered = filter_by_range(&[late, early], Some("2024-01-15"), Some("2024-01-15"), utc());
        assert_eq!(filtered[0].created_at.as_deref(), Some("2024-01-15T07:00:00"));
        assert_eq!(filtered[1].created_at.as_deref(), Some("2024-01-15T18:00:00"));
    }

    #[test]
    fn test_unparseable_dates_are_dropped() {
        let series = vec![on(""), on("n/a"), on("2024-01-10")];
        let filtered = filter_by_range(&series, None, None, utc());
        assert_eq!(dates(&filtered), vec!["2024-01-10"]);
    }

    #[test]
    fn test_no_bounds_returns_everything_sorted() {
        let series = vec![on("2024-02-01"), on("2023-12-31"), on("2024-01-15")];
        let filtered = filter_by_range(&series, None, None, utc());
        assert_eq!(dates(&filtered), vec!["2023-12-31", "2024-01-15", "2024-02-01"]);
    }

    #[test]
    fn test_single_bound() {
        let series = vec![on("2024-01-10"), on("2024-01-20")];
        let from = filter_by_range(&series, Some("2024-01-15"), None, utc());
        assert_eq!(dates(&from), vec!["2024-01-20"]);
        let until = filter_by_range(&series, None, Some("2024-01-15"), utc());
        assert_eq!(dates(&until), vec!["2024-01-10"]);
    }

    #[test]
    fn test_empty_range() {
        let series = vec![on("2024-01-10")];
        let filtered = filter_by_range(&series, Some("2024-02-01"), Some("2024-02-07"), utc());
        assert!(filtered.is_empty());
    }
}
