//! Date-range presets
//!
//! Resolves a named preset into a concrete inclusive `{start, end}` pair of
//! calendar dates, anchored to the injected clock.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::{format_date, parse_date, Clock};
use crate::models::VitalsReading;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("Invalid date preset: '{0}'. Valid presets: today, yesterday, <N>d (e.g. 7d, 30d, 90d), all")]
    Invalid(String),
}

/// Named shorthand for a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DatePreset {
    Today,
    Yesterday,
    /// The last N calendar days, today included
    LastDays(u32),
    /// Span of the data itself
    All,
}

impl Default for DatePreset {
    fn default() -> Self {
        DatePreset::LastDays(7)
    }
}

impl DatePreset {
    pub fn label(&self) -> String {
        match self {
            DatePreset::Today => "Today".to_string(),
            DatePreset::Yesterday => "Yesterday".to_string(),
            DatePreset::LastDays(n) => format!("Last {} Days", n),
            DatePreset::All => "All Time".to_string(),
        }
    }
}

impl FromStr for DatePreset {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "today" => Ok(DatePreset::Today),
            "yesterday" => Ok(DatePreset::Yesterday),
            "all" => Ok(DatePreset::All),
            other => other
                .strip_suffix('d')
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n >= 1)
                .map(DatePreset::LastDays)
                .ok_or_else(|| PresetError::Invalid(s.to_string())),
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatePreset::Today => write!(f, "today"),
            DatePreset::Yesterday => write!(f, "yesterday"),
            DatePreset::LastDays(n) => write!(f, "{}d", n),
            DatePreset::All => write!(f, "all"),
        }
    }
}

impl TryFrom<String> for DatePreset {
    type Error = PresetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatePreset> for String {
    fn from(preset: DatePreset) -> Self {
        preset.to_string()
    }
}

/// Concrete inclusive range as `YYYY-MM-DD` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub start: String,
    pub end: String,
}

/// Resolve `preset` against `clock`; the series is only consulted for [`DatePreset::All`].
pub fn resolve_range(
    preset: DatePreset,
    series: &[VitalsReading],
    clock: &dyn Clock,
) -> ResolvedRange {
    let today = clock.today();

    let (start, end) = match preset {
        DatePreset::Today => (today, today),
        DatePreset::Yesterday => {
            let yesterday = today.pred_opt().unwrap_or(today);
            (yesterday, yesterday)
        }
        DatePreset::LastDays(n) => {
            let back = Duration::days(i64::from(n.saturating_sub(1)));
            (today.checked_sub_signed(back).unwrap_or(NaiveDate::MIN), today)
        }
        DatePreset::All => data_span(series, clock).unwrap_or((today, today)),
    };

    ResolvedRange {
        start: format_date(start),
        end: format_date(end),
    }
}

/// Earliest and latest parseable reading dates
fn data_span(series: &[VitalsReading], clock: &dyn Clock) -> Option<(NaiveDate, NaiveDate)> {
    let offset = clock.offset();
    series
        .iter()
        .filter_map(|r| parse_date(&r.date, offset))
        .fold(None, |span, date| match span {
            None => Some((date, date)),
            Some((lo, hi)) => Some((lo.min(date), hi.max(date))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::time::FixedClock;

    fn clock(y: i32, m: u32, d: u32) -> FixedClock {
        FixedClock::on_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn on(date: &str) -> VitalsReading {
        VitalsReading {
            date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_presets() {
        assert_eq!("today".parse::<DatePreset>(), Ok(DatePreset::Today));
        assert_eq!("Yesterday".parse::<DatePreset>(), Ok(DatePreset::Yesterday));
        assert_eq!("7d".parse::<DatePreset>(), Ok(DatePreset::LastDays(7)));
        assert_eq!("90d".parse::<DatePreset>(), Ok(DatePreset::LastDays(90)));
        assert_eq!("all".parse::<DatePreset>(), Ok(DatePreset::All));
        assert!("0d".parse::<DatePreset>().is_err());
        assert!("week".parse::<DatePreset>().is_err());
        assert!("d".parse::<DatePreset>().is_err());
    }

    #[test]
    fn test_preset_round_trips_through_display() {
        for preset in [DatePreset::Today, DatePreset::LastDays(30), DatePreset::All] {
            assert_eq!(preset.to_string().parse::<DatePreset>(), Ok(preset));
        }
    }

    #[test]
    fn test_today_and_yesterday() {
        let clock = clock(2024, 3, 1);
        let today = resolve_range(DatePreset::Today, &[], &clock);
        assert_eq!(today.start, "2024-03-01");
        assert_eq!(today.end, "2024-03-01");

        let yesterday = resolve_range(DatePreset::Yesterday, &[], &clock);
        assert_eq!(yesterday.start, "2024-02-29");
        assert_eq!(yesterday.end, "2024-02-29");
    }

    #[test]
    fn test_last_days_is_inclusive_of_today() {
        let clock = clock(2024, 1, 20);
        let week = resolve_range(DatePreset::LastDays(7), &[], &clock);
        assert_eq!(week.start, "2024-01-14");
        assert_eq!(week.end, "2024-01-20");

        let one = resolve_range(DatePreset::LastDays(1), &[], &clock);
        assert_eq!(one.start, one.end);
    }

    #[test]
    fn test_all_uses_data_span_regardless_of_now() {
        let series = vec![on("2024-01-05"), on("2024-01-20"), on("2024-01-01"), on("bogus")];
        let range = resolve_range(DatePreset::All, &series, &clock(2030, 6, 1));
        assert_eq!(range.start, "2024-01-01");
        assert_eq!(range.end, "2024-01-20");
    }

    #[test]
    fn test_all_without_data_is_today() {
        let range = resolve_range(DatePreset::All, &[], &clock(2024, 5, 5));
        assert_eq!(range.start, "2024-05-05");
        assert_eq!(range.end, "2024-05-05");
    }

    #[test]
    fn test_preset_serde_as_string() {
        let json = serde_json::to_string(&DatePreset::LastDays(30)).unwrap();
        assert_eq!(json, "\"30d\"");
        let parsed: DatePreset = serde_json::from_str("\"yesterday\"").unwrap();
        assert_eq!(parsed, DatePreset::Yesterday);
    }
}
