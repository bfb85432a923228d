//! Time source and date parsing
//!
//! "Now" is injected through [`Clock`] so range resolution is deterministic.
//! All comparisons happen in the clock's local wall time.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Today's calendar date in the clock's local time
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Local UTC offset used to interpret timezone-aware timestamps
    fn offset(&self) -> FixedOffset {
        *self.now().offset()
    }
}

/// Wall clock in the host's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let now = Local::now();
        now.with_timezone(now.offset())
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Midnight UTC on `date`
    pub fn on_date(date: NaiveDate) -> Self {
        Self(Utc.fix().from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a date or timestamp into local wall time.
///
/// Accepts RFC 3339 timestamps (converted to `offset`), naive timestamps and
/// plain `YYYY-MM-DD` dates (local midnight).
pub fn parse_instant(raw: &str, offset: FixedOffset) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset).naive_local());
    }

    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Calendar date of a date or timestamp string
pub fn parse_date(raw: &str, offset: FixedOffset) -> Option<NaiveDate> {
    parse_instant(raw, offset).map(|dt| dt.date())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Hour:minute label, e.g. "08:30 AM"
pub fn format_time_label(raw: &str, offset: FixedOffset) -> Option<String> {
    parse_instant(raw, offset).map(|dt| dt.format("%I:%M %p").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    #[test]
    fn test_parse_plain_date_is_midnight() {
        let dt = parse_instant("2024-01-15", utc()).unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 00:00:00");
    }

    #[test]
    fn test_parse_rfc3339_converts_to_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let dt = parse_instant("2024-01-15T02:30:00Z", offset).unwrap();
        assert_eq!(dt.date().to_string(), "2024-01-14");
        assert_eq!(dt.format("%H:%M").to_string(), "21:30");
    }

    #[test]
    fn test_parse_naive_timestamps() {
        assert!(parse_instant("2024-01-15T08:30:00.123456", utc()).is_some());
        assert!(parse_instant("2024-01-15 08:30:00", utc()).is_some());
        assert!(parse_instant("2024-01-15T08:30", utc()).is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_instant("", utc()), None);
        assert_eq!(parse_instant("   ", utc()), None);
        assert_eq!(parse_instant("yesterday", utc()), None);
        assert_eq!(parse_instant("2024-13-40", utc()), None);
    }

    #[test]
    fn test_time_label() {
        assert_eq!(
            format_time_label("2024-01-15T14:05:00", utc()).as_deref(),
            Some("02:05 PM")
        );
        assert_eq!(format_time_label("not a date", utc()), None);
    }

    #[test]
    fn test_fixed_clock_today() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let clock = FixedClock::on_date(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.offset(), utc());
    }
}
