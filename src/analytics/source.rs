//! Vitals source selection

use crate::models::VitalsReading;

/// Prefer the full vitals list; fall back to the overview's abbreviated list.
pub fn resolve_series<'a>(full: &'a [VitalsReading], overview: &'a [VitalsReading]) -> &'a [VitalsReading] {
    if !full.is_empty() {
        full
    } else {
        overview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(date: &str) -> VitalsReading {
        VitalsReading {
            date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prefers_full_list() {
        let full = vec![on("2024-01-01"), on("2024-01-02")];
        let overview = vec![on("2024-01-02")];
        assert_eq!(resolve_series(&full, &overview).len(), 2);
    }

    #[test]
    fn test_falls_back_to_overview() {
        let overview = vec![on("2024-01-02")];
        assert_eq!(resolve_series(&[], &overview), &overview[..]);
    }

    #[test]
    fn test_nothing_is_empty() {
        assert!(resolve_series(&[], &[]).is_empty());
    }
}
