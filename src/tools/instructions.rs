//! Usage guide returned by the `vitals_instructions` tool

pub const VITALS_INSTRUCTIONS: &str = r#"
# Telemed Vitals Instructions

This guide explains how to record vitals and read the vitals dashboard.

## Overview

A reading is one measurement event on a calendar date. It may carry any of:
- **Blood pressure** - systolic / diastolic (mmHg)
- **Heart rate** - BPM
- **Weight** - lbs
- **Blood sugar** - mg/dL
- **Temperature** - °F

Readings live in the local store, or can be pulled from the telemed backend.

## Recording Readings

```
record_vital_reading(
  date: "2026-01-15",
  systolic: 120,
  diastolic: 80,
  heart_rate: 68,
  notes: "Morning, seated"
)
```

- `date` must be `YYYY-MM-DD`
- At least one measurement is required; every value must be greater than 0
- `created_at` defaults to now and orders same-day readings

Use `list_vital_readings` (optionally with `start_date` / `end_date` / `metric` / `limit`),
`get_vital_reading`, `update_vital_reading` and `delete_vital_reading` to manage them.

## The Dashboard

```
get_vitals_dashboard(preset: "30d")
```

### Date presets
| Preset       | Range                                   |
|--------------|-----------------------------------------|
| `today`      | today only                              |
| `yesterday`  | yesterday only                          |
| `7d`, `30d`, `90d`, any `<N>d` | the last N days, today included |
| `all`        | earliest to latest reading in the data  |

- `set_dashboard_preset` switches preset and **discards manual date edits**
- `set_dashboard_range` sets `start_date` / `end_date` by hand; pass `""` to clear a bound
- Manual edits stick across reloads until a preset is chosen again

### Data source
- `source: "store"` reloads from the local store
- `source: "api"` (or `sync_vitals_from_api`) fetches the vitals list and overview from the backend
- If the full list is empty, the overview's abbreviated vitals are used instead

### Reading the output
- `mode: "single_day"` - start and end are the same day; `points` has one entry per reading,
  labelled with its time (e.g. "08:30 AM")
- `mode: "multi_day"` - `daily` has one row per calendar day with avg/min/max/range per metric
- `summary` - whole-number min/avg/max for systolic and diastolic across the range
- `diastolicMissing: true` - some readings have systolic without diastolic. Say so when
  reporting; the diastolic line is incomplete, not zero
- `hasData: false` - nothing in the selected range

## Tips

1. Averages are rounded half up: 82.5 becomes 83
2. Blood sugar averages are whole numbers; other averages keep one decimal
3. A day's `range` is max minus min for that day
"#;
