//! Data models
//!
//! Canonical vitals readings, the backend overview payload, and rows of the
//! local readings store.

mod metric;
mod overview;
mod reading;
mod record;

pub use metric::Metric;
pub use overview::{HealthOverview, OverviewCard, Trend, TrendLabel};
pub use reading::VitalsReading;
pub use record::{VitalRecord, VitalRecordCreate, VitalRecordUpdate};
