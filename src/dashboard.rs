//! Dashboard state
//!
//! Filter state and last-loaded data for one patient dashboard. Presets seed
//! the date inputs; manual edits stick until the preset is chosen again.
//! Loads are ticketed so a slow response can't overwrite a newer one.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::analytics::{build_view, resolve_range, resolve_series, Clock, DatePreset, VitalsView};
use crate::models::{HealthOverview, OverviewCard, VitalsReading};

/// Issued by [`DashboardState::begin_load`]; identifies one in-flight load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Rendered dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub preset: DatePreset,
    pub preset_label: String,
    pub manual_range: bool,
    #[serde(flatten)]
    pub vitals: VitalsView,
    pub overview: Vec<OverviewCard>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    preset: DatePreset,
    start: Option<String>,
    end: Option<String>,
    manual: bool,
    full: Vec<VitalsReading>,
    overview: HealthOverview,
    issued: u64,
    /// Tickets handed out and neither finished nor cancelled
    pending: BTreeSet<u64>,
    applied: u64,
}

impl DashboardState {
    pub fn new(preset: DatePreset, clock: &dyn Clock) -> Self {
        let mut state = Self {
            preset,
            ..Default::default()
        };
        state.reseed(clock);
        state
    }

    pub fn preset(&self) -> DatePreset {
        self.preset
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Whether any load has been applied yet
    pub fn is_loaded(&self) -> bool {
        self.applied > 0
    }

    /// Choose a preset; always overwrites the current range, manual edits included
    pub fn select_preset(&mut self, preset: DatePreset, clock: &dyn Clock) {
        self.preset = preset;
        self.reseed(clock);
        tracing::debug!(%preset, start = ?self.start, end = ?self.end, "Selected date preset");
    }

    /// Manually edit the start date (`None` clears it)
    pub fn set_start(&mut self, start: Option<String>) {
        self.start = start;
        self.manual = true;
    }

    /// Manually edit the end date (`None` clears it)
    pub fn set_end(&mut self, end: Option<String>) {
        self.end = end;
        self.manual = true;
    }

    /// Start a load; pass the ticket back to [`finish_load`](Self::finish_load)
    /// or [`cancel_load`](Self::cancel_load)
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.pending.insert(self.issued);
        LoadTicket(self.issued)
    }

    /// Give up on a load that produced nothing, so it no longer supersedes
    /// older loads still in flight
    pub fn cancel_load(&mut self, ticket: LoadTicket) {
        if self.pending.remove(&ticket.0) {
            tracing::debug!(ticket = ticket.0, "Cancelled vitals load");
        }
    }

    /// Apply a completed load. Returns `false` (and changes nothing) when a newer
    /// load has been applied or is still pending. `None` keeps the current value
    /// for that part.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        full: Option<Vec<VitalsReading>>,
        overview: Option<HealthOverview>,
        clock: &dyn Clock,
    ) -> bool {
        let was_pending = self.pending.remove(&ticket.0);
        let superseded = ticket.0 <= self.applied
            || self.pending.range(ticket.0 + 1..).next().is_some();
        if !was_pending || superseded {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Discarding stale vitals load"
            );
            return false;
        }

        if let Some(full) = full {
            self.full = full;
        }
        if let Some(overview) = overview {
            self.overview = overview;
        }
        self.applied = ticket.0;

        if !self.manual {
            self.reseed(clock);
        }

        tracing::info!(
            readings = self.full.len(),
            overview_readings = self.overview.vitals.len(),
            "Loaded vitals"
        );
        true
    }

    /// The series the dashboard is currently working from
    pub fn series(&self) -> &[VitalsReading] {
        resolve_series(&self.full, &self.overview.vitals)
    }

    pub fn view(&self, clock: &dyn Clock) -> DashboardView {
        DashboardView {
            preset: self.preset,
            preset_label: self.preset.label(),
            manual_range: self.manual,
            vitals: build_view(
                &self.full,
                &self.overview.vitals,
                self.start.as_deref(),
                self.end.as_deref(),
                clock,
            ),
            overview: self.overview.cards.clone(),
        }
    }

    fn reseed(&mut self, clock: &dyn Clock) {
        let range = resolve_range(self.preset, self.series(), clock);
        self.start = Some(range.start);
        self.end = Some(range.end);
        self.manual = false;
    }
}
