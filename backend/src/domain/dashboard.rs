//! Dashboard tab assembly.
//!
//! Turns the mock rows of a tab into KPI cards: progress summary from the
//! calculator, colour band from the tab's thresholds, and a weighted total
//! row for tabs whose rows add up.

use chrono::NaiveDate;
use shared::{DashboardView, KpiCard, MetricPoint, Thresholds, ViewKind, ViewKindError};
use std::collections::BTreeMap;
use tracing::info;

use super::calculator::{aggregate, share_percent, summarize};
use super::mock_data::{self, MockRow};
use super::period::TimeProgress;
use super::thresholds::classify;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    UnknownView(#[from] ViewKindError),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parse a tab slug from the URL
pub fn parse_view_kind(slug: &str) -> Result<ViewKind, DashboardError> {
    Ok(ViewKind::from_slug(slug)?)
}

/// Parse the `date` query parameter, `None` meaning today
pub fn parse_view_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, DashboardError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DashboardError::InvalidDate(s.to_string())),
        None => Ok(today),
    }
}

/// Builds dashboard tabs with per-tab thresholds
#[derive(Clone)]
pub struct DashboardService {
    thresholds: BTreeMap<ViewKind, Thresholds>,
}

impl DashboardService {
    pub fn new(thresholds: BTreeMap<ViewKind, Thresholds>) -> Self {
        Self { thresholds }
    }

    /// Thresholds in effect for a tab, the standard pair if none configured
    pub fn thresholds_for(&self, kind: ViewKind) -> Thresholds {
        self.thresholds.get(&kind).copied().unwrap_or_default()
    }

    /// Compute a tab as it looks on `date`
    pub fn build_view(&self, kind: ViewKind, date: NaiveDate) -> DashboardView {
        let time_progress = TimeProgress::for_month(date);
        let thresholds = self.thresholds_for(kind);
        info!(
            "Building {} view for {} ({:.1}% of month elapsed)",
            kind,
            date,
            time_progress.percent()
        );

        let rows = mock_data::rows(kind);
        let cards: Vec<KpiCard> = rows
            .iter()
            .map(|row| self.card(kind, row.label, row.into(), row.hec, time_progress, &thresholds))
            .collect();

        let total = if kind.is_additive() {
            let point = aggregate(rows.iter().map(MetricPoint::from));
            let hec = rows
                .iter()
                .map(|r| r.hec)
                .sum::<Option<f64>>();
            Some(self.card(kind, "Total", point, hec, time_progress, &thresholds))
        } else {
            None
        };

        DashboardView {
            view: kind,
            title: kind.title().to_string(),
            date,
            elapsed_percent: time_progress.percent(),
            thresholds,
            cards,
            total,
        }
    }

    /// Build every tab for `date`, in display order
    pub fn build_all(&self, date: NaiveDate) -> Vec<DashboardView> {
        ViewKind::ALL
            .into_iter()
            .map(|kind| self.build_view(kind, date))
            .collect()
    }

    fn card(
        &self,
        kind: ViewKind,
        label: &str,
        point: MetricPoint,
        hec: Option<f64>,
        time_progress: TimeProgress,
        thresholds: &Thresholds,
    ) -> KpiCard {
        let summary = summarize(point, time_progress);
        KpiCard {
            label: label.to_string(),
            unit: kind.unit().to_string(),
            point,
            summary,
            band: classify(summary.percent_complete, thresholds),
            hec_hours: hec,
            hec_share_percent: hec.map(|h| share_percent(h, point.value)),
        }
    }
}

impl From<&MockRow> for MetricPoint {
    fn from(row: &MockRow) -> Self {
        MetricPoint::new(row.value, row.target)
    }
}
