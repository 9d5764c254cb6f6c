use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A current achievement and its goal for one indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Amount achieved so far in the period
    pub value: f64,
    /// Goal for the whole period (used as a divisor, zero is not rejected)
    pub target: f64,
}

impl MetricPoint {
    pub fn new(value: f64, target: f64) -> Self {
        Self { value, target }
    }
}

/// Why a straight-line projection could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedProjection {
    /// No time has elapsed in the period yet
    PeriodNotStarted,
    /// The target is zero so no percentage of it exists
    ZeroTarget,
}

/// Result of extrapolating the current pace to the end of the period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectionOutcome {
    Defined {
        /// Extrapolated end-of-period value, not rounded
        projected_value: f64,
        /// Projected value as a rounded percentage of the target
        projected_percent: f64,
    },
    Undefined { reason: UndefinedProjection },
}

impl ProjectionOutcome {
    pub fn projected_value(&self) -> Option<f64> {
        match self {
            ProjectionOutcome::Defined { projected_value, .. } => Some(*projected_value),
            ProjectionOutcome::Undefined { .. } => None,
        }
    }

    pub fn projected_percent(&self) -> Option<f64> {
        match self {
            ProjectionOutcome::Defined { projected_percent, .. } => Some(*projected_percent),
            ProjectionOutcome::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, ProjectionOutcome::Defined { .. })
    }
}

/// Everything a KPI card displays about one metric.
///
/// `percent_complete` is not guarded against a zero target and may be
/// non-finite; serde_json writes such values as `null`, which reads back as `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// target - value, negative when over target
    pub remaining: f64,
    /// Rounded percentage of the target achieved
    #[serde(deserialize_with = "nan_if_null")]
    pub percent_complete: f64,
    pub projection: ProjectionOutcome,
}

/// Reads the `null` serde_json emits for a non-finite number as `NaN`
fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Percentage bounds used to colour an indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// At or above this percentage the indicator is a success
    pub success_at: f64,
    /// At or above this percentage (and below `success_at`) it is a warning
    pub warning_at: f64,
}

impl Thresholds {
    /// Bounds used by the hours, revenue and parts views
    pub const STANDARD: Thresholds = Thresholds { success_at: 90.0, warning_at: 75.0 };
    /// Bounds used by the productivity and quality views
    pub const RELAXED: Thresholds = Thresholds { success_at: 80.0, warning_at: 60.0 };
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Display band of an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Success,
    Warning,
    Danger,
}

impl Band {
    /// Style class suffix used by the dashboard (text-success, bg-danger...)
    pub fn css_class(&self) -> &'static str {
        match self {
            Band::Success => "success",
            Band::Warning => "warning",
            Band::Danger => "danger",
        }
    }
}

/// The dashboard tabs backed by KPI data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Hours,
    Revenue,
    Parts,
    Productivity,
    Quality,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Hours,
        ViewKind::Revenue,
        ViewKind::Parts,
        ViewKind::Productivity,
        ViewKind::Quality,
    ];

    /// URL slug of the tab
    pub fn slug(&self) -> &'static str {
        match self {
            ViewKind::Hours => "heures",
            ViewKind::Revenue => "chiffre-affaires",
            ViewKind::Parts => "pieces",
            ViewKind::Productivity => "productivite",
            ViewKind::Quality => "qualite",
        }
    }

    /// Parse a tab slug, accepting the serde name as well
    pub fn from_slug(slug: &str) -> Result<Self, ViewKindError> {
        let slug = slug.trim().to_lowercase();
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug || kind.serde_name() == slug)
            .ok_or(ViewKindError::Unknown(slug))
    }

    /// Tab title shown in the dashboard header
    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Hours => "Heures atelier",
            ViewKind::Revenue => "Chiffre d'affaires APV",
            ViewKind::Parts => "Ventes pièces de rechange",
            ViewKind::Productivity => "Productivité",
            ViewKind::Quality => "Qualité",
        }
    }

    /// Unit of the values shown on the tab
    pub fn unit(&self) -> &'static str {
        match self {
            ViewKind::Hours => "h",
            ViewKind::Revenue | ViewKind::Parts => "€",
            ViewKind::Productivity | ViewKind::Quality => "%",
        }
    }

    /// Whether the rows of the tab can be summed into a total row
    pub fn is_additive(&self) -> bool {
        matches!(self, ViewKind::Hours | ViewKind::Revenue | ViewKind::Parts)
    }

    fn serde_name(&self) -> &'static str {
        match self {
            ViewKind::Hours => "hours",
            ViewKind::Revenue => "revenue",
            ViewKind::Parts => "parts",
            ViewKind::Productivity => "productivity",
            ViewKind::Quality => "quality",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewKindError {
    Unknown(String),
}

impl fmt::Display for ViewKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKindError::Unknown(slug) => write!(f, "Unknown dashboard view: {}", slug),
        }
    }
}

impl std::error::Error for ViewKindError {}

/// One KPI card (or table row) of a dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    /// Row label, e.g. the department name
    pub label: String,
    pub unit: String,
    pub point: MetricPoint,
    pub summary: ProgressSummary,
    /// Band of `summary.percent_complete` under the view's thresholds
    pub band: Band,
    /// Externally billed client hours (hours view only)
    pub hec_hours: Option<f64>,
    /// HEC as a rounded percentage of the sold hours (hours view only)
    pub hec_share_percent: Option<f64>,
}

/// A fully computed dashboard tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub view: ViewKind,
    pub title: String,
    /// Date the view was computed for
    pub date: NaiveDate,
    /// How far through the month `date` falls, in percent
    pub elapsed_percent: f64,
    pub thresholds: Thresholds,
    pub cards: Vec<KpiCard>,
    /// Weighted total of all cards, only for additive views
    pub total: Option<KpiCard>,
}

/// State of the planning view's "lock potential values" toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialLockStatus {
    pub locked: bool,
    /// Potential hours per department in effect (snapshot when locked)
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPotentialLockRequest {
    pub locked: bool,
}
