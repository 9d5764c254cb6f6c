//! Hardcoded figures the dashboard is demonstrated with.
//!
//! Values are month-to-date, targets are for the whole month. HEC is kept
//! around 70% of the sold hours.

use shared::ViewKind;
use std::collections::BTreeMap;

/// One row of a dashboard table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockRow {
    pub label: &'static str,
    pub value: f64,
    pub target: f64,
    /// Externally billed client hours, hours view only
    pub hec: Option<f64>,
}

const fn row(label: &'static str, value: f64, target: f64) -> MockRow {
    MockRow { label, value, target, hec: None }
}

const fn hours_row(label: &'static str, value: f64, target: f64, hec: f64) -> MockRow {
    MockRow { label, value, target, hec: Some(hec) }
}

const HOURS: [MockRow; 4] = [
    hours_row("Mécanique", 59.0, 735.0, 41.0),
    hours_row("Carrosserie", 212.0, 420.0, 148.0),
    hours_row("Préparation VO", 96.0, 180.0, 67.0),
    hours_row("Diagnostic électrique", 38.0, 120.0, 27.0),
];

const REVENUE: [MockRow; 4] = [
    row("Atelier mécanique", 48_500.0, 95_000.0),
    row("Carrosserie", 36_200.0, 60_000.0),
    row("Entretien rapide", 12_800.0, 18_000.0),
    row("Garantie constructeur", 9_400.0, 15_000.0),
];

const PARTS: [MockRow; 4] = [
    row("Comptoir", 22_300.0, 40_000.0),
    row("Atelier", 31_750.0, 52_000.0),
    row("Accessoires", 4_100.0, 9_000.0),
    row("Pneumatiques", 7_900.0, 12_500.0),
];

const PRODUCTIVITY: [MockRow; 3] = [
    row("Équipe mécanique", 87.0, 95.0),
    row("Équipe carrosserie", 74.0, 90.0),
    row("Équipe diagnostic", 92.0, 95.0),
];

const QUALITY: [MockRow; 4] = [
    row("Satisfaction client", 88.0, 90.0),
    row("Réparé du premier coup", 93.0, 95.0),
    row("Rendez-vous honorés", 81.0, 90.0),
    row("Réponses aux enquêtes", 46.0, 60.0),
];

/// Rows shown on a dashboard tab
pub fn rows(kind: ViewKind) -> &'static [MockRow] {
    match kind {
        ViewKind::Hours => &HOURS,
        ViewKind::Revenue => &REVENUE,
        ViewKind::Parts => &PARTS,
        ViewKind::Productivity => &PRODUCTIVITY,
        ViewKind::Quality => &QUALITY,
    }
}

/// Potential hours per department used by the planning view
pub fn potential_hours() -> BTreeMap<String, f64> {
    HOURS
        .iter()
        .map(|r| (r.label.to_string(), r.target))
        .collect()
}
