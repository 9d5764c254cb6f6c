//! Colour banding of percentages.
//!
//! Each view passes its own [`Thresholds`]: the workshop tabs use 90/75 while
//! productivity and quality use 80/60. The split is configuration, not a bug.

use shared::{Band, Thresholds};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("Warning threshold {warning_at} is above success threshold {success_at}")]
    WarningAboveSuccess { success_at: f64, warning_at: f64 },
    #[error("Thresholds must be finite numbers")]
    NotFinite,
}

/// Build thresholds, rejecting a warning bound above the success bound
pub fn checked_thresholds(success_at: f64, warning_at: f64) -> Result<Thresholds, ThresholdError> {
    if !success_at.is_finite() || !warning_at.is_finite() {
        return Err(ThresholdError::NotFinite);
    }
    if warning_at > success_at {
        return Err(ThresholdError::WarningAboveSuccess { success_at, warning_at });
    }
    Ok(Thresholds { success_at, warning_at })
}

/// Band of `percent`. `NaN` falls through to danger, `+inf` is a success.
pub fn classify(percent: f64, thresholds: &Thresholds) -> Band {
    if percent >= thresholds.success_at {
        Band::Success
    } else if percent >= thresholds.warning_at {
        Band::Warning
    } else {
        Band::Danger
    }
}
