//! # Progress/Projection Calculator
//!
//! Pure numeric transforms shared by every dashboard view: remaining amount,
//! percent complete and straight-line projection of the end-of-period value.
//!
//! Division by zero is not guarded in the raw functions. A zero target or a
//! zero elapsed time gives `inf`/`NaN`, exactly as the dashboard displays it.
//! [`projection`] is the exception: it returns a tagged outcome so period
//! start and zero targets are explicit.

use shared::{MetricPoint, ProgressSummary, ProjectionOutcome, UndefinedProjection};

use super::period::TimeProgress;

/// Display rounding: halves go towards positive infinity, so `-2.5` becomes `-2`.
/// Non-finite inputs pass through unchanged.
pub fn round_display(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// `target - value`, negative when over target
pub fn remaining(value: f64, target: f64) -> f64 {
    target - value
}

/// Rounded percentage of the target achieved
pub fn percent_complete(value: f64, target: f64) -> f64 {
    round_display(value / target * 100.0)
}

/// Straight-line extrapolation of the end-of-period value.
///
/// `time_progress_percent` is in `[0, 100]`; at 0 the result is non-finite.
pub fn projected_value(value: f64, time_progress_percent: f64) -> f64 {
    value / (time_progress_percent / 100.0)
}

/// Percentage of the target reached by period end at the current pace
pub fn projection(value: f64, target: f64, time_progress_percent: f64) -> ProjectionOutcome {
    if time_progress_percent == 0.0 {
        return ProjectionOutcome::Undefined {
            reason: UndefinedProjection::PeriodNotStarted,
        };
    }
    if target == 0.0 {
        return ProjectionOutcome::Undefined {
            reason: UndefinedProjection::ZeroTarget,
        };
    }

    let projected = projected_value(value, time_progress_percent);
    ProjectionOutcome::Defined {
        projected_value: projected,
        projected_percent: round_display(projected / target * 100.0),
    }
}

/// Everything a KPI card needs for one metric
pub fn summarize(point: MetricPoint, time_progress: TimeProgress) -> ProgressSummary {
    ProgressSummary {
        remaining: remaining(point.value, point.target),
        percent_complete: percent_complete(point.value, point.target),
        projection: projection(point.value, point.target, time_progress.percent()),
    }
}

/// Weighted total of a table: values and targets are summed separately
pub fn aggregate<I>(points: I) -> MetricPoint
where
    I: IntoIterator<Item = MetricPoint>,
{
    points
        .into_iter()
        .fold(MetricPoint::new(0.0, 0.0), |acc, p| {
            MetricPoint::new(acc.value + p.value, acc.target + p.target)
        })
}

/// Rounded share of `part` in `whole`, e.g. HEC within sold hours
pub fn share_percent(part: f64, whole: f64) -> f64 {
    round_display(part / whole * 100.0)
}
