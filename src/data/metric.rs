use serde::Serialize;

use super::aggregate::mean;
use super::error::DashError;

// ---------------------------------------------------------------------------
// Period-over-period metric deltas
// ---------------------------------------------------------------------------

/// Change relative to the prior period, or an explicit marker that the prior
/// period had no observations. The marker is a value, not an error: an empty
/// prior period is ordinary dashboard data (January's "last month" is the
/// nonexistent month 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Delta {
    Change(f64),
    Unavailable,
}

/// A displayed metric: the current period's mean and its delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    pub current_mean: f64,
    pub delta: Delta,
}

/// Compare the displayed period against the prior one.
///
/// The current period must have data; asking for a metric over an empty
/// current period is a precondition failure, never coerced to zero. The
/// delta is rounded half-away-from-zero to one decimal. Only emptiness of
/// `prior_values` selects [`Delta::Unavailable`]; any other failure
/// propagates.
pub fn delta(current_values: &[f64], prior_values: &[f64]) -> Result<MetricDelta, DashError> {
    let current_mean = mean(current_values).ok_or(DashError::EmptyMean)?;
    let delta = match mean(prior_values) {
        Some(prior_mean) => Delta::Change(round1(current_mean - prior_mean)),
        None => Delta::Unavailable,
    };
    Ok(MetricDelta {
        current_mean,
        delta,
    })
}

/// Half-away-from-zero rounding to one decimal place.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
