//! Trend analysis over a short moving window of synthesis scores.
//!
//! Higher scores mean more risk, so a rising window is *worsening* and a
//! falling one is *improving*.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Worsening,
    Stable,
}

/// Direction and signed slope of the recent score window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Least-squares slope of score against call index within the window;
    /// positive means risk is rising per call.
    pub velocity: f64,
    /// Number of scores the trend was computed over.
    pub window: usize,
}

impl Trend {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            velocity: 0.0,
            window: 0,
        }
    }
}

/// Analyze a window of scores, oldest first. Fewer than two scores is
/// always stable. Direction compares the newer half's mean to the older
/// half's; deltas within `epsilon` count as stable.
pub fn analyze_trend(scores: &[f64], epsilon: f64) -> Trend {
    if scores.len() < 2 {
        return Trend {
            window: scores.len(),
            ..Trend::stable()
        };
    }

    let mid = scores.len() / 2;
    let older_mean = mean(&scores[..mid]);
    let newer_mean = mean(&scores[scores.len() - mid..]);
    let delta = newer_mean - older_mean;

    let direction = if delta > epsilon {
        TrendDirection::Worsening
    } else if delta < -epsilon {
        TrendDirection::Improving
    } else {
        TrendDirection::Stable
    };

    Trend {
        direction,
        velocity: slope(scores),
        window: scores.len(),
    }
}

// Pure function: arithmetic mean of a non-empty slice
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Pure function: least-squares slope of values against their indices
fn slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
