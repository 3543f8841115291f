//! Severity banding for the final score.

use crate::config::SeverityThresholds;
use crate::core::Severity;

/// Map a final score to its severity band. Bands cover [0,1] with no gaps;
/// a score sitting exactly on a cut point maps to the *higher* band.
pub fn classify(score: f64, thresholds: &SeverityThresholds) -> Severity {
    match score {
        s if s >= thresholds.critical => Severity::Critical,
        s if s >= thresholds.high => Severity::High,
        s if s >= thresholds.medium => Severity::Medium,
        _ => Severity::Low,
    }
}
