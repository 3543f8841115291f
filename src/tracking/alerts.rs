//! Threshold-crossing alert detection.
//!
//! Alerts fire only when a value moves from below to at-or-above its
//! threshold. While the value stays above, repeated calls stay silent;
//! dropping below re-arms the condition.

use crate::config::TrackingConfig;
use crate::core::{AlertCondition, RiskAlert, Severity, SynthesizedRiskOutput};
use crate::synthesis::interaction::InteractionTerm;
use std::collections::BTreeSet;

/// Per-key latch state for crossing detection.
#[derive(Clone, Debug, Default)]
pub struct AlertState {
    above_high: bool,
    above_critical: bool,
    /// Interaction pair names currently at or above their own thresholds.
    interactions_above: BTreeSet<String>,
}

/// Evaluate one synthesis result against the latch state, returning any
/// newly fired alerts and updating the state in place.
pub fn evaluate_alerts(
    state: &mut AlertState,
    output: &SynthesizedRiskOutput,
    terms: &[InteractionTerm],
    config: &TrackingConfig,
) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();

    let now_high = output.overall_score >= config.high_alert_threshold;
    let now_critical = output.overall_score >= config.critical_alert_threshold;

    // At most one score alert per call; a jump straight past both cut
    // points reports only the critical crossing.
    if now_critical && !state.above_critical {
        alerts.push(score_alert(
            output,
            Severity::Critical,
            config.critical_alert_threshold,
        ));
    } else if now_high && !state.above_high {
        alerts.push(score_alert(output, Severity::High, config.high_alert_threshold));
    }
    state.above_high = now_high;
    state.above_critical = now_critical;

    let mut now_above = BTreeSet::new();
    for term in terms {
        if term.exceeds_alert_threshold() {
            if !state.interactions_above.contains(&term.name) {
                alerts.push(RiskAlert {
                    severity: Severity::High,
                    condition: AlertCondition::InteractionThreshold {
                        pair: term.name.clone(),
                        threshold: term.alert_threshold,
                    },
                    message: format!(
                        "interaction {} ({} x {}) reached {:.2}, at or above its {:.2} threshold",
                        term.name, term.a, term.b, term.uplift, term.alert_threshold
                    ),
                    timestamp: output.generated_at,
                });
            }
            now_above.insert(term.name.clone());
        }
    }
    state.interactions_above = now_above;

    alerts
}

fn score_alert(output: &SynthesizedRiskOutput, severity: Severity, threshold: f64) -> RiskAlert {
    RiskAlert {
        severity,
        condition: AlertCondition::ScoreThreshold { severity, threshold },
        message: format!(
            "overall risk for {} reached {:.2}, crossing the {severity} threshold ({threshold:.2})",
            output.project_id, output.overall_score
        ),
        timestamp: output.generated_at,
    }
}
