//! Narrative generation.
//!
//! Renders the templated explanation and the ordered mitigation list for a
//! synthesized assessment. Text is keyed to the primary driver's category;
//! the catalog below is static and ordered most-effective-first.

use super::attribution::Attribution;
use crate::core::{
    AggregationStrategy, ProjectPhase, RiskCategory, RiskFactorInput, Severity,
};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static MITIGATION_CATALOG: Lazy<BTreeMap<RiskCategory, Vec<&'static str>>> = Lazy::new(|| {
    BTreeMap::from([
        (
            RiskCategory::Cost,
            vec![
                "Re-baseline the budget against current commitments and burn rate",
                "Freeze discretionary spend pending a cost variance review",
                "Escalate contingency draw-down approval to the steering committee",
                "Tighten change-order controls on open work packages",
            ],
        ),
        (
            RiskCategory::Schedule,
            vec![
                "Re-plan the critical path and pull float from non-critical work",
                "Add targeted resources to the slipping work packages",
                "Negotiate scope deferrals for non-essential deliverables",
                "Increase milestone review cadence until the slip recovers",
            ],
        ),
        (
            RiskCategory::Workforce,
            vec![
                "Backfill key roles and cross-train for single points of failure",
                "Review retention risk for critical staff on long tasks",
                "Rebalance assignments away from over-allocated teams",
            ],
        ),
        (
            RiskCategory::Subcontractor,
            vec![
                "Audit subcontractor progress against contractual milestones",
                "Qualify a backup vendor for the highest-exposure packages",
                "Tighten acceptance criteria on subcontracted deliverables",
            ],
        ),
        (
            RiskCategory::Equipment,
            vec![
                "Advance preventive maintenance on critical-path equipment",
                "Arrange standby rental coverage for single points of failure",
                "Verify spare-part lead times against the usage forecast",
            ],
        ),
        (
            RiskCategory::Materials,
            vec![
                "Lock in pricing and delivery dates for long-lead materials",
                "Qualify alternate suppliers for constrained commodities",
                "Increase buffer stock for items with volatile lead times",
            ],
        ),
        (
            RiskCategory::Compliance,
            vec![
                "Schedule a compliance gap review with the regulatory lead",
                "Fast-track outstanding permits and certification renewals",
                "Document corrective actions for open audit findings",
            ],
        ),
        (
            RiskCategory::Environmental,
            vec![
                "Update weather and site-condition contingency plans",
                "Review environmental monitoring thresholds and triggers",
                "Pre-stage protective measures for forecast-driven work stops",
            ],
        ),
    ])
});

/// Ordered mitigation suggestions for a category, most effective first.
pub fn mitigations_for(category: RiskCategory) -> Vec<String> {
    MITIGATION_CATALOG
        .get(&category)
        .map(|items| items.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// Render the explanation for a synthesized assessment.
pub fn render_explanation(
    overall_score: f64,
    severity: Severity,
    strategy: AggregationStrategy,
    phase: ProjectPhase,
    attribution: &Attribution,
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    interaction_uplift: f64,
) -> String {
    let primary = attribution.primary_driver;
    let primary_share = attribution.contributions.get(&primary).copied().unwrap_or(0.0);

    let mut text = format!(
        "Overall project risk is {severity} ({:.0}%) across {} assessed domain{} \
         ({strategy} aggregation, {phase} phase). The primary driver is {primary} \
         at {:.0}% of the total",
        overall_score * 100.0,
        factors.len(),
        if factors.len() == 1 { "" } else { "s" },
        primary_share * 100.0,
    );

    if let Some(secondary) = attribution.secondary_driver {
        let share = attribution.contributions.get(&secondary).copied().unwrap_or(0.0);
        text.push_str(&format!(", followed by {secondary} at {:.0}%", share * 100.0));
    }
    text.push('.');

    if let Some(factor) = factors.get(&primary) {
        if let Some(reason) = factor.drivers.first() {
            text.push_str(&format!(" Reported cause: {reason}."));
        }
    }

    if interaction_uplift > 0.0 {
        text.push_str(&format!(
            " Cross-domain interactions added {:.0} points of compounding risk.",
            interaction_uplift * 100.0
        ));
    }

    text
}
