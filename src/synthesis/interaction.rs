//! Pairwise interaction modeling.
//!
//! Two simultaneously elevated domains compound beyond what either
//! contributes alone (a cost overrun while the schedule slips is worse than
//! the sum of its parts). Each configured pair with both endpoints present
//! yields a bounded uplift term; the pooled total is applied additively to
//! the aggregate, saturating at 1.0.

use crate::config::RiskWeightConfig;
use crate::core::{RiskCategory, RiskFactorInput};
use std::collections::BTreeMap;

/// One computed interaction term.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionTerm {
    pub name: String,
    pub a: RiskCategory,
    pub b: RiskCategory,
    /// `min(cap, multiplier * score_a * score_b)`
    pub uplift: f64,
    /// This term's own alert threshold, checked independently of the
    /// overall score's alert.
    pub alert_threshold: f64,
}

impl InteractionTerm {
    pub fn exceeds_alert_threshold(&self) -> bool {
        self.uplift >= self.alert_threshold
    }
}

/// All interaction terms applicable to one synthesis call.
#[derive(Clone, Debug, Default)]
pub struct InteractionEffects {
    pub terms: Vec<InteractionTerm>,
    pub total_uplift: f64,
}

/// Compute the uplift pool for the present factors.
pub fn model_interactions(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> InteractionEffects {
    let terms: Vec<InteractionTerm> = config
        .interactions
        .iter()
        .filter_map(|pair| {
            let score_a = factors.get(&pair.a)?.score;
            let score_b = factors.get(&pair.b)?.score;
            Some(InteractionTerm {
                name: pair.name.clone(),
                a: pair.a,
                b: pair.b,
                uplift: (pair.multiplier * score_a * score_b).min(pair.cap),
                alert_threshold: pair.alert_threshold,
            })
        })
        .collect();

    let total_uplift = terms.iter().map(|t| t.uplift).sum();
    InteractionEffects { terms, total_uplift }
}

/// Add the uplift pool to an aggregate, saturating so the pre-phase score
/// never exceeds 1.0.
pub fn apply_uplift(base: f64, total_uplift: f64) -> f64 {
    (base + total_uplift).min(1.0)
}
