//! Contribution attribution.
//!
//! Splits the final score into per-factor shares summing to 1.0 over the
//! present factors, so narratives and dashboards can say *which* domains
//! drive the assessment without exposing the aggregation math itself. The
//! share formula follows the strategy that produced the score.

use super::aggregation::{hierarchical_weights, renormalized_weights, worst_case_winner};
use crate::config::RiskWeightConfig;
use crate::core::{AggregationStrategy, RiskCategory, RiskFactorInput};
use std::collections::BTreeMap;

/// Per-factor shares plus the top-2 drivers derived from them.
#[derive(Clone, Debug)]
pub struct Attribution {
    pub contributions: BTreeMap<RiskCategory, f64>,
    pub primary_driver: RiskCategory,
    pub secondary_driver: Option<RiskCategory>,
}

/// Compute contribution shares for the present factors under the given
/// strategy.
pub fn attribute(
    strategy: AggregationStrategy,
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> Attribution {
    let contributions = match strategy {
        AggregationStrategy::WeightedAverage => {
            weighted_shares(factors, &renormalized_weights(factors, config))
        }
        AggregationStrategy::Hierarchical => {
            weighted_shares(factors, &hierarchical_weights(factors, config))
        }
        AggregationStrategy::WorstCase => worst_case_shares(factors),
        AggregationStrategy::Compound => compound_shares(factors),
    };

    let (primary_driver, secondary_driver) = top_two(&contributions);
    Attribution {
        contributions,
        primary_driver,
        secondary_driver,
    }
}

/// `score_i * weight_i / sum(score_j * weight_j)`. When every score is zero
/// the weighted mass vanishes; shares then fall back to the effective
/// weights themselves, which already sum to 1.
fn weighted_shares(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    weights: &BTreeMap<RiskCategory, f64>,
) -> BTreeMap<RiskCategory, f64> {
    let total: f64 = factors
        .iter()
        .map(|(category, factor)| factor.score * weights[category])
        .sum();
    if total <= 0.0 {
        return weights.clone();
    }
    factors
        .iter()
        .map(|(category, factor)| (*category, factor.score * weights[category] / total))
        .collect()
}

/// The maximal factor takes the whole share; everything else gets zero.
/// Uses the same tie-break order as worst-case aggregation.
fn worst_case_shares(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
) -> BTreeMap<RiskCategory, f64> {
    let winner = worst_case_winner(factors);
    factors
        .keys()
        .map(|category| (*category, if *category == winner { 1.0 } else { 0.0 }))
        .collect()
}

/// Marginal share of the joint probability: each factor weighted by the
/// chance it is the *only* one that materializes, normalized to 1.
fn compound_shares(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
) -> BTreeMap<RiskCategory, f64> {
    let raw: BTreeMap<RiskCategory, f64> = factors
        .iter()
        .map(|(category, factor)| {
            let others: f64 = factors
                .iter()
                .filter(|(other, _)| *other != category)
                .map(|(_, f)| 1.0 - f.score)
                .product();
            (*category, factor.score * others)
        })
        .collect();

    let total: f64 = raw.values().sum();
    if total <= 0.0 {
        // Degenerate: every score 0 (or every score 1 with n >= 2).
        // Split evenly so shares still sum to 1.
        let uniform = 1.0 / factors.len() as f64;
        return factors.keys().map(|c| (*c, uniform)).collect();
    }
    raw.into_iter().map(|(c, v)| (c, v / total)).collect()
}

/// Highest and second-highest contributors. Ties resolve to the earlier
/// category in priority order, which is the map's iteration order.
fn top_two(contributions: &BTreeMap<RiskCategory, f64>) -> (RiskCategory, Option<RiskCategory>) {
    let mut primary: Option<(RiskCategory, f64)> = None;
    let mut secondary: Option<(RiskCategory, f64)> = None;

    for (category, share) in contributions {
        match primary {
            Some((_, best)) if *share <= best => match secondary {
                Some((_, second)) if *share <= second => {}
                _ => secondary = Some((*category, *share)),
            },
            _ => {
                secondary = primary;
                primary = Some((*category, *share));
            }
        }
    }

    let primary = primary.map(|(c, _)| c).unwrap_or(RiskCategory::Cost);
    (primary, secondary.map(|(c, _)| c))
}
