//! The four aggregation strategies.
//!
//! Each strategy folds the present factor scores into a single pre-phase
//! scalar in [0,1]. Interaction uplift is added *after* the strategy runs
//! (see `interaction::apply_uplift`), so the formulas here see raw scores
//! only. Missing categories are excluded throughout — weights renormalize
//! over the present subset rather than treating absence as zero risk.

use crate::config::RiskWeightConfig;
use crate::core::{AggregationStrategy, RiskCategory, RiskFactorInput};
use std::collections::BTreeMap;

/// Fixed tier membership for the hierarchical strategy.
///
/// Tier1 carries the factors that sink projects outright; Tier2 the
/// delivery capacity factors; Tier3 the supply and regulatory factors.
pub fn tier_of(category: RiskCategory) -> u8 {
    match category {
        RiskCategory::Cost | RiskCategory::Schedule => 1,
        RiskCategory::Workforce | RiskCategory::Subcontractor | RiskCategory::Equipment => 2,
        RiskCategory::Materials | RiskCategory::Compliance | RiskCategory::Environmental => 3,
    }
}

/// Configured weights renormalized over the present factors, summing to 1.
pub fn renormalized_weights(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> BTreeMap<RiskCategory, f64> {
    let total: f64 = factors.keys().map(|c| config.weights.get(*c)).sum();
    if total <= 0.0 {
        // All configured weights zero for the present subset: fall back to
        // uniform shares so the average stays well-defined.
        let uniform = 1.0 / factors.len() as f64;
        return factors.keys().map(|c| (*c, uniform)).collect();
    }
    factors
        .keys()
        .map(|c| (*c, config.weights.get(*c) / total))
        .collect()
}

/// Effective per-factor weights under the hierarchical strategy: each
/// non-empty tier's (renormalized) weight split evenly across its present
/// members. Sums to 1 over present factors.
pub fn hierarchical_weights(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> BTreeMap<RiskCategory, f64> {
    let tier_weights = [
        config.hierarchy.tier1_weight,
        config.hierarchy.tier2_weight,
        config.hierarchy.tier3_weight,
    ];
    let mut tier_counts = [0usize; 3];
    for category in factors.keys() {
        tier_counts[usize::from(tier_of(*category)) - 1] += 1;
    }

    // Empty tiers drop out; the remaining tier weights renormalize to 1
    let active_total: f64 = tier_weights
        .iter()
        .zip(tier_counts.iter())
        .filter(|(_, count)| **count > 0)
        .map(|(weight, _)| weight)
        .sum();

    if active_total <= 0.0 {
        // Every present tier carries zero weight: fall back to uniform
        // shares so the aggregate stays well-defined, mirroring
        // renormalized_weights
        let uniform = 1.0 / factors.len() as f64;
        return factors.keys().map(|c| (*c, uniform)).collect();
    }

    factors
        .keys()
        .map(|category| {
            let tier = usize::from(tier_of(*category)) - 1;
            let share = tier_weights[tier] / active_total / tier_counts[tier] as f64;
            (*category, share)
        })
        .collect()
}

/// The factor holding the maximum score, ties broken by the fixed category
/// priority order (cost first).
pub fn worst_case_winner(factors: &BTreeMap<RiskCategory, RiskFactorInput>) -> RiskCategory {
    let mut winner = None;
    let mut best = f64::NEG_INFINITY;
    // ALL is priority order; strict > keeps the earliest category on ties
    for category in RiskCategory::ALL {
        if let Some(factor) = factors.get(&category) {
            if factor.score > best {
                best = factor.score;
                winner = Some(category);
            }
        }
    }
    // factors is non-empty by the time aggregation runs
    winner.unwrap_or(RiskCategory::Cost)
}

fn weighted_average(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> f64 {
    renormalized_weights(factors, config)
        .iter()
        .map(|(category, weight)| factors[category].score * weight)
        .sum()
}

fn worst_case(factors: &BTreeMap<RiskCategory, RiskFactorInput>) -> f64 {
    factors[&worst_case_winner(factors)].score
}

/// Probability that at least one risk materializes, under independence.
/// Intentionally ignores configured weights.
fn compound(factors: &BTreeMap<RiskCategory, RiskFactorInput>) -> f64 {
    1.0 - factors
        .values()
        .map(|f| 1.0 - f.score)
        .product::<f64>()
}

fn hierarchical(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> f64 {
    let weights = hierarchical_weights(factors, config);
    let base: f64 = weights
        .iter()
        .map(|(category, weight)| factors[category].score * weight)
        .sum();

    (base + dependency_boost(factors, config)).min(1.0)
}

/// Capped delta added when both designated dependency factors are elevated
/// past the secondary threshold — risk combinations that compound beyond a
/// simple average.
fn dependency_boost(
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> f64 {
    let (dep_a, dep_b) = config.hierarchy.dependency_factors;
    match (factors.get(&dep_a), factors.get(&dep_b)) {
        (Some(a), Some(b))
            if a.score > config.hierarchy.secondary_threshold
                && b.score > config.hierarchy.secondary_threshold =>
        {
            (config.hierarchy.boost_factor * a.score.min(b.score))
                .min(config.hierarchy.boost_cap)
        }
        _ => 0.0,
    }
}

/// Run the selected strategy over the present factors, producing the
/// pre-uplift, pre-phase aggregate in [0,1].
pub fn aggregate(
    strategy: AggregationStrategy,
    factors: &BTreeMap<RiskCategory, RiskFactorInput>,
    config: &RiskWeightConfig,
) -> f64 {
    let score = match strategy {
        AggregationStrategy::WeightedAverage => weighted_average(factors, config),
        AggregationStrategy::WorstCase => worst_case(factors),
        AggregationStrategy::Compound => compound(factors),
        AggregationStrategy::Hierarchical => hierarchical(factors, config),
    };
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RiskFactorInput;

    fn factors(entries: &[(RiskCategory, f64)]) -> BTreeMap<RiskCategory, RiskFactorInput> {
        entries
            .iter()
            .map(|(cat, score)| (*cat, RiskFactorInput::new(*cat, *score, 0.9)))
            .collect()
    }

    fn equal_weight_config() -> RiskWeightConfig {
        let mut config = RiskWeightConfig::default();
        for cat in RiskCategory::ALL {
            match cat {
                RiskCategory::Cost => config.weights.cost = 0.125,
                RiskCategory::Schedule => config.weights.schedule = 0.125,
                RiskCategory::Workforce => config.weights.workforce = 0.125,
                RiskCategory::Subcontractor => config.weights.subcontractor = 0.125,
                RiskCategory::Equipment => config.weights.equipment = 0.125,
                RiskCategory::Materials => config.weights.materials = 0.125,
                RiskCategory::Compliance => config.weights.compliance = 0.125,
                RiskCategory::Environmental => config.weights.environmental = 0.125,
            }
        }
        config
    }

    #[test]
    fn test_weighted_average_renormalizes_over_present() {
        let config = RiskWeightConfig::default();
        // cost 0.20 and schedule 0.20 renormalize to 0.5 each
        let factors = factors(&[(RiskCategory::Cost, 0.8), (RiskCategory::Schedule, 0.4)]);

        let score = aggregate(AggregationStrategy::WeightedAverage, &factors, &config);

        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_unequal_weights() {
        let config = RiskWeightConfig::default();
        // cost 0.20, workforce 0.12 -> renormalized 0.625 / 0.375
        let factors = factors(&[(RiskCategory::Cost, 1.0), (RiskCategory::Workforce, 0.0)]);

        let score = aggregate(AggregationStrategy::WeightedAverage, &factors, &config);

        assert!((score - 0.625).abs() < 1e-9);
    }

    #[test]
    fn test_worst_case_takes_maximum() {
        let config = RiskWeightConfig::default();
        let factors = factors(&[
            (RiskCategory::Cost, 0.3),
            (RiskCategory::Materials, 0.9),
            (RiskCategory::Schedule, 0.5),
        ]);

        let score = aggregate(AggregationStrategy::WorstCase, &factors, &config);

        assert_eq!(score, 0.9);
        assert_eq!(worst_case_winner(&factors), RiskCategory::Materials);
    }

    #[test]
    fn test_worst_case_tie_breaks_by_priority_order() {
        let factors = factors(&[
            (RiskCategory::Environmental, 0.7),
            (RiskCategory::Schedule, 0.7),
            (RiskCategory::Materials, 0.7),
        ]);

        assert_eq!(worst_case_winner(&factors), RiskCategory::Schedule);
    }

    #[test]
    fn test_compound_joint_probability() {
        let config = RiskWeightConfig::default();
        let factors = factors(&[(RiskCategory::Cost, 0.9), (RiskCategory::Schedule, 0.1)]);

        let score = aggregate(AggregationStrategy::Compound, &factors, &config);

        // 1 - (0.1 * 0.9) = 0.91
        assert!((score - 0.91).abs() < 1e-9);
    }

    #[test]
    fn test_strategy_divergence_scenario() {
        let config = equal_weight_config();
        let factors = factors(&[(RiskCategory::Cost, 0.9), (RiskCategory::Schedule, 0.1)]);

        let worst = aggregate(AggregationStrategy::WorstCase, &factors, &config);
        let average = aggregate(AggregationStrategy::WeightedAverage, &factors, &config);
        let compound = aggregate(AggregationStrategy::Compound, &factors, &config);

        assert!((worst - 0.9).abs() < 1e-9);
        assert!((average - 0.5).abs() < 1e-9);
        assert!((compound - 0.91).abs() < 1e-9);
    }

    #[test]
    fn test_compound_monotone_in_added_factor() {
        let config = RiskWeightConfig::default();
        let two = factors(&[(RiskCategory::Cost, 0.5), (RiskCategory::Schedule, 0.4)]);
        let three = factors(&[
            (RiskCategory::Cost, 0.5),
            (RiskCategory::Schedule, 0.4),
            (RiskCategory::Materials, 0.2),
        ]);

        let base = aggregate(AggregationStrategy::Compound, &two, &config);
        let extended = aggregate(AggregationStrategy::Compound, &three, &config);

        assert!(extended >= base);
    }

    #[test]
    fn test_hierarchical_full_set() {
        let config = RiskWeightConfig::default();
        // All eight at 0.4: every tier mean is 0.4, no boost (below 0.6)
        let all: Vec<(RiskCategory, f64)> =
            RiskCategory::ALL.iter().map(|c| (*c, 0.4)).collect();
        let factors = factors(&all);

        let score = aggregate(AggregationStrategy::Hierarchical, &factors, &config);

        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_hierarchical_empty_tier_renormalizes() {
        let config = RiskWeightConfig::default();
        // Only tier1 present: its weight renormalizes to 1.0
        let factors = factors(&[(RiskCategory::Cost, 0.5), (RiskCategory::Schedule, 0.3)]);

        let score = aggregate(AggregationStrategy::Hierarchical, &factors, &config);

        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_hierarchical_dependency_boost_applies() {
        let config = RiskWeightConfig::default();
        let factors = factors(&[(RiskCategory::Cost, 0.8), (RiskCategory::Schedule, 0.7)]);

        let score = aggregate(AggregationStrategy::Hierarchical, &factors, &config);

        // tier mean 0.75 plus min(0.10, 0.25 * 0.7) = 0.10
        assert!((score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_hierarchical_no_boost_below_secondary_threshold() {
        let config = RiskWeightConfig::default();
        let factors = factors(&[(RiskCategory::Cost, 0.8), (RiskCategory::Schedule, 0.5)]);

        let score = aggregate(AggregationStrategy::Hierarchical, &factors, &config);

        assert!((score - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_hierarchical_weights_sum_to_one() {
        let config = RiskWeightConfig::default();
        let factors = factors(&[
            (RiskCategory::Cost, 0.5),
            (RiskCategory::Workforce, 0.5),
            (RiskCategory::Equipment, 0.5),
            (RiskCategory::Environmental, 0.5),
        ]);

        let weights = hierarchical_weights(&factors, &config);
        let sum: f64 = weights.values().sum();

        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hierarchical_zero_weight_active_tiers_fall_back_to_uniform() {
        // A zero weight on the only populated tier must not divide by zero
        let mut config = RiskWeightConfig::default();
        config.hierarchy.tier1_weight = 0.0;
        config.hierarchy.tier2_weight = 0.5;
        config.hierarchy.tier3_weight = 0.5;
        let factors = factors(&[(RiskCategory::Cost, 0.8)]);

        let weights = hierarchical_weights(&factors, &config);
        assert!(weights.values().all(|w| w.is_finite()));
        assert!((weights.values().sum::<f64>() - 1.0).abs() < 1e-9);

        let score = aggregate(AggregationStrategy::Hierarchical, &factors, &config);
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_single_factor_all_strategies_agree() {
        let config = RiskWeightConfig::default();
        let factors = factors(&[(RiskCategory::Compliance, 0.42)]);

        for strategy in [
            AggregationStrategy::WeightedAverage,
            AggregationStrategy::WorstCase,
            AggregationStrategy::Compound,
            AggregationStrategy::Hierarchical,
        ] {
            let score = aggregate(strategy, &factors, &config);
            assert!(
                (score - 0.42).abs() < 1e-9,
                "{strategy} should reduce to the lone score"
            );
        }
    }
}
