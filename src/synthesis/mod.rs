//! The synthesis pipeline.
//!
//! `synthesize` is a pure function of `(input, config, strategy)`: identical
//! arguments always produce identical scores, severities, confidences and
//! contributions. The `generated_at` timestamp is the only field outside
//! that contract and never feeds back into scoring. There is no I/O and no
//! internal locking; calls are safe to run concurrently.

pub mod aggregation;
pub mod attribution;
pub mod confidence;
pub mod interaction;
pub mod narrative;
pub mod normalize;
pub mod phase;
pub mod severity;

use crate::config::RiskWeightConfig;
use crate::core::{AggregationStrategy, MultiFactorRiskInput, SynthesizedRiskOutput};
use crate::errors::Result;
use chrono::Utc;
use log::debug;

/// Synthesize the per-domain factors of `input` into a single project-level
/// assessment using the selected strategy.
///
/// Validates the configuration and every factor up front; a reduced factor
/// count (1-7 of 8) is supported and handled by weight renormalization plus
/// a correspondingly lower aggregate confidence.
pub fn synthesize(
    input: &MultiFactorRiskInput,
    config: &RiskWeightConfig,
    strategy: AggregationStrategy,
) -> Result<SynthesizedRiskOutput> {
    synthesize_with_interactions(input, config, strategy).map(|(output, _)| output)
}

/// Like [`synthesize`], but also returns the computed interaction terms.
/// The tracker needs the per-pair values for its crossing checks; returning
/// them here keeps the alert path on exactly the terms that produced the
/// output's uplift.
pub fn synthesize_with_interactions(
    input: &MultiFactorRiskInput,
    config: &RiskWeightConfig,
    strategy: AggregationStrategy,
) -> Result<(SynthesizedRiskOutput, interaction::InteractionEffects)> {
    config.validate()?;
    normalize::validate_input(input)?;

    let effects = interaction::model_interactions(&input.factors, config);
    let base = aggregation::aggregate(strategy, &input.factors, config);
    let uplifted = interaction::apply_uplift(base, effects.total_uplift);
    let overall_score = phase::adjust_for_phase(uplifted, input.phase, config);

    let confidence = confidence::aggregate_confidence(&input.factors);
    let severity = severity::classify(overall_score, &config.severity_thresholds);
    let attribution = attribution::attribute(strategy, &input.factors, config);

    debug!(
        "synthesized {}/{}: base={base:.3} uplift={:.3} overall={overall_score:.3} \
         severity={severity} confidence={confidence:.3}",
        input.project_id,
        input.task_id.as_deref().unwrap_or("-"),
        effects.total_uplift,
    );

    let narrative_explanation = narrative::render_explanation(
        overall_score,
        severity,
        strategy,
        input.phase,
        &attribution,
        &input.factors,
        effects.total_uplift,
    );
    let mitigation_suggestions = narrative::mitigations_for(attribution.primary_driver);

    let output = SynthesizedRiskOutput {
        project_id: input.project_id.clone(),
        task_id: input.task_id.clone(),
        strategy,
        phase: input.phase,
        overall_score,
        severity,
        confidence,
        contributions: attribution.contributions,
        primary_driver: attribution.primary_driver,
        secondary_driver: attribution.secondary_driver,
        interaction_uplift: effects.total_uplift,
        narrative_explanation,
        mitigation_suggestions,
        generated_at: Utc::now(),
    };
    Ok((output, effects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProjectPhase, RiskCategory, RiskFactorInput, Severity};

    fn no_interaction_config() -> RiskWeightConfig {
        RiskWeightConfig {
            interactions: Vec::new(),
            ..RiskWeightConfig::default()
        }
    }

    fn cost_schedule_input(phase: ProjectPhase) -> MultiFactorRiskInput {
        MultiFactorRiskInput::new("p1", phase)
            .add_factor(RiskFactorInput::new(RiskCategory::Cost, 0.8, 0.9))
            .add_factor(RiskFactorInput::new(RiskCategory::Schedule, 0.7, 0.85))
    }

    #[test]
    fn test_reference_scenario() {
        // cost 0.8/0.9 + schedule 0.7/0.85, equal renormalized weights,
        // planning phase, no interactions
        let config = no_interaction_config();
        let input = cost_schedule_input(ProjectPhase::Planning);

        let output =
            synthesize(&input, &config, AggregationStrategy::WeightedAverage).unwrap();

        assert!((output.overall_score - 0.75).abs() < 1e-9);
        assert_eq!(output.severity, Severity::High);
        assert!((output.confidence - (0.9f64 * 0.85).sqrt()).abs() < 1e-9);
        assert_eq!(output.primary_driver, RiskCategory::Cost);
        assert_eq!(output.secondary_driver, Some(RiskCategory::Schedule));
    }

    #[test]
    fn test_empty_input_rejected() {
        let config = RiskWeightConfig::default();
        let input = MultiFactorRiskInput::new("p1", ProjectPhase::Planning);

        let result = synthesize(&input, &config, AggregationStrategy::WeightedAverage);

        assert_eq!(result.unwrap_err(), crate::errors::SynthesisError::EmptyInput);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RiskWeightConfig::default();
        config.weights.cost = 0.9;
        let input = cost_schedule_input(ProjectPhase::Planning);

        let result = synthesize(&input, &config, AggregationStrategy::WeightedAverage);

        assert!(matches!(
            result,
            Err(crate::errors::SynthesisError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_deterministic_apart_from_timestamp() {
        let config = RiskWeightConfig::default();
        let input = cost_schedule_input(ProjectPhase::Execution);

        let a = synthesize(&input, &config, AggregationStrategy::Hierarchical).unwrap();
        let b = synthesize(&input, &config, AggregationStrategy::Hierarchical).unwrap();

        assert_eq!(a.overall_score.to_bits(), b.overall_score.to_bits());
        assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
        assert_eq!(a.severity, b.severity);
        assert_eq!(a.contributions, b.contributions);
        assert_eq!(a.narrative_explanation, b.narrative_explanation);
    }

    #[test]
    fn test_phase_ordering_post_clamp() {
        let config = no_interaction_config();
        let planning = synthesize(
            &cost_schedule_input(ProjectPhase::Planning),
            &config,
            AggregationStrategy::WeightedAverage,
        )
        .unwrap();
        let execution = synthesize(
            &cost_schedule_input(ProjectPhase::Execution),
            &config,
            AggregationStrategy::WeightedAverage,
        )
        .unwrap();

        assert!(execution.overall_score >= planning.overall_score);
    }

    #[test]
    fn test_uplift_feeds_overall_score() {
        // Default config has a cost/schedule interaction:
        // min(0.15, 0.5 * 0.8 * 0.7) = 0.15 on top of the 0.75 average
        let config = RiskWeightConfig::default();
        let input = cost_schedule_input(ProjectPhase::Planning);

        let output =
            synthesize(&input, &config, AggregationStrategy::WeightedAverage).unwrap();

        assert!((output.interaction_uplift - 0.15).abs() < 1e-9);
        assert!((output.overall_score - 0.90).abs() < 1e-9);
        assert_eq!(output.severity, Severity::Critical);
    }

    #[test]
    fn test_returned_interaction_terms_match_output_uplift() {
        let config = RiskWeightConfig::default();
        let input = cost_schedule_input(ProjectPhase::Planning);

        let (output, effects) =
            synthesize_with_interactions(&input, &config, AggregationStrategy::WeightedAverage)
                .unwrap();

        let term_sum: f64 = effects.terms.iter().map(|t| t.uplift).sum();
        assert!((term_sum - output.interaction_uplift).abs() < 1e-12);
        assert_eq!(effects.terms.len(), 1);
        assert_eq!(effects.terms[0].name, "cost_schedule");
    }

    #[test]
    fn test_missing_categories_never_treated_as_zero() {
        let config = no_interaction_config();
        // A lone 0.8 factor must synthesize to 0.8, not be dragged down by
        // seven absent domains
        let input = MultiFactorRiskInput::new("p1", ProjectPhase::Planning)
            .add_factor(RiskFactorInput::new(RiskCategory::Compliance, 0.8, 1.0));

        let output =
            synthesize(&input, &config, AggregationStrategy::WeightedAverage).unwrap();

        assert!((output.overall_score - 0.8).abs() < 1e-9);
        assert_eq!(output.contributions.len(), 1);
    }

    #[test]
    fn test_output_bounds_across_strategies() {
        let config = RiskWeightConfig::default();
        let input = MultiFactorRiskInput::new("p1", ProjectPhase::Execution)
            .add_factor(RiskFactorInput::new(RiskCategory::Cost, 1.0, 0.2))
            .add_factor(RiskFactorInput::new(RiskCategory::Schedule, 1.0, 1.0))
            .add_factor(RiskFactorInput::new(RiskCategory::Equipment, 0.9, 0.5))
            .add_factor(RiskFactorInput::new(RiskCategory::Materials, 0.95, 0.7));

        for strategy in [
            AggregationStrategy::WeightedAverage,
            AggregationStrategy::WorstCase,
            AggregationStrategy::Compound,
            AggregationStrategy::Hierarchical,
        ] {
            let output = synthesize(&input, &config, strategy).unwrap();
            assert!((0.0..=1.0).contains(&output.overall_score));
            assert!((0.0..=1.0).contains(&output.confidence));
            let sum: f64 = output.contributions.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{strategy}: contributions sum {sum}");
        }
    }

    #[test]
    fn test_mitigations_follow_primary_driver() {
        let config = no_interaction_config();
        let input = MultiFactorRiskInput::new("p1", ProjectPhase::Planning)
            .add_factor(RiskFactorInput::new(RiskCategory::Materials, 0.9, 0.8))
            .add_factor(RiskFactorInput::new(RiskCategory::Cost, 0.1, 0.8));

        let output = synthesize(&input, &config, AggregationStrategy::WorstCase).unwrap();

        assert_eq!(output.primary_driver, RiskCategory::Materials);
        assert!(output.mitigation_suggestions[0].contains("long-lead materials"));
    }
}
