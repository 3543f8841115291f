//! Lifecycle phase adjustment.
//!
//! The same risk level reads differently depending on where the project is
//! in its lifecycle: mid-execution there is little slack to absorb a shock,
//! while a closing project has most of its exposure behind it. The scalar
//! table is applied uniformly regardless of aggregation strategy.

use crate::config::RiskWeightConfig;
use crate::core::ProjectPhase;

/// Multiply the post-uplift aggregate by the configured phase scalar and
/// clamp back into [0,1].
pub fn adjust_for_phase(score: f64, phase: ProjectPhase, config: &RiskWeightConfig) -> f64 {
    (score * config.phase_multipliers.get(phase)).clamp(0.0, 1.0)
}
