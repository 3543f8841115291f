//! Input validation for synthesis calls.
//!
//! Upstream analyzers contract to deliver scores and confidences already in
//! [0,1]; this gate rejects anything that breaks that contract instead of
//! silently clamping, so bad upstream data is always visible to the caller.

use crate::core::MultiFactorRiskInput;
use crate::errors::{Result, SynthesisError};

// Pure function: check a unit-interval value
fn in_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Validate every factor of a synthesis input.
///
/// Rejects an empty factor set, any score or confidence outside [0,1]
/// (NaN and infinities included), and a factor filed under a different
/// category than it claims.
pub fn validate_input(input: &MultiFactorRiskInput) -> Result<()> {
    if input.factors.is_empty() {
        return Err(SynthesisError::EmptyInput);
    }

    for (category, factor) in &input.factors {
        if factor.category != *category {
            return Err(SynthesisError::invalid_input(
                format!("factors.{category}"),
                format!("entry is keyed {category} but carries category {}", factor.category),
            ));
        }
        if !in_unit_interval(factor.score) {
            return Err(SynthesisError::invalid_input(
                format!("factors.{category}.score"),
                format!("{} is outside [0.0, 1.0]", factor.score),
            ));
        }
        if !in_unit_interval(factor.confidence) {
            return Err(SynthesisError::invalid_input(
                format!("factors.{category}.confidence"),
                format!("{} is outside [0.0, 1.0]", factor.confidence),
            ));
        }
    }

    Ok(())
}
