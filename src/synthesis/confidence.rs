//! Aggregate confidence estimation.
//!
//! Geometric mean over present factors' confidences. An arithmetic mean
//! would overstate certainty when one factor is poorly known; the geometric
//! mean collapses toward zero if any single input confidence is very low —
//! a chain is as strong as its weakest link.

use crate::core::{RiskCategory, RiskFactorInput};
use std::collections::BTreeMap;

/// `(prod confidence_i)^(1/n)` over present factors.
///
/// Returns 0.0 for an empty map, though validation rejects that case before
/// synthesis reaches here.
pub fn aggregate_confidence(factors: &BTreeMap<RiskCategory, RiskFactorInput>) -> f64 {
    if factors.is_empty() {
        return 0.0;
    }
    let product: f64 = factors.values().map(|f| f.confidence).product();
    product.powf(1.0 / factors.len() as f64).clamp(0.0, 1.0)
}
