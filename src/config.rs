use crate::core::{ProjectPhase, RiskCategory};
use crate::errors::{Result, SynthesisError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Per-category weights used by the weighted-average strategy.
///
/// The full eight-category set must sum to 1.0 (± 1e-3). When only a subset
/// of factors is present, the aggregator renormalizes over that subset, so
/// missing domains never bias the result toward zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWeights {
    #[serde(default = "default_cost_weight")]
    pub cost: f64,
    #[serde(default = "default_schedule_weight")]
    pub schedule: f64,
    #[serde(default = "default_workforce_weight")]
    pub workforce: f64,
    #[serde(default = "default_subcontractor_weight")]
    pub subcontractor: f64,
    #[serde(default = "default_equipment_weight")]
    pub equipment: f64,
    #[serde(default = "default_materials_weight")]
    pub materials: f64,
    #[serde(default = "default_compliance_weight")]
    pub compliance: f64,
    #[serde(default = "default_environmental_weight")]
    pub environmental: f64,
}

fn default_cost_weight() -> f64 {
    0.20
}
fn default_schedule_weight() -> f64 {
    0.20
}
fn default_workforce_weight() -> f64 {
    0.12
}
fn default_subcontractor_weight() -> f64 {
    0.12
}
fn default_equipment_weight() -> f64 {
    0.10
}
fn default_materials_weight() -> f64 {
    0.10
}
fn default_compliance_weight() -> f64 {
    0.08
}
fn default_environmental_weight() -> f64 {
    0.08
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            cost: default_cost_weight(),
            schedule: default_schedule_weight(),
            workforce: default_workforce_weight(),
            subcontractor: default_subcontractor_weight(),
            equipment: default_equipment_weight(),
            materials: default_materials_weight(),
            compliance: default_compliance_weight(),
            environmental: default_environmental_weight(),
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::Cost => self.cost,
            RiskCategory::Schedule => self.schedule,
            RiskCategory::Workforce => self.workforce,
            RiskCategory::Subcontractor => self.subcontractor,
            RiskCategory::Equipment => self.equipment,
            RiskCategory::Materials => self.materials,
            RiskCategory::Compliance => self.compliance,
            RiskCategory::Environmental => self.environmental,
        }
    }

    // Pure function: check a single weight is in valid range
    fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    fn collect_violations(&self, out: &mut Vec<String>) {
        for cat in RiskCategory::ALL {
            let w = self.get(cat);
            if !Self::is_valid_weight(w) {
                out.push(format!("weight for {cat} must be between 0.0 and 1.0, got {w}"));
            }
        }
        let sum: f64 = RiskCategory::ALL.iter().map(|c| self.get(*c)).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            out.push(format!(
                "category weights must sum to 1.0, but sum to {sum:.3}"
            ));
        }
    }
}

const WEIGHT_SUM_EPSILON: f64 = 1e-3;

/// A named interaction between two risk domains. When both endpoints are
/// present, `min(cap, multiplier * score_a * score_b)` is added to the
/// uplift pool, and the term is separately compared to `alert_threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionPair {
    pub name: String,
    pub a: RiskCategory,
    pub b: RiskCategory,
    pub multiplier: f64,
    pub cap: f64,
    #[serde(default = "default_interaction_alert_threshold")]
    pub alert_threshold: f64,
}

fn default_interaction_alert_threshold() -> f64 {
    0.10
}

fn default_interactions() -> Vec<InteractionPair> {
    vec![
        InteractionPair {
            name: "cost_schedule".to_string(),
            a: RiskCategory::Cost,
            b: RiskCategory::Schedule,
            multiplier: 0.5,
            cap: 0.15,
            alert_threshold: 0.10,
        },
        InteractionPair {
            name: "schedule_subcontractor".to_string(),
            a: RiskCategory::Schedule,
            b: RiskCategory::Subcontractor,
            multiplier: 0.4,
            cap: 0.12,
            alert_threshold: 0.10,
        },
        InteractionPair {
            name: "equipment_materials".to_string(),
            a: RiskCategory::Equipment,
            b: RiskCategory::Materials,
            multiplier: 0.3,
            cap: 0.10,
            alert_threshold: 0.08,
        },
    ]
}

/// Lifecycle multipliers applied to the aggregate after uplift, uniformly
/// across all four strategies. The result is clamped back into [0,1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseMultipliers {
    #[serde(default = "default_planning_multiplier")]
    pub planning: f64,
    #[serde(default = "default_execution_multiplier")]
    pub execution: f64,
    #[serde(default = "default_closing_multiplier")]
    pub closing: f64,
}

fn default_planning_multiplier() -> f64 {
    1.0
}
fn default_execution_multiplier() -> f64 {
    1.3
}
fn default_closing_multiplier() -> f64 {
    0.7
}

impl Default for PhaseMultipliers {
    fn default() -> Self {
        Self {
            planning: default_planning_multiplier(),
            execution: default_execution_multiplier(),
            closing: default_closing_multiplier(),
        }
    }
}

impl PhaseMultipliers {
    pub fn get(&self, phase: ProjectPhase) -> f64 {
        match phase {
            ProjectPhase::Planning => self.planning,
            ProjectPhase::Execution => self.execution,
            ProjectPhase::Closing => self.closing,
        }
    }
}

/// Severity band cut points. Bands are `[0, medium) -> LOW`,
/// `[medium, high) -> MEDIUM`, `[high, critical) -> HIGH`,
/// `[critical, 1] -> CRITICAL`; a score equal to a cut point maps to the
/// higher band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityThresholds {
    #[serde(default = "default_medium_threshold")]
    pub medium: f64,
    #[serde(default = "default_high_threshold")]
    pub high: f64,
    #[serde(default = "default_critical_threshold")]
    pub critical: f64,
}

fn default_medium_threshold() -> f64 {
    0.35
}
fn default_high_threshold() -> f64 {
    0.60
}
fn default_critical_threshold() -> f64 {
    0.80
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            medium: default_medium_threshold(),
            high: default_high_threshold(),
            critical: default_critical_threshold(),
        }
    }
}

/// Tier layout and dependency-boost parameters for the hierarchical
/// strategy. Tier membership is fixed; only weights and boost tuning are
/// configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Tier1 = {cost, schedule}
    #[serde(default = "default_tier1_weight")]
    pub tier1_weight: f64,
    /// Tier2 = {workforce, subcontractor, equipment}
    #[serde(default = "default_tier2_weight")]
    pub tier2_weight: f64,
    /// Tier3 = {materials, compliance, environmental}
    #[serde(default = "default_tier3_weight")]
    pub tier3_weight: f64,
    /// The two factors whose joint elevation triggers the dependency boost.
    #[serde(default = "default_dependency_factors")]
    pub dependency_factors: (RiskCategory, RiskCategory),
    /// Both dependency factors must exceed this before any boost applies.
    #[serde(default = "default_secondary_threshold")]
    pub secondary_threshold: f64,
    /// Multiplier on the smaller of the two dependency scores.
    #[serde(default = "default_boost_factor")]
    pub boost_factor: f64,
    /// Hard cap on the boost delta.
    #[serde(default = "default_boost_cap")]
    pub boost_cap: f64,
}

fn default_tier1_weight() -> f64 {
    0.45
}
fn default_tier2_weight() -> f64 {
    0.35
}
fn default_tier3_weight() -> f64 {
    0.20
}
fn default_dependency_factors() -> (RiskCategory, RiskCategory) {
    (RiskCategory::Cost, RiskCategory::Schedule)
}
fn default_secondary_threshold() -> f64 {
    0.6
}
fn default_boost_factor() -> f64 {
    0.25
}
fn default_boost_cap() -> f64 {
    0.10
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            tier1_weight: default_tier1_weight(),
            tier2_weight: default_tier2_weight(),
            tier3_weight: default_tier3_weight(),
            dependency_factors: default_dependency_factors(),
            secondary_threshold: default_secondary_threshold(),
            boost_factor: default_boost_factor(),
            boost_cap: default_boost_cap(),
        }
    }
}

/// History retention and trend/alert tuning for the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Maximum retained outputs per (project, task) key.
    #[serde(default = "default_retention")]
    pub retention: usize,
    /// Number of recent scores a trend is computed over.
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    /// Mean-delta magnitude below which a trend counts as stable.
    #[serde(default = "default_stability_epsilon")]
    pub stability_epsilon: f64,
    /// Score level whose upward crossing fires a HIGH alert.
    #[serde(default = "default_high_threshold")]
    pub high_alert_threshold: f64,
    /// Score level whose upward crossing fires a CRITICAL alert.
    #[serde(default = "default_critical_threshold")]
    pub critical_alert_threshold: f64,
}

fn default_retention() -> usize {
    50
}
fn default_trend_window() -> usize {
    5
}
fn default_stability_epsilon() -> f64 {
    0.02
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
            trend_window: default_trend_window(),
            stability_epsilon: default_stability_epsilon(),
            high_alert_threshold: default_high_threshold(),
            critical_alert_threshold: default_critical_threshold(),
        }
    }
}

/// Read-only configuration for the synthesis engine, supplied once per
/// deployment or per project. The engine validates it up front and never
/// mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeightConfig {
    pub weights: CategoryWeights,
    #[serde(default = "default_interactions")]
    pub interactions: Vec<InteractionPair>,
    pub phase_multipliers: PhaseMultipliers,
    pub severity_thresholds: SeverityThresholds,
    pub hierarchy: HierarchyConfig,
    pub tracking: TrackingConfig,
}

impl Default for RiskWeightConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            interactions: default_interactions(),
            phase_multipliers: PhaseMultipliers::default(),
            severity_thresholds: SeverityThresholds::default(),
            hierarchy: HierarchyConfig::default(),
            tracking: TrackingConfig::default(),
        }
    }
}

impl RiskWeightConfig {
    /// Load and validate a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RiskWeightConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section, collecting all violations before failing so
    /// a bad config surfaces every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        self.weights.collect_violations(&mut violations);
        self.collect_interaction_violations(&mut violations);
        self.collect_phase_violations(&mut violations);
        self.collect_threshold_violations(&mut violations);
        self.collect_hierarchy_violations(&mut violations);
        self.collect_tracking_violations(&mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SynthesisError::invalid_config(violations.join("; ")))
        }
    }

    fn collect_interaction_violations(&self, out: &mut Vec<String>) {
        let mut seen: BTreeSet<(RiskCategory, RiskCategory)> = BTreeSet::new();
        for pair in &self.interactions {
            if pair.a == pair.b {
                out.push(format!(
                    "interaction '{}' pairs {} with itself",
                    pair.name, pair.a
                ));
            }
            // Unordered key, so (a, b) and (b, a) collide
            let key = if pair.a <= pair.b {
                (pair.a, pair.b)
            } else {
                (pair.b, pair.a)
            };
            if !seen.insert(key) {
                out.push(format!(
                    "duplicate interaction pair ({}, {})",
                    key.0, key.1
                ));
            }
            // Written as a negated positive check so NaN also fails it
            if !(pair.multiplier.is_finite() && pair.multiplier > 0.0) {
                out.push(format!(
                    "interaction '{}' multiplier must be positive, got {}",
                    pair.name, pair.multiplier
                ));
            }
            if !(0.0..=1.0).contains(&pair.cap) || pair.cap == 0.0 {
                out.push(format!(
                    "interaction '{}' cap must be in (0.0, 1.0], got {}",
                    pair.name, pair.cap
                ));
            }
            if !(0.0..=1.0).contains(&pair.alert_threshold) || pair.alert_threshold == 0.0 {
                out.push(format!(
                    "interaction '{}' alert_threshold must be in (0.0, 1.0], got {}",
                    pair.name, pair.alert_threshold
                ));
            }
        }
    }

    fn collect_phase_violations(&self, out: &mut Vec<String>) {
        for (name, value) in [
            ("planning", self.phase_multipliers.planning),
            ("execution", self.phase_multipliers.execution),
            ("closing", self.phase_multipliers.closing),
        ] {
            if !(value.is_finite() && value > 0.0) {
                out.push(format!(
                    "phase multiplier for {name} must be positive, got {value}"
                ));
            }
        }
    }

    fn collect_threshold_violations(&self, out: &mut Vec<String>) {
        let t = &self.severity_thresholds;
        let strictly_increasing = t.medium < t.high && t.high < t.critical;
        let covers_unit = t.medium > 0.0 && t.critical < 1.0;
        if !strictly_increasing || !covers_unit {
            out.push(format!(
                "severity thresholds must be strictly increasing within (0,1): \
                 medium={} high={} critical={}",
                t.medium, t.high, t.critical
            ));
        }
    }

    fn collect_hierarchy_violations(&self, out: &mut Vec<String>) {
        let h = &self.hierarchy;
        for (name, weight) in [
            ("tier1_weight", h.tier1_weight),
            ("tier2_weight", h.tier2_weight),
            ("tier3_weight", h.tier3_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                out.push(format!(
                    "hierarchy {name} must be between 0.0 and 1.0, got {weight}"
                ));
            }
        }
        let sum = h.tier1_weight + h.tier2_weight + h.tier3_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            out.push(format!("tier weights must sum to 1.0, but sum to {sum:.3}"));
        }
        if h.dependency_factors.0 == h.dependency_factors.1 {
            out.push("hierarchy dependency factors must be distinct".to_string());
        }
        if !(0.0..=1.0).contains(&h.secondary_threshold) {
            out.push(format!(
                "hierarchy secondary_threshold must be in [0.0, 1.0], got {}",
                h.secondary_threshold
            ));
        }
        for (name, value) in [("boost_factor", h.boost_factor), ("boost_cap", h.boost_cap)] {
            if !(value.is_finite() && value >= 0.0) {
                out.push(format!(
                    "hierarchy {name} must be a non-negative number, got {value}"
                ));
            }
        }
    }

    fn collect_tracking_violations(&self, out: &mut Vec<String>) {
        if self.tracking.retention == 0 {
            out.push("tracking retention must be at least 1".to_string());
        }
        if self.tracking.trend_window < 2 {
            out.push("tracking trend_window must be at least 2".to_string());
        }
        if !(self.tracking.stability_epsilon.is_finite() && self.tracking.stability_epsilon >= 0.0)
        {
            out.push(format!(
                "tracking stability_epsilon must be a non-negative number, got {}",
                self.tracking.stability_epsilon
            ));
        }
        for (name, value) in [
            ("high_alert_threshold", self.tracking.high_alert_threshold),
            (
                "critical_alert_threshold",
                self.tracking.critical_alert_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                out.push(format!(
                    "tracking {name} must be between 0.0 and 1.0, got {value}"
                ));
            }
        }
        if self.tracking.high_alert_threshold >= self.tracking.critical_alert_threshold {
            out.push(format!(
                "high alert threshold ({}) must be below critical alert threshold ({})",
                self.tracking.high_alert_threshold, self.tracking.critical_alert_threshold
            ));
        }
    }
}

/// Commented starter configuration written by `riskmap init`.
pub fn default_config_template() -> anyhow::Result<String> {
    let config = RiskWeightConfig::default();
    let body = toml::to_string_pretty(&config)?;
    Ok(format!(
        "# riskmap configuration\n\
         # Category weights must sum to 1.0 across all eight domains.\n\
         # Severity cut points: score < medium -> LOW, < high -> MEDIUM,\n\
         # < critical -> HIGH, otherwise CRITICAL.\n\n{body}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RiskWeightConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = CategoryWeights::default();
        let sum: f64 = RiskCategory::ALL.iter().map(|c| w.get(*c)).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_weight_sum_rejected() {
        let mut config = RiskWeightConfig::default();
        config.weights.cost = 0.9;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_self_pair_rejected() {
        let mut config = RiskWeightConfig::default();
        config.interactions.push(InteractionPair {
            name: "bad".to_string(),
            a: RiskCategory::Cost,
            b: RiskCategory::Cost,
            multiplier: 0.5,
            cap: 0.1,
            alert_threshold: 0.1,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reversed_duplicate_pair_rejected() {
        let mut config = RiskWeightConfig::default();
        // Default already has (cost, schedule); add the reverse
        config.interactions.push(InteractionPair {
            name: "schedule_cost".to_string(),
            a: RiskCategory::Schedule,
            b: RiskCategory::Cost,
            multiplier: 0.2,
            cap: 0.1,
            alert_threshold: 0.1,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate interaction pair"));
    }

    #[test]
    fn test_non_increasing_thresholds_rejected() {
        let mut config = RiskWeightConfig::default();
        config.severity_thresholds.high = 0.30;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_validation_collects_multiple_violations() {
        let mut config = RiskWeightConfig::default();
        config.weights.cost = 0.9;
        config.severity_thresholds.high = 0.30;
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sum to 1.0"));
        assert!(message.contains("strictly increasing"));
    }

    #[test]
    fn test_out_of_range_tier_weight_rejected() {
        let mut config = RiskWeightConfig::default();
        config.hierarchy.tier1_weight = -0.5;
        config.hierarchy.tier2_weight = 0.75;
        config.hierarchy.tier3_weight = 0.75;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tier1_weight"));
    }

    #[test]
    fn test_nan_tier_weight_rejected() {
        let mut config = RiskWeightConfig::default();
        config.hierarchy.tier2_weight = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tier2_weight"));
    }

    #[test]
    fn test_nan_phase_multiplier_rejected() {
        let mut config = RiskWeightConfig::default();
        config.phase_multipliers.execution = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("execution"));
    }

    #[test]
    fn test_nan_interaction_multiplier_rejected() {
        let mut config = RiskWeightConfig::default();
        config.interactions[0].multiplier = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_boost_parameters_rejected() {
        let mut config = RiskWeightConfig::default();
        config.hierarchy.boost_factor = f64::NAN;
        config.hierarchy.boost_cap = f64::NAN;
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("boost_factor"));
        assert!(message.contains("boost_cap"));
    }

    #[test]
    fn test_template_parses_back() {
        let template = default_config_template().unwrap();
        let parsed: RiskWeightConfig = toml::from_str(&template).unwrap();
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let parsed: RiskWeightConfig = toml::from_str("").unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.interactions.len(), 3);
    }
}
