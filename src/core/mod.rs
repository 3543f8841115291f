use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The eight risk domains assessed by the upstream analyzers.
///
/// Declaration order doubles as the fixed priority order used to break ties
/// in worst-case aggregation: when several factors share the maximum score,
/// the first category in this order wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Cost,
    Schedule,
    Workforce,
    Subcontractor,
    Equipment,
    Materials,
    Compliance,
    Environmental,
}

impl RiskCategory {
    /// All categories in priority order.
    pub const ALL: [RiskCategory; 8] = [
        RiskCategory::Cost,
        RiskCategory::Schedule,
        RiskCategory::Workforce,
        RiskCategory::Subcontractor,
        RiskCategory::Equipment,
        RiskCategory::Materials,
        RiskCategory::Compliance,
        RiskCategory::Environmental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Cost => "cost",
            RiskCategory::Schedule => "schedule",
            RiskCategory::Workforce => "workforce",
            RiskCategory::Subcontractor => "subcontractor",
            RiskCategory::Equipment => "equipment",
            RiskCategory::Materials => "materials",
            RiskCategory::Compliance => "compliance",
            RiskCategory::Environmental => "environmental",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cost" => Ok(RiskCategory::Cost),
            "schedule" => Ok(RiskCategory::Schedule),
            "workforce" => Ok(RiskCategory::Workforce),
            "subcontractor" => Ok(RiskCategory::Subcontractor),
            "equipment" => Ok(RiskCategory::Equipment),
            "materials" => Ok(RiskCategory::Materials),
            "compliance" => Ok(RiskCategory::Compliance),
            "environmental" => Ok(RiskCategory::Environmental),
            other => Err(format!("unrecognized risk category: {other}")),
        }
    }
}

/// Project lifecycle phase; scales the aggregate via the configured
/// phase multiplier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    Planning,
    Execution,
    Closing,
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectPhase::Planning => "planning",
            ProjectPhase::Execution => "execution",
            ProjectPhase::Closing => "closing",
        };
        f.write_str(s)
    }
}

/// How present factor scores are combined into a single number.
///
/// A closed set selected per call; synthesis stays a pure function of
/// `(input, config, strategy)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Weighted mean with weights renormalized over present factors.
    WeightedAverage,
    /// Maximum present score; ties broken by category priority order.
    WorstCase,
    /// `1 - prod(1 - score)`: probability at least one risk materializes.
    Compound,
    /// Three fixed priority tiers with renormalized tier weights.
    Hierarchical,
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AggregationStrategy::WeightedAverage => "weighted_average",
            AggregationStrategy::WorstCase => "worst_case",
            AggregationStrategy::Compound => "compound",
            AggregationStrategy::Hierarchical => "hierarchical",
        };
        f.write_str(s)
    }
}

/// One upstream analyzer's assessment for a single domain.
///
/// Immutable once submitted to a synthesis call. Score and confidence are
/// expected in [0,1]; out-of-range values are rejected, not clamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorInput {
    pub category: RiskCategory,
    pub score: f64,
    pub confidence: f64,
    /// Named reasons behind the score, most significant first.
    #[serde(default)]
    pub drivers: Vec<String>,
}

impl RiskFactorInput {
    pub fn new(category: RiskCategory, score: f64, confidence: f64) -> Self {
        Self {
            category,
            score,
            confidence,
            drivers: Vec::new(),
        }
    }

    pub fn with_drivers(mut self, drivers: Vec<String>) -> Self {
        self.drivers = drivers;
        self
    }
}

/// The full input to one synthesis call.
///
/// Categories absent from `factors` are excluded from synthesis — they are
/// never treated as zero-score entries. A `BTreeMap` keeps iteration order
/// deterministic so identical inputs always produce identical outputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiFactorRiskInput {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub phase: ProjectPhase,
    pub factors: BTreeMap<RiskCategory, RiskFactorInput>,
}

impl MultiFactorRiskInput {
    pub fn new(project_id: impl Into<String>, phase: ProjectPhase) -> Self {
        Self {
            project_id: project_id.into(),
            task_id: None,
            phase,
            factors: BTreeMap::new(),
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn add_factor(mut self, factor: RiskFactorInput) -> Self {
        self.factors.insert(factor.category, factor);
        self
    }
}

/// Ordinal severity band for the final score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// The assembled project-level assessment. Produced fresh per call and
/// never mutated afterward; `generated_at` is the only field not determined
/// by the inputs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthesizedRiskOutput {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub strategy: AggregationStrategy,
    pub phase: ProjectPhase,
    pub overall_score: f64,
    pub severity: Severity,
    pub confidence: f64,
    /// Share of the result attributable to each present factor; sums to 1.0.
    pub contributions: BTreeMap<RiskCategory, f64>,
    pub primary_driver: RiskCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_driver: Option<RiskCategory>,
    /// Total interaction uplift applied before phase adjustment.
    pub interaction_uplift: f64,
    pub narrative_explanation: String,
    pub mitigation_suggestions: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// What tripped an alert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertCondition {
    /// Overall score crossed a severity threshold from below.
    ScoreThreshold { severity: Severity, threshold: f64 },
    /// A single interaction term crossed its configured threshold.
    InteractionThreshold { pair: String, threshold: f64 },
}

/// Emitted only on a threshold *crossing*, never on every call while the
/// value stays above threshold.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskAlert {
    pub severity: Severity,
    pub condition: AlertCondition,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
