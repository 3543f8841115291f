// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod synthesis;
pub mod tracking;

// Re-export commonly used types
pub use crate::config::{
    CategoryWeights, InteractionPair, PhaseMultipliers, RiskWeightConfig, SeverityThresholds,
    TrackingConfig,
};
pub use crate::core::{
    AggregationStrategy, AlertCondition, MultiFactorRiskInput, ProjectPhase, RiskAlert,
    RiskCategory, RiskFactorInput, Severity, SynthesizedRiskOutput,
};
pub use crate::errors::{Result, SynthesisError};
pub use crate::formatting::DashboardProjection;
pub use crate::synthesis::{synthesize, synthesize_with_interactions};
pub use crate::tracking::{
    RiskTracker, SynthesisHistory, TrackKey, TrackedSynthesis, Trend, TrendDirection,
};
