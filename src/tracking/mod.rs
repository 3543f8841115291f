//! Stateful alert and trend tracking.
//!
//! `RiskTracker` is the only component with shared mutable state. Keys are
//! fully independent of one another; calls for the *same* key serialize
//! through a per-key mutex, because history append, trend read and
//! crossing detection form a read-modify-write sequence that would corrupt
//! ordering or double-fire alerts under interleaving.

pub mod alerts;
pub mod history;
pub mod trend;

pub use alerts::AlertState;
pub use history::SynthesisHistory;
pub use trend::{Trend, TrendDirection};

use crate::config::RiskWeightConfig;
use crate::core::{AggregationStrategy, MultiFactorRiskInput, RiskAlert, SynthesizedRiskOutput};
use crate::errors::Result;
use crate::synthesis;
use dashmap::DashMap;
use im::Vector;
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;

/// Identifies one tracked history stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackKey {
    pub project_id: String,
    pub task_id: Option<String>,
}

impl TrackKey {
    fn from_input(input: &MultiFactorRiskInput) -> Self {
        Self {
            project_id: input.project_id.clone(),
            task_id: input.task_id.clone(),
        }
    }
}

struct KeyState {
    history: SynthesisHistory,
    alerts: AlertState,
}

/// A synthesis result together with the tracking outcome for its key.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TrackedSynthesis {
    pub output: SynthesizedRiskOutput,
    pub trend: Trend,
    pub alerts: Vec<RiskAlert>,
}

/// Per-key history store plus alert latching.
pub struct RiskTracker {
    config: RiskWeightConfig,
    states: DashMap<TrackKey, Arc<Mutex<KeyState>>>,
}

impl RiskTracker {
    /// Build a tracker over a validated configuration.
    pub fn new(config: RiskWeightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            states: DashMap::new(),
        })
    }

    pub fn config(&self) -> &RiskWeightConfig {
        &self.config
    }

    /// Synthesize `input` and fold the result into this key's history,
    /// returning the output together with its trend and any newly fired
    /// alerts.
    pub fn record(
        &self,
        input: &MultiFactorRiskInput,
        strategy: AggregationStrategy,
    ) -> Result<TrackedSynthesis> {
        // The pure computation happens outside any lock; the interaction
        // terms come back alongside the output so alert evaluation sees
        // exactly the terms that produced the uplift
        let (output, effects) =
            synthesis::synthesize_with_interactions(input, &self.config, strategy)?;

        let key = TrackKey::from_input(input);
        // Clone the Arc out of the map so the shard lock is released before
        // the per-key critical section; unrelated keys stay concurrent
        let cell = self
            .states
            .entry(key)
            .or_insert_with(|| {
                Arc::new(Mutex::new(KeyState {
                    history: SynthesisHistory::new(self.config.tracking.retention),
                    alerts: AlertState::default(),
                }))
            })
            .clone();

        let mut state = cell.lock();
        let alerts = alerts::evaluate_alerts(
            &mut state.alerts,
            &output,
            &effects.terms,
            &self.config.tracking,
        );
        state.history.push(output.clone());
        let scores = state.history.recent_scores(self.config.tracking.trend_window);
        let trend = trend::analyze_trend(&scores, self.config.tracking.stability_epsilon);
        drop(state);

        for alert in &alerts {
            info!("alert fired: {}", alert.message);
        }

        Ok(TrackedSynthesis {
            output,
            trend,
            alerts,
        })
    }

    /// Snapshot of the retained history for a key, oldest first.
    pub fn history(&self, key: &TrackKey) -> Option<Vector<SynthesizedRiskOutput>> {
        let cell = self.states.get(key).map(|entry| Arc::clone(&entry))?;
        let snapshot = cell.lock().history.snapshot();
        Some(snapshot)
    }

    /// Number of keys with recorded history.
    pub fn tracked_keys(&self) -> usize {
        self.states.len()
    }
}
