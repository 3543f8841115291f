//! Bounded per-key synthesis history.

use crate::core::SynthesizedRiskOutput;
use im::Vector;

/// Append-only, bounded-length ordered sequence of synthesis outputs for
/// one `(project_id, task_id)` key. Oldest entries are evicted once the
/// retention limit is reached.
#[derive(Clone, Debug)]
pub struct SynthesisHistory {
    entries: Vector<SynthesizedRiskOutput>,
    retention: usize,
}

impl SynthesisHistory {
    pub fn new(retention: usize) -> Self {
        Self {
            entries: Vector::new(),
            retention: retention.max(1),
        }
    }

    pub fn push(&mut self, output: SynthesizedRiskOutput) {
        self.entries.push_back(output);
        while self.entries.len() > self.retention {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&SynthesizedRiskOutput> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent `window` overall scores, oldest first.
    pub fn recent_scores(&self, window: usize) -> Vec<f64> {
        let skip = self.entries.len().saturating_sub(window);
        self.entries
            .iter()
            .skip(skip)
            .map(|o| o.overall_score)
            .collect()
    }

    /// Cheap snapshot of the full retained sequence.
    pub fn snapshot(&self) -> Vector<SynthesizedRiskOutput> {
        self.entries.clone()
    }
}
