//! Score and combo bookkeeping for one round

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreLedger {
    score: i64,
    best: i64,
    misses: u32,
    /// Non-hazard cuts since the last critical evaluation
    critical: u32,
    /// Double-score power-up
    double: bool,
}

impl ScoreLedger {
    /// Fresh ledger for a round, seeded with the persisted best
    pub fn new(best: i64) -> Self {
        Self {
            best: best.max(0),
            ..Self::default()
        }
    }

    /// Apply a score change, doubled while double-score is active.
    /// Returns the amount actually applied.
    pub fn add(&mut self, delta: i64) -> i64 {
        let applied = if self.double { delta * 2 } else { delta };
        self.score += applied;
        self.best = self.best.max(self.score);
        applied
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Best score for the mode; never decreases
    pub fn best(&self) -> i64 {
        self.best
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Returns the miss count after recording
    pub fn record_miss(&mut self) -> u32 {
        self.misses += 1;
        self.misses
    }

    /// Count a cut toward the critical combo (hazards do not count)
    pub fn record_cut(&mut self, is_hazard: bool) {
        if !is_hazard {
            self.critical += 1;
        }
    }

    pub fn critical(&self) -> u32 {
        self.critical
    }

    pub fn reset_critical(&mut self) {
        self.critical = 0;
    }

    /// Close the critical window: bonus of 2 per cut when more than
    /// `threshold` cuts landed. The counter always restarts at zero.
    pub fn evaluate_critical(&mut self, threshold: u32) -> Option<i64> {
        let count = std::mem::take(&mut self.critical);
        (count > threshold).then(|| 2 * count as i64)
    }

    pub fn set_double(&mut self, active: bool) {
        self.double = active;
    }
}
