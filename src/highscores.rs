//! Score history
//!
//! Every finished round appends one row. Nothing is ever overwritten; the
//! best score for a mode is the maximum over its rows.

use serde::{Deserialize, Serialize};

use crate::sim::ModeKind;

/// A single finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Final score (may be negative)
    pub score: i64,
    /// Mode id, see [`ModeKind::id`]
    pub mode: i64,
}

/// Append-only score table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub rows: Vec<ScoreRow>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add(&mut self, score: i64, mode: ModeKind) {
        self.rows.push(ScoreRow {
            score,
            mode: mode.id(),
        });
    }

    /// Best score recorded for a mode, 0 when there is none
    pub fn best_for(&self, mode: ModeKind) -> i64 {
        self.rows
            .iter()
            .filter(|r| r.mode == mode.id())
            .map(|r| r.score)
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_is_per_mode() {
        let mut table = ScoreTable::new();
        assert_eq!(table.best_for(ModeKind::Classic), 0);
        table.add(30, ModeKind::Classic);
        table.add(90, ModeKind::Arcade);
        table.add(45, ModeKind::Classic);
        table.add(-10, ModeKind::Classic);
        assert_eq!(table.best_for(ModeKind::Classic), 45);
        assert_eq!(table.best_for(ModeKind::Arcade), 90);
        assert_eq!(table.len(), 4);
    }
}
