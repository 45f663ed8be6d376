//! Score persistence
//!
//! The game only ever asks two things of storage: the best score for a mode
//! (at round start) and to append a finished round (at round end). Both go
//! through [`ScoreStore`] so the simulation never touches a database handle.

mod sqlite;

use std::fmt;
use std::path::PathBuf;

use crate::highscores::ScoreTable;
use crate::sim::ModeKind;

pub use sqlite::SqliteStore;

/// Errors raised by a score store
#[derive(Debug)]
pub enum StoreError {
    /// The database file could not be opened or its schema created
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// A statement failed
    Query {
        /// What was being done, for the message
        op: &'static str,
        source: rusqlite::Error,
    },
    /// The store refuses all requests
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Open { path, source } => {
                write!(f, "failed to open score database {}: {}", path.display(), source)
            }
            StoreError::Query { op, source } => write!(f, "{} failed: {}", op, source),
            StoreError::Unavailable => write!(f, "score store unavailable"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Open { source, .. } | StoreError::Query { source, .. } => Some(source),
            StoreError::Unavailable => None,
        }
    }
}

/// Append-only score storage keyed by mode
pub trait ScoreStore {
    /// Highest recorded score for `mode`, 0 when nothing is recorded
    fn best_score(&mut self, mode: ModeKind) -> Result<i64, StoreError>;

    /// Append a finished round; committed before returning
    fn add_score(&mut self, score: i64, mode: ModeKind) -> Result<(), StoreError>;
}

/// In-memory store for tests and throwaway runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: ScoreTable,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails
    pub fn unavailable() -> Self {
        Self {
            table: ScoreTable::new(),
            failing: true,
        }
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }
}

impl ScoreStore for MemoryStore {
    fn best_score(&mut self, mode: ModeKind) -> Result<i64, StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable);
        }
        Ok(self.table.best_for(mode))
    }

    fn add_score(&mut self, score: i64, mode: ModeKind) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable);
        }
        self.table.add(score, mode);
        Ok(())
    }
}
