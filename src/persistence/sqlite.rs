//! SQLite score store
//!
//! One table, `scores(score, mode)`, appended to at the end of each round.

use std::fs;
use std::path::Path;

use rusqlite::{Connection, params};

use super::{ScoreStore, StoreError};
use crate::sim::ModeKind;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS scores (
    score INTEGER NOT NULL,
    mode  INTEGER NOT NULL
);";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(dir) {
                log::warn!("could not create {}: {}", dir.display(), e);
            }
        }
        let open_err = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;
        log::info!("score database at {}", path.display());
        Ok(Self { conn })
    }

    /// Database that lives only as long as the store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let open_err = |source| StoreError::Open {
            path: ":memory:".into(),
            source,
        };
        let conn = Connection::open_in_memory().map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;
        Ok(Self { conn })
    }

    /// Number of recorded rounds across all modes
    pub fn count(&self) -> Result<u64, StoreError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .map_err(|source| StoreError::Query {
                op: "count scores",
                source,
            })
    }
}

impl ScoreStore for SqliteStore {
    fn best_score(&mut self, mode: ModeKind) -> Result<i64, StoreError> {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(score), 0) FROM scores WHERE mode = ?1",
                params![mode.id()],
                |row| row.get(0),
            )
            .map_err(|source| StoreError::Query {
                op: "read best score",
                source,
            })
    }

    fn add_score(&mut self, score: i64, mode: ModeKind) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO scores (score, mode) VALUES (?1, ?2)",
                params![score, mode.id()],
            )
            .map_err(|source| StoreError::Query {
                op: "insert score",
                source,
            })?;
        log::debug!("saved {} for {}", score, mode.name());
        Ok(())
    }
}
