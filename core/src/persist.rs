//! SQLite persistence layer.
//!
//! RULE: Only persist.rs talks to the database.
//! The engine calls store methods — it never executes SQL directly.
//!
//! Saved projects are a key/value table holding serialized documents;
//! the engine writes through under `SAVE_KEY` after every commit and
//! reads it back once at startup.

use crate::error::PlanResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Key the engine saves and restores the working project under.
pub const SAVE_KEY: &str = "endaxis.project";

pub struct SavedProjectStore {
    conn: Connection,
}

impl SavedProjectStore {
    /// Open (or create) the project database at `path`.
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PlanResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> PlanResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS saved_project (
                 key        TEXT PRIMARY KEY,
                 doc        TEXT NOT NULL,
                 updated_at INTEGER NOT NULL
             );",
        )?;
        Ok(())
    }

    /// Upsert a serialized document under `key`.
    pub fn save(&self, key: &str, doc: &str) -> PlanResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO saved_project (key, doc, updated_at) VALUES (?1, ?2, ?3)",
            params![key, doc, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    pub fn load(&self, key: &str) -> PlanResult<Option<String>> {
        let doc = self
            .conn
            .query_row(
                "SELECT doc FROM saved_project WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(doc)
    }

    pub fn delete(&self, key: &str) -> PlanResult<()> {
        self.conn
            .execute("DELETE FROM saved_project WHERE key = ?1", params![key])?;
        Ok(())
    }
}
