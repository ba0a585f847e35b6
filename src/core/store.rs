//! # Quote Store
//!
//! Durable, append-only persistence of accepted quotes. The acquisition loop
//! only sees the [`QuoteStore`] trait; [`SqliteStore`] keeps them in a
//! `quotes` table:
//!
//! ```text
//! quotes
//! ├── id          INTEGER PRIMARY KEY AUTOINCREMENT
//! ├── quote       TEXT NOT NULL
//! └── created_at  TEXT NOT NULL   (RFC 3339)
//! ```

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use rusqlite::{Connection, params};
use thiserror::Error;

/// A quote the user kept, stamped with when they kept it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedQuote {
    pub text: String,
    pub accepted_at: DateTime<Utc>,
}

impl AcceptedQuote {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accepted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub trait QuoteStore {
    /// Persists the quote and returns its generated identifier.
    fn append(&mut self, quote: &AcceptedQuote) -> Result<i64, StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened quote database at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS quotes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                quote TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok(n)
    }

    /// All stored quotes, oldest first.
    pub fn quotes(&self) -> Result<Vec<(i64, String)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, quote FROM quotes ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

impl QuoteStore for SqliteStore {
    fn append(&mut self, quote: &AcceptedQuote) -> Result<i64, StoreError> {
        let created_at = quote
            .accepted_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "INSERT INTO quotes (quote, created_at) VALUES (?1, ?2)",
            params![quote.text, created_at],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Stored quote {} at {}", id, created_at);
        Ok(id)
    }
}
