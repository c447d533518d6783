//! SQLite-backed journal storage.
//!
//! One [`Database`] wraps one connection. The per-feature query methods live
//! in sibling modules as further `impl Database` blocks; this module owns
//! opening, migrating, the change-event buffer and shared row helpers.

use std::cell::RefCell;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::data_dir;
use super::migrations;
use crate::error::{CoreError, DatabaseError, Result};
use crate::events::Event;
use crate::records::UserId;

/// SQLite database for journal records.
pub struct Database {
    conn: Connection,
    events: RefCell<Vec<Event>>,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/ritualog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("ritualog.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened journal database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn,
            events: RefCell::new(Vec::new()),
        })
    }

    /// Record a change so front ends can refresh the affected views.
    pub(crate) fn emit(&self, event: Event) {
        tracing::debug!(?event, views = ?event.invalidates(), "journal changed");
        self.events.borrow_mut().push(event);
    }

    /// Take every event recorded since the last drain, oldest first.
    pub fn drain_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Fail with `NotFound` unless `table` holds row `id` owned by `user`.
    pub(crate) fn ensure_owned(
        &self,
        table: &'static str,
        entity: &'static str,
        user: &UserId,
        id: &str,
    ) -> Result<()> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {table} WHERE id = ?1 AND user_id = ?2"),
                params![id, user],
                |_| Ok(()),
            )
            .optional()?;
        found.ok_or_else(|| CoreError::NotFound {
            entity,
            id: id.to_string(),
        })
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Parse a stored RFC 3339 timestamp, falling back to the epoch.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(raw, error = %e, "unreadable timestamp in journal database");
            DateTime::<Utc>::UNIX_EPOCH
        })
}

pub(crate) fn parse_optional_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref().map(parse_timestamp)
}
