//! Database schema migrations for ritualog.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(tx: &Connection, version: i32) -> SqliteResult<()> {
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: daily rituals, habits, mastery, protocols, consumption.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS daily_entries (
            id                TEXT PRIMARY KEY,
            user_id           TEXT NOT NULL,
            date              TEXT NOT NULL,
            morning_completed INTEGER NOT NULL DEFAULT 0,
            evening_completed INTEGER NOT NULL DEFAULT 0,
            created_at        TEXT NOT NULL,
            UNIQUE (user_id, date)
        );

        CREATE TABLE IF NOT EXISTS morning_logs (
            entry_id               TEXT PRIMARY KEY REFERENCES daily_entries(id) ON DELETE CASCADE,
            wake_time              TEXT,
            sunlight_minutes       INTEGER,
            caffeine_delayed_90min INTEGER,
            cold_exposure          INTEGER,
            meditation_minutes     INTEGER,
            exercise_done          INTEGER,
            intention              TEXT,
            identity_affirmation   TEXT,
            creative_observation   TEXT,
            top3                   TEXT
        );

        CREATE TABLE IF NOT EXISTS evening_logs (
            entry_id          TEXT PRIMARY KEY REFERENCES daily_entries(id) ON DELETE CASCADE,
            wins              TEXT,
            owned_failure     TEXT,
            emotional_pattern TEXT,
            shadow_insight    TEXT,
            creative_capture  TEXT,
            tomorrow_focus    TEXT,
            sleep_target_time TEXT
        );

        CREATE TABLE IF NOT EXISTS habits (
            id                 TEXT PRIMARY KEY,
            user_id            TEXT NOT NULL,
            name               TEXT NOT NULL,
            identity_statement TEXT,
            cue                TEXT,
            craving            TEXT,
            response           TEXT,
            reward             TEXT,
            two_minute_version TEXT,
            frequency          TEXT NOT NULL DEFAULT 'daily',
            created_at         TEXT NOT NULL,
            archived_at        TEXT
        );

        CREATE TABLE IF NOT EXISTS habit_completions (
            id           TEXT PRIMARY KEY,
            habit_id     TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            user_id      TEXT NOT NULL,
            date         TEXT NOT NULL,
            completed    INTEGER NOT NULL,
            satisfaction INTEGER,
            UNIQUE (habit_id, date)
        );

        CREATE TABLE IF NOT EXISTS life_tasks (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            statement  TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS skills (
            id                   TEXT PRIMARY KEY,
            user_id              TEXT NOT NULL,
            name                 TEXT NOT NULL,
            life_task_connection TEXT,
            phase                TEXT,
            created_at           TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS mastery_sessions (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL,
            skill_id     TEXT NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
            date         TEXT NOT NULL,
            minutes      INTEGER NOT NULL,
            breakthrough TEXT,
            obstacle     TEXT,
            mentor_notes TEXT,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS identity_statements (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            content    TEXT NOT NULL,
            is_active  INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sleep_logs (
            id        TEXT PRIMARY KEY,
            user_id   TEXT NOT NULL,
            date      TEXT NOT NULL,
            bedtime   TEXT,
            wake_time TEXT,
            quality   INTEGER,
            notes     TEXT,
            UNIQUE (user_id, date)
        );

        CREATE TABLE IF NOT EXISTS workouts (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL,
            date         TEXT NOT NULL,
            workout_type TEXT NOT NULL,
            adaptation   TEXT,
            duration_min INTEGER,
            intensity    INTEGER,
            notes        TEXT,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS consumption_logs (
            id                   TEXT PRIMARY KEY,
            user_id              TEXT NOT NULL,
            date                 TEXT NOT NULL,
            phone_minutes        INTEGER,
            social_media_minutes INTEGER,
            main_apps            TEXT,
            content_quality      INTEGER,
            mental_impact        TEXT,
            what_triggered       TEXT,
            intention            TEXT,
            UNIQUE (user_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_habit_completions_user_date ON habit_completions(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_mastery_sessions_user_date ON mastery_sessions(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, date);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: creative capture, reflections and weekly reviews.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS creative_entries (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL,
            date         TEXT NOT NULL,
            prompt       TEXT,
            content      TEXT,
            medium       TEXT,
            observations TEXT,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS creative_projects (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            title       TEXT NOT NULL,
            description TEXT,
            status      TEXT NOT NULL DEFAULT 'active',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS quick_ideas (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            content    TEXT NOT NULL,
            project_id TEXT REFERENCES creative_projects(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reflections (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            date        TEXT NOT NULL,
            prompt_type TEXT,
            content     TEXT,
            law_ref     TEXT,
            pattern_tag TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS weekly_reviews (
            id                 TEXT PRIMARY KEY,
            user_id            TEXT NOT NULL,
            week_start         TEXT NOT NULL,
            wins               TEXT,
            patterns           TEXT,
            protocol_score     INTEGER,
            habit_score        INTEGER,
            mastery_hours      REAL,
            creative_output    TEXT,
            strategic_lesson   TEXT,
            identity_evolution TEXT,
            UNIQUE (user_id, week_start)
        );

        CREATE INDEX IF NOT EXISTS idx_creative_entries_user_date ON creative_entries(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_reflections_user_date ON reflections(user_id, date);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'weekly_reviews'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn v1_database_upgrades_to_v2() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }
}
