//! Database schema migrations for sobertrack.
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

/// Returns 0 if no version is set (fresh database).
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

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: profiles and the append-only slip-up ledger.
///
/// Dates are stored as `YYYY-MM-DD` TEXT with no time component.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS profiles (
            user_id       TEXT PRIMARY KEY,
            sobriety_date TEXT NOT NULL,
            timezone      TEXT,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS slip_ups (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id               TEXT NOT NULL,
            slip_up_date          TEXT NOT NULL,
            recovery_restart_date TEXT NOT NULL,
            notes                 TEXT,
            created_at            TEXT NOT NULL,
            CHECK (recovery_restart_date >= slip_up_date)
        );

        CREATE INDEX IF NOT EXISTS idx_slip_ups_user_id ON slip_ups(user_id);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: the ledger is append-only, so reject updates and deletes
/// at the storage layer as well.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS slip_ups_no_update
         BEFORE UPDATE ON slip_ups
         BEGIN
             SELECT RAISE(ABORT, 'slip_ups is append-only');
         END;

         CREATE TRIGGER IF NOT EXISTS slip_ups_no_delete
         BEFORE DELETE ON slip_ups
         BEGIN
             SELECT RAISE(ABORT, 'slip_ups is append-only');
         END;",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()
}
