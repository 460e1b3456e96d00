//! SQLite-backed profile and slip-up storage.
//!
//! Provides persistent storage for:
//! - Profiles (journey start date and timezone)
//! - The append-only slip-up ledger

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::calendar::CalendarDate;
use crate::error::{DatabaseError, Result};
use crate::profile::{Profile, ProfileStore};
use crate::slipup::{NewSlipUp, SlipUpRecord, SlipUpStore};

use super::{data_dir, migrations};

/// SQLite database for profiles and slip-ups.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/sobertrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("sobertrack.db");
        Self::open_at(path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "database opened");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn parse_date(table: &str, raw: &str) -> Result<CalendarDate> {
    raw.parse::<CalendarDate>().map_err(|e| {
        DatabaseError::CorruptRow {
            table: table.to_string(),
            message: format!("{e}"),
        }
        .into()
    })
}

fn parse_timestamp(table: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            DatabaseError::CorruptRow {
                table: table.to_string(),
                message: format!("bad timestamp '{raw}': {e}"),
            }
            .into()
        })
}

impl SlipUpStore for Database {
    fn append_slip_up(&self, user_id: &str, slip_up: &NewSlipUp) -> Result<SlipUpRecord> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO slip_ups (user_id, slip_up_date, recovery_restart_date, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                slip_up.slip_up_date.to_string(),
                slip_up.recovery_restart_date.to_string(),
                slip_up.notes,
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(SlipUpRecord {
            id: self.conn.last_insert_rowid(),
            user_id: user_id.to_string(),
            slip_up_date: slip_up.slip_up_date,
            recovery_restart_date: slip_up.recovery_restart_date,
            notes: slip_up.notes.clone(),
            created_at,
        })
    }

    fn list_slip_ups(&self, user_id: &str) -> Result<Vec<SlipUpRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slip_up_date, recovery_restart_date, notes, created_at
             FROM slip_ups
             WHERE user_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, slip, restart, notes, created_at) = row?;
            records.push(SlipUpRecord {
                id,
                user_id: user_id.to_string(),
                slip_up_date: parse_date("slip_ups", &slip)?,
                recovery_restart_date: parse_date("slip_ups", &restart)?,
                notes,
                created_at: parse_timestamp("slip_ups", &created_at)?,
            });
        }
        Ok(records)
    }
}

impl ProfileStore for Database {
    fn load_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let row = self
            .conn
            .query_row(
                "SELECT sobriety_date, timezone, updated_at FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((sobriety_date, timezone, updated_at)) = row else {
            return Ok(None);
        };
        Ok(Some(Profile {
            user_id: user_id.to_string(),
            sobriety_date: parse_date("profiles", &sobriety_date)?,
            timezone,
            updated_at: parse_timestamp("profiles", &updated_at)?,
        }))
    }

    fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles (user_id, sobriety_date, timezone, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                sobriety_date = excluded.sobriety_date,
                timezone = excluded.timezone,
                updated_at = excluded.updated_at",
            params![
                profile.user_id,
                profile.sobriety_date.to_string(),
                profile.timezone,
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
