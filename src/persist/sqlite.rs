//! SQLite-backed roster cache.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::{
    roster::Member,
    types::{MemberNumber, Tier},
};

use super::{PersistError, PersistResult, RosterSource};

const LAST_UPDATE_KEY: &str = "last_update";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite implementation of [`crate::persist::RosterSource`].
pub struct SqliteRosterCache {
    conn: Connection,
}

impl SqliteRosterCache {
    /// Opens or creates a roster cache at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory cache.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Replaces every stored member in one transaction and stamps the update
    /// time.
    pub fn store_members(&mut self, members: &[Member]) -> PersistResult<usize> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM members", [])?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO members(number, call, suffix, join_date, state, country, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for member in members {
                stmt.execute(params![
                    member.number,
                    member.call.trim().to_ascii_uppercase(),
                    member.tier.suffix().map(String::from),
                    member.join_date.map(|d| d.format(DATE_FORMAT).to_string()),
                    member.state,
                    member.country,
                    now,
                ])?;
                written += 1;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO roster_metadata(key, value) VALUES (?1, ?2)",
            params![LAST_UPDATE_KEY, now],
        )?;
        tx.commit()?;
        info!(members = written, "roster cache replaced");
        Ok(written)
    }

    /// Loads all members ordered by number.
    pub fn load_members(&self) -> PersistResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT number, call, suffix, join_date, state, country FROM members ORDER BY number ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let number: MemberNumber = row.get(0)?;
            let suffix: Option<String> = row.get(2)?;
            let join_date: Option<String> = row.get(3)?;
            let join_date = join_date
                .map(|text| {
                    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|err| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(err),
                        )
                    })
                })
                .transpose()?;
            Ok(Member {
                number,
                call: row.get(1)?,
                tier: suffix
                    .and_then(|s| s.chars().next())
                    .and_then(Tier::from_suffix)
                    .unwrap_or_default(),
                join_date,
                state: row.get(4)?,
                country: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// When the stored roster was last replaced.
    pub fn last_update(&self) -> PersistResult<Option<DateTime<Utc>>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT value FROM roster_metadata WHERE key = ?1",
                params![LAST_UPDATE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        let Some(text) = value.flatten() else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&text)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|err| PersistError::Message(format!("bad {LAST_UPDATE_KEY} value {text:?}: {err}")))
    }

    /// Number of stored members.
    pub fn member_count(&self) -> PersistResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl RosterSource for SqliteRosterCache {
    fn load_members(&self) -> PersistResult<Vec<Member>> {
        SqliteRosterCache::load_members(self)
    }

    fn store_members(&mut self, members: &[Member]) -> PersistResult<usize> {
        SqliteRosterCache::store_members(self, members)
    }
}
