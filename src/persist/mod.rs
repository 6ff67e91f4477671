//! Roster persistence.
//!
//! The engine itself never touches storage; a [`RosterSource`] hands it a
//! snapshot to compute against.

pub mod sqlite;

use thiserror::Error;

use crate::{
    callsign::Normalizer,
    roster::{Member, Roster},
};

/// Storage failures.
#[derive(Debug, Error)]
pub enum PersistError {
    /// SQLite error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Stored value that does not decode.
    #[error("corrupt roster cache: {0}")]
    Message(String),
}

/// Result alias for storage operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Anything that can produce a roster snapshot.
pub trait RosterSource: Send {
    /// All stored members, ordered by member number.
    fn load_members(&self) -> PersistResult<Vec<Member>>;

    /// Replaces the stored roster with `members`. Returns the number written.
    fn store_members(&mut self, members: &[Member]) -> PersistResult<usize>;

    /// Indexed roster built with `normalizer`.
    fn load_roster(&self, normalizer: &Normalizer) -> PersistResult<Roster> {
        Ok(Roster::new(self.load_members()?, normalizer))
    }
}
