//! Award counting engines.
//!
//! Each engine is a fold over the time-ordered stream of contacts with
//! matched members. Engines share nothing: every credited-key set lives in
//! the engine's own fold state.

use chrono::NaiveDate;

/// Province and territory coverage.
pub mod maple;
/// Out-of-country contacts and countries.
pub mod dx;
/// Prefix scoring.
pub mod pfx;
/// Long-conversation minutes.
pub mod rag_chew;
/// Membership-rank awards.
pub mod tier;
/// Engine trait, credit keys and the credited-key ledger.
pub mod traits;
/// Key-device pools.
pub mod triple_key;
/// Continent coverage.
pub mod wac;

pub(crate) fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}
