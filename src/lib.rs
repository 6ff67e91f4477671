//! Award-eligibility engine for a CW club's contact logs.
//!
//! Contacts from an operator's log are resolved against the membership
//! roster and folded through one engine per award family. The result is an
//! [`report::AwardReport`] with per-award progress and data-quality notes.
//!
//! # Examples
//!
//! ```
//! use awardlog::{
//!     compute::compute,
//!     config::EngineConfig,
//!     contact::ContactDraft,
//!     roster::{Member, Roster},
//!     types::Tier,
//! };
//!
//! let config = EngineConfig::default();
//! let roster = Roster::new(
//!     vec![Member {
//!         number: 660,
//!         call: "K3WWP".to_string(),
//!         tier: Tier::Senator,
//!         join_date: None,
//!         state: Some("PA".to_string()),
//!         country: None,
//!     }],
//!     &config.normalizer(),
//! );
//! let drafts = vec![ContactDraft {
//!     call: "K3WWP".to_string(),
//!     qso_date: "20200105".to_string(),
//!     time_on: Some("1200".to_string()),
//!     band: Some("40M".to_string()),
//!     mode: Some("CW".to_string()),
//!     member_token: Some("660S".to_string()),
//!     ..ContactDraft::default()
//! }];
//!
//! let report = compute(&drafts, &roster, &config).expect("valid config");
//! let centurion = report.find("Centurion", None).expect("centurion entry");
//! assert_eq!(centurion.value, 1);
//! ```
//!
//! Long-lived use goes through [`runtime::handle::spawn_award_service`],
//! which owns a roster and a contact list and runs computations on the
//! blocking pool.
#![deny(missing_docs)]

/// ADIF log parsing into contact drafts.
pub mod adif;
/// Callsign normalization and prefix extraction.
pub mod callsign;
/// Top-level computation driver.
pub mod compute;
/// Engine configuration and its errors.
pub mod config;
/// Contact drafts and validated contacts.
pub mod contact;
/// Award engines.
pub mod engine;
/// Shared eligibility predicates.
pub mod filter;
/// Prefix, country, continent and province tables.
pub mod geo;
/// Award level ladders.
pub mod ladder;
/// Tracing subscriber setup.
pub mod logging;
/// Roster cache abstraction and SQLite implementation.
pub mod persist;
/// Report model and aggregation.
pub mod report;
/// Rank resolution at contact time.
pub mod resolve;
/// Membership roster snapshot.
pub mod roster;
/// Async award service handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
