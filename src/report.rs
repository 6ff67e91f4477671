//! Award progress records, run diagnostics and the aggregated report.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{
    contact::SkipReason,
    engine::traits::CreditKey,
    ladder::{Ladder, Rung},
    resolve::Confidence,
    types::{ContactSeq, MemberNumber, Tier},
};

/// What an award's value counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Unique members.
    Members,
    /// Unique contacts.
    Contacts,
    /// Unique countries.
    Countries,
    /// Unique provinces or territories.
    Provinces,
    /// Bands meeting a per-band requirement.
    Bands,
    /// Prefix score.
    Points,
    /// Accumulated minutes.
    Minutes,
    /// Unique continents.
    Continents,
}

impl Unit {
    fn noun(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Contacts => "contacts",
            Self::Countries => "countries",
            Self::Provinces => "provinces",
            Self::Bands => "bands",
            Self::Points => "points",
            Self::Minutes => "minutes",
            Self::Continents => "continents",
        }
    }
}

/// One credited entity, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credit {
    /// What was credited.
    pub key: CreditKey,
    /// Contact that earned it.
    pub seq: ContactSeq,
    /// When that contact started.
    pub at: NaiveDateTime,
    /// Normalized counterparty call.
    pub call: String,
    /// Confidence of the rank used, where a rank mattered.
    pub confidence: Confidence,
}

/// Progress on one award or award variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardProgress {
    /// Award family name, e.g. `Tribune`.
    pub award: String,
    /// Variant, e.g. `QRP`, `40M` or `Orange 20M`.
    pub variant: Option<String>,
    /// What `value` counts.
    pub unit: Unit,
    /// Raw count or score.
    pub value: u64,
    /// Threshold of the next rung, or of the top rung once reached.
    pub target: u64,
    /// Highest rung met.
    pub achieved: Option<Rung>,
    /// Next rung.
    pub next: Option<Rung>,
    /// Amount still needed for `next`.
    pub remaining: u64,
    /// Counting has not started because a prerequisite is unmet.
    pub locked: bool,
    /// Entities credited, in crediting order.
    pub credited: Vec<Credit>,
    /// Counts keyed by band, key type or rank.
    pub breakdown: BTreeMap<String, u64>,
    /// Human-readable status, filled in by [`aggregate`].
    pub status: String,
}

impl AwardProgress {
    /// Places `value` on `ladder`.
    pub fn on_ladder(
        award: impl Into<String>,
        variant: Option<String>,
        unit: Unit,
        value: u64,
        ladder: &Ladder,
    ) -> Self {
        let status = ladder.evaluate(value);
        let target = status
            .next
            .as_ref()
            .or(status.achieved.as_ref())
            .map_or(0, |r| r.threshold);
        Self {
            award: award.into(),
            variant,
            unit,
            value,
            target,
            achieved: status.achieved,
            next: status.next,
            remaining: status.remaining,
            locked: false,
            credited: Vec::new(),
            breakdown: BTreeMap::new(),
            status: String::new(),
        }
    }

    /// Attaches the audit list.
    pub fn with_credits(mut self, credited: Vec<Credit>) -> Self {
        self.credited = credited;
        self
    }

    /// Attaches a breakdown.
    pub fn with_breakdown(mut self, breakdown: BTreeMap<String, u64>) -> Self {
        self.breakdown = breakdown;
        self
    }

    /// True when at least the first rung is met.
    pub fn is_achieved(&self) -> bool {
        self.achieved.is_some()
    }

    /// Credited member numbers, for member-keyed awards.
    pub fn credited_members(&self) -> Vec<MemberNumber> {
        self.credited
            .iter()
            .filter_map(|c| match c.key {
                CreditKey::Member(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn describe(&self) -> String {
        let noun = self.unit.noun();
        if self.locked {
            let target = self.next.as_ref().map_or(0, |r| r.threshold);
            return format!("locked until prerequisite is met ({}/{} {noun})", self.value, target);
        }
        match (&self.achieved, &self.next) {
            (Some(got), Some(next)) => format!(
                "{} achieved; {} more {noun} for {}",
                got.label, self.remaining, next.label
            ),
            (Some(got), None) => format!("{} achieved (highest level)", got.label),
            (None, Some(next)) => format!("{}/{} {noun} toward {}", self.value, next.threshold, next.label),
            (None, None) => format!("{} {noun}", self.value),
        }
    }
}

/// Data-quality notes collected during a run. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Draft rejected at ingestion.
    SkippedContact {
        /// Position in the input.
        index: usize,
        /// Logged call.
        call: String,
        /// Cause.
        reason: SkipReason,
    },
    /// Rank taken from the roster because the token was missing or unparseable.
    LowConfidenceTier {
        /// Contact.
        seq: ContactSeq,
        /// Normalized call.
        call: String,
        /// Roster rank used.
        tier: Tier,
    },
    /// Token present but unparseable.
    UnparseableToken {
        /// Contact.
        seq: ContactSeq,
        /// Token text.
        token: String,
    },
    /// Normalization could not pick a base call.
    AmbiguousCallsign {
        /// Contact.
        seq: ContactSeq,
        /// Raw call kept as canonical.
        call: String,
    },
    /// Token number disagrees with the roster entry for the call.
    TokenNumberMismatch {
        /// Contact.
        seq: ContactSeq,
        /// Normalized call.
        call: String,
        /// Number in the token.
        token_number: MemberNumber,
        /// Number in the roster.
        roster_number: MemberNumber,
    },
    /// Band label that did not parse.
    UnknownBand {
        /// Contact.
        seq: ContactSeq,
        /// Label text.
        label: String,
    },
    /// Contact predates the member's join date and credits nothing.
    BeforeJoinDate {
        /// Contact.
        seq: ContactSeq,
        /// Normalized call.
        call: String,
        /// Member's join date.
        joined: NaiveDate,
    },
}

/// Run-level counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Drafts supplied.
    pub total: usize,
    /// Drafts skipped at ingestion.
    pub skipped: usize,
    /// Contacts accepted.
    pub accepted: usize,
    /// Contacts matched to a roster member.
    pub matched: usize,
    /// Distinct members matched.
    pub unique_members: usize,
    /// Matched contacts dated before the member joined.
    pub before_join: usize,
    /// Matched contacts whose rank came from the roster fallback.
    pub low_confidence_resolutions: usize,
    /// Calls with no roster match, sorted.
    pub unmatched_calls: Vec<String>,
}

/// Everything one computation produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardReport {
    /// Per-award progress, in a fixed award order.
    pub awards: Vec<AwardProgress>,
    /// Counters.
    pub summary: RunSummary,
    /// Data-quality notes, in contact order.
    pub diagnostics: Vec<Diagnostic>,
}

impl AwardReport {
    /// Progress for `award` with the given variant.
    pub fn find(&self, award: &str, variant: Option<&str>) -> Option<&AwardProgress> {
        self.awards
            .iter()
            .find(|a| a.award == award && a.variant.as_deref() == variant)
    }

    /// Achieved levels, one line per award or variant.
    pub fn headline(&self) -> Vec<String> {
        self.awards
            .iter()
            .filter_map(|a| {
                let rung = a.achieved.as_ref()?;
                Some(match &a.variant {
                    Some(v) => format!("{} ({v}): {}", a.award, rung.label),
                    None => format!("{}: {}", a.award, rung.label),
                })
            })
            .collect()
    }
}

/// Merges per-award results into one report and fills each status line.
pub fn aggregate(
    mut awards: Vec<AwardProgress>,
    summary: RunSummary,
    diagnostics: Vec<Diagnostic>,
) -> AwardReport {
    for award in &mut awards {
        award.status = award.describe();
    }
    AwardReport {
        awards,
        summary,
        diagnostics,
    }
}
