//! Membership resolution: who a contact was with, and their rank at the time.
//!
//! The rank recorded in the contact's own token is authoritative. The
//! roster's current rank is only a fallback, and resolutions that use it are
//! marked low-confidence: a member promoted after the contact would otherwise
//! inflate the tier-gated counts.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    config::LowConfidencePolicy,
    contact::{Contact, TokenField},
    roster::{Member, Roster},
    types::{MemberNumber, Tier},
};

/// How far a resolved rank can be trusted as the rank at contact time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    /// Read from the contact's own token.
    High,
    /// Taken from the roster's current snapshot.
    Low,
}

/// Where a resolved rank came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierSource {
    /// The contact's token.
    Token,
    /// Roster current rank, because the token was missing or unparseable.
    RosterFallback,
    /// Roster current rank, because rank enforcement is off.
    RosterCurrent,
}

/// Membership resolution for one contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'r> {
    /// Roster entry, when the contact is with a known member.
    pub member: Option<&'r Member>,
    /// Rank at contact time.
    pub tier: Tier,
    /// Confidence in `tier`.
    pub confidence: Confidence,
    /// Origin of `tier`.
    pub source: TierSource,
    /// Token number differs from the roster entry found by call.
    pub token_mismatch: bool,
}

impl Resolution<'_> {
    /// Member number, when matched.
    pub fn number(&self) -> Option<MemberNumber> {
        self.member.map(|m| m.number)
    }

    /// True when the contact predates the member's join date.
    pub fn before_join(&self, date: NaiveDate) -> bool {
        self.member
            .and_then(|m| m.join_date)
            .is_some_and(|joined| date < joined)
    }

    /// Whether this rank may count toward tier-gated awards under `policy`.
    pub fn usable_for_tiers(&self, policy: LowConfidencePolicy) -> bool {
        match (self.source, policy) {
            (TierSource::RosterFallback, LowConfidencePolicy::Exclude) => false,
            _ => true,
        }
    }
}

/// Resolves contacts against one roster snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    roster: &'r Roster,
    enforce_tier_rules: bool,
}

impl<'r> Resolver<'r> {
    /// Resolver over `roster`. With `enforce_tier_rules` off every contact
    /// resolves to the roster's current rank.
    pub fn new(roster: &'r Roster, enforce_tier_rules: bool) -> Self {
        Self {
            roster,
            enforce_tier_rules,
        }
    }

    /// Rank at contact time and its confidence.
    pub fn resolve(&self, contact: &Contact) -> (Tier, Confidence) {
        let r = self.resolve_full(contact);
        (r.tier, r.confidence)
    }

    /// Full resolution including the matched member.
    ///
    /// The member is found by normalized call, falling back to the token's
    /// number when the call is not listed.
    pub fn resolve_full(&self, contact: &Contact) -> Resolution<'r> {
        let token = contact.token.token();
        let by_call = self.roster.by_call(&contact.call);
        let member = by_call.or_else(|| token.and_then(|t| self.roster.by_number(t.number)));
        let token_mismatch = match (by_call, token) {
            (Some(m), Some(t)) => m.number != t.number,
            _ => false,
        };
        let roster_tier = member.map_or(Tier::None, |m| m.tier);

        let (tier, confidence, source) = if !self.enforce_tier_rules {
            (roster_tier, Confidence::Low, TierSource::RosterCurrent)
        } else {
            match &contact.token {
                TokenField::Present(t) => (t.tier, Confidence::High, TierSource::Token),
                TokenField::Missing | TokenField::Unparseable(_) => {
                    (roster_tier, Confidence::Low, TierSource::RosterFallback)
                }
            }
        };

        Resolution {
            member,
            tier,
            confidence,
            source,
            token_mismatch,
        }
    }
}

/// Logging station's own rank at the time of `contact`.
///
/// The highest of the rank in the contact's own token, Centurion once the
/// log itself reached Centurion (`log_centurion_at`, inclusive), and
/// Centurion from `configured_centurion` onward.
pub fn own_tier_at(
    contact: &Contact,
    log_centurion_at: Option<NaiveDateTime>,
    configured_centurion: Option<NaiveDate>,
) -> Tier {
    let recorded = contact.my_token.map_or(Tier::None, |t| t.tier);
    let from_log = log_centurion_at.is_some_and(|at| contact.at >= at);
    let from_config = configured_centurion.is_some_and(|d| contact.date() >= d);
    if from_log || from_config {
        recorded.max(Tier::Centurion)
    } else {
        recorded
    }
}
