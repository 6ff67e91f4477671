//! Read-only membership roster snapshot.

use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    callsign::Normalizer,
    types::{MemberNumber, Tier},
};

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Membership number.
    pub number: MemberNumber,
    /// Callsign as listed.
    pub call: String,
    /// Current rank.
    pub tier: Tier,
    /// Date the member joined.
    pub join_date: Option<NaiveDate>,
    /// State or province code, when listed.
    pub state: Option<String>,
    /// Country, when listed.
    pub country: Option<String>,
}

/// Roster indexed by normalized call and by member number.
///
/// When two entries share a call or a number, the first one wins.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<Member>,
    by_call: HashMap<String, usize>,
    by_number: HashMap<MemberNumber, usize>,
}

impl Roster {
    /// Builds the indices, normalizing each listed call with `normalizer`.
    pub fn new(members: Vec<Member>, normalizer: &Normalizer) -> Self {
        let mut by_call = HashMap::with_capacity(members.len());
        let mut by_number = HashMap::with_capacity(members.len());
        for (idx, member) in members.iter().enumerate() {
            let call = normalizer.canonical(&member.call);
            if !call.is_empty() {
                by_call.entry(call).or_insert(idx);
            }
            by_number.entry(member.number).or_insert(idx);
        }
        Self {
            members,
            by_call,
            by_number,
        }
    }

    /// Looks up a member by normalized call.
    pub fn by_call(&self, call: &str) -> Option<&Member> {
        self.by_call.get(call).map(|idx| &self.members[*idx])
    }

    /// Looks up a member by number.
    pub fn by_number(&self, number: MemberNumber) -> Option<&Member> {
        self.by_number.get(&number).map(|idx| &self.members[*idx])
    }

    /// All entries in listing order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when no entries are listed.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
