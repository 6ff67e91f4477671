use hashbrown::HashSet;
use serde::Serialize;

use crate::{
    contact::Contact,
    report::{AwardProgress, Credit},
    resolve::Resolution,
    types::{Continent, MemberNumber, Tier},
};

/// Identity of one credited entity. At most one credit per key per pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CreditKey {
    /// Member number.
    Member(MemberNumber),
    /// Province or territory code.
    Province(&'static str),
    /// Country name.
    Country(&'static str),
    /// Call prefix.
    Prefix(String),
    /// Continent.
    Continent(Continent),
    /// Contact sequence of the longest contact in a conversation.
    Conversation(u64),
}

/// A contact with a matched member, ready for the counting engines.
#[derive(Debug, Clone, Copy)]
pub struct Worked<'a> {
    /// The contact.
    pub contact: &'a Contact,
    /// Matched member and rank at contact time.
    pub resolution: Resolution<'a>,
    /// Logging station's own rank at contact time.
    pub own_tier: Tier,
}

impl Worked<'_> {
    /// Matched member's number.
    pub fn member_number(&self) -> MemberNumber {
        self.resolution.number().unwrap_or_default()
    }
}

/// Credited-key set plus the audit trail of what was credited.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    seen: HashSet<CreditKey>,
    credits: Vec<Credit>,
}

impl Ledger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `key` from `worked` unless already credited. Returns true on
    /// a new credit.
    pub fn credit(&mut self, key: CreditKey, worked: &Worked<'_>) -> bool {
        if self.seen.contains(&key) {
            return false;
        }
        self.seen.insert(key.clone());
        self.credits.push(Credit {
            key,
            seq: worked.contact.seq,
            at: worked.contact.at,
            call: worked.contact.call.clone(),
            confidence: worked.resolution.confidence,
        });
        true
    }

    /// True when `key` is already credited.
    pub fn contains(&self, key: &CreditKey) -> bool {
        self.seen.contains(key)
    }

    /// Number of credited keys.
    pub fn len(&self) -> u64 {
        self.credits.len() as u64
    }

    /// True when nothing is credited.
    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    /// Credits in crediting order.
    pub fn credits(&self) -> &[Credit] {
        &self.credits
    }

    /// Consumes the ledger into its credits.
    pub fn into_credits(self) -> Vec<Credit> {
        self.credits
    }
}

/// One award family as a fold over the time-ordered worked stream.
pub trait AwardEngine: Send + Sync {
    /// Per-run fold state.
    type State: Send;

    /// Fresh state for one run.
    fn new_state(&self) -> Self::State;
    /// Folds one contact into `state`.
    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>);
    /// Progress entries for every award and variant this engine owns.
    fn finish(&self, state: Self::State) -> Vec<AwardProgress>;
}

/// Folds `stream` through `engine`.
pub fn run_engine<E: AwardEngine>(engine: &E, stream: &[Worked<'_>]) -> Vec<AwardProgress> {
    let mut state = engine.new_state();
    for worked in stream {
        engine.apply(&mut state, worked);
    }
    engine.finish(state)
}
