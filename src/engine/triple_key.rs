use std::collections::BTreeMap;

use crate::{
    filter::{CommonRules, Eligibility},
    ladder::Ladder,
    report::{AwardProgress, Unit},
    types::KeyType,
};

use super::{
    traits::{AwardEngine, CreditKey, Ledger, Worked},
    ymd,
};

const AWARD: &str = "Triple Key";
const PER_POOL: u64 = 100;

/// Three unique-member pools, one per mechanical key device.
#[derive(Debug, Clone)]
pub struct TripleKeyEngine {
    eligibility: Eligibility,
    common: CommonRules,
}

/// Fold state for [`TripleKeyEngine`].
#[derive(Debug, Default)]
pub struct TripleKeyState {
    pools: BTreeMap<KeyType, Ledger>,
}

impl TripleKeyEngine {
    /// Engine with the Triple Key window.
    pub fn new(common: CommonRules) -> Self {
        Self {
            eligibility: Eligibility::from_date(ymd(2018, 11, 10)).keys(&KeyType::MECHANICAL),
            common,
        }
    }
}

impl AwardEngine for TripleKeyEngine {
    type State = TripleKeyState;

    fn new_state(&self) -> Self::State {
        TripleKeyState::default()
    }

    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>) {
        if self.eligibility.check(worked.contact, &self.common).is_err() {
            return;
        }
        let Some(key) = worked.contact.key else {
            return;
        };
        state
            .pools
            .entry(key)
            .or_default()
            .credit(CreditKey::Member(worked.member_number()), worked);
    }

    fn finish(&self, mut state: Self::State) -> Vec<AwardProgress> {
        let mut out = Vec::with_capacity(4);
        let mut breakdown = BTreeMap::new();
        let mut capped_total = 0;

        for key in KeyType::MECHANICAL {
            let ledger = state.pools.remove(&key).unwrap_or_default();
            let count = ledger.len();
            capped_total += count.min(PER_POOL);
            breakdown.insert(key.label().to_string(), count);
            out.push(
                AwardProgress::on_ladder(
                    AWARD,
                    Some(key.label().to_string()),
                    Unit::Members,
                    count,
                    &Ladder::single(key.label(), PER_POOL),
                )
                .with_credits(ledger.into_credits()),
            );
        }

        let overall = Ladder::single(AWARD, PER_POOL * KeyType::MECHANICAL.len() as u64);
        out.insert(
            0,
            AwardProgress::on_ladder(AWARD, None, Unit::Members, capped_total, &overall)
                .with_breakdown(breakdown),
        );
        out
    }
}
