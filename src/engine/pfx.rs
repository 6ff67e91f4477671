use std::collections::BTreeMap;

use crate::{
    callsign::prefix_of,
    filter::{CommonRules, Eligibility},
    ladder::Ladder,
    report::{AwardProgress, Credit, Unit},
    types::{Band, MemberNumber},
};

use super::{
    traits::{AwardEngine, CreditKey, Worked},
    ymd,
};

const POINTS_PER_LEVEL: u64 = 500_000;

/// Prefix award: each unique prefix scores the highest member number worked
/// on it.
#[derive(Debug, Clone)]
pub struct PfxEngine {
    eligibility: Eligibility,
    common: CommonRules,
}

/// Best member per prefix for one pool.
#[derive(Debug, Default)]
struct PrefixPool {
    best: BTreeMap<String, (MemberNumber, Credit)>,
}

impl PrefixPool {
    fn offer(&mut self, prefix: &str, number: MemberNumber, worked: &Worked<'_>) {
        let credit = || Credit {
            key: CreditKey::Prefix(prefix.to_string()),
            seq: worked.contact.seq,
            at: worked.contact.at,
            call: worked.contact.call.clone(),
            confidence: worked.resolution.confidence,
        };
        match self.best.get_mut(prefix) {
            Some(entry) if number > entry.0 => *entry = (number, credit()),
            Some(_) => {}
            None => {
                self.best.insert(prefix.to_string(), (number, credit()));
            }
        }
    }

    fn score(&self) -> u64 {
        self.best.values().map(|(n, _)| u64::from(*n)).sum()
    }

    fn into_progress(self, variant: Option<String>, ladder: &Ladder) -> AwardProgress {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("prefixes".to_string(), self.best.len() as u64);
        let score = self.score();
        let credits = self.best.into_values().map(|(_, c)| c).collect();
        AwardProgress::on_ladder("PFX", variant, Unit::Points, score, ladder)
            .with_breakdown(breakdown)
            .with_credits(credits)
    }
}

/// Fold state for [`PfxEngine`].
#[derive(Debug, Default)]
pub struct PfxState {
    overall: PrefixPool,
    by_band: BTreeMap<Band, PrefixPool>,
}

impl PfxEngine {
    /// Engine with the prefix award window.
    pub fn new(common: CommonRules) -> Self {
        Self {
            eligibility: Eligibility::from_date(ymd(2013, 1, 1)),
            common,
        }
    }

    /// Endorsement ladder for the overall award.
    pub fn ladder() -> Ladder {
        Ladder::multiples(POINTS_PER_LEVEL, 10, 5, 100, |n| format!("Px{n}"))
    }
}

impl AwardEngine for PfxEngine {
    type State = PfxState;

    fn new_state(&self) -> Self::State {
        PfxState::default()
    }

    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>) {
        let contact = worked.contact;
        if self.eligibility.check(contact, &self.common).is_err() {
            return;
        }
        let Some(prefix) = prefix_of(&contact.call) else {
            return;
        };
        let number = worked.member_number();
        state.overall.offer(prefix, number, worked);
        if let Some(band) = contact.band {
            state.by_band.entry(band).or_default().offer(prefix, number, worked);
        }
    }

    fn finish(&self, state: Self::State) -> Vec<AwardProgress> {
        let ladder = Self::ladder();
        let mut out = vec![state.overall.into_progress(None, &ladder)];
        for (band, pool) in state.by_band {
            out.push(pool.into_progress(Some(band.label().to_string()), &ladder));
        }
        out
    }
}
