use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use hashbrown::HashSet;
use tracing::debug;

use crate::{
    config::{EngineConfig, LowConfidencePolicy, TierThresholds},
    filter::{CommonRules, Eligibility},
    ladder::Ladder,
    report::{AwardProgress, Unit},
    types::{Band, MemberNumber, Tier},
};

use super::{
    traits::{AwardEngine, CreditKey, Ledger, Worked},
    ymd,
};

/// Centurion, Tribune and Senator.
#[derive(Debug, Clone)]
pub struct TierEngine {
    thresholds: TierThresholds,
    enforce: bool,
    low_confidence: LowConfidencePolicy,
    senator_from: Option<NaiveDate>,
    eligibility: Eligibility,
    common: CommonRules,
}

/// Fold state for [`TierEngine`].
#[derive(Debug, Default)]
pub struct TierState {
    centurion: Ledger,
    by_band: BTreeMap<Band, HashSet<MemberNumber>>,
    tribune: Ledger,
    tribune_by_tier: BTreeMap<String, u64>,
    senator_unlocked_at: Option<NaiveDateTime>,
    senator: Ledger,
    senator_by_tier: BTreeMap<String, u64>,
}

impl TierEngine {
    /// Engine for the thresholds in `config`.
    pub fn new(config: &EngineConfig, common: CommonRules) -> Self {
        Self {
            thresholds: config.thresholds,
            enforce: config.enforce_tier_rules,
            low_confidence: config.low_confidence,
            senator_from: ymd(2013, 8, 1),
            eligibility: Eligibility::always(),
            common,
        }
    }

    /// Eligibility applied to every rank award.
    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    fn apply_enforced(&self, state: &mut TierState, worked: &Worked<'_>, key: CreditKey) {
        let r = &worked.resolution;
        if worked.own_tier < Tier::Centurion || !r.usable_for_tiers(self.low_confidence) {
            return;
        }

        if r.tier >= Tier::Centurion && state.tribune.credit(key.clone(), worked) {
            *state.tribune_by_tier.entry(tier_label(r.tier)).or_default() += 1;
            if state.senator_unlocked_at.is_none()
                && state.tribune.len() == self.thresholds.senator_prerequisite()
            {
                debug!(at = %worked.contact.at, "senator prerequisite reached");
                state.senator_unlocked_at = Some(worked.contact.at);
            }
        }

        let unlocked = state
            .senator_unlocked_at
            .is_some_and(|at| worked.contact.at >= at);
        let in_window = self.senator_from.is_none_or(|from| worked.contact.date() >= from);
        if unlocked && in_window && r.tier >= Tier::Tribune && state.senator.credit(key, worked) {
            *state.senator_by_tier.entry(tier_label(r.tier)).or_default() += 1;
        }
    }

    fn apply_legacy(&self, state: &mut TierState, worked: &Worked<'_>, key: CreditKey) {
        let tier = worked.resolution.tier;
        if tier >= Tier::Centurion && state.tribune.credit(key.clone(), worked) {
            *state.tribune_by_tier.entry(tier_label(tier)).or_default() += 1;
        }
        if tier >= Tier::Tribune && state.senator.credit(key, worked) {
            *state.senator_by_tier.entry(tier_label(tier)).or_default() += 1;
        }
    }
}

fn tier_label(tier: Tier) -> String {
    tier.suffix().map_or_else(|| "none".to_string(), String::from)
}

fn multiples_ladder(base: u64, first: &str, prefix: &str, coarse_max: u64) -> Ladder {
    let step = if coarse_max > 10 { 5 } else { 0 };
    Ladder::multiples(base, 10, step, coarse_max, |n| {
        if n == 1 {
            first.to_string()
        } else {
            format!("{prefix}{n}")
        }
    })
}

impl AwardEngine for TierEngine {
    type State = TierState;

    fn new_state(&self) -> Self::State {
        TierState::default()
    }

    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>) {
        if self.eligibility.check(worked.contact, &self.common).is_err() {
            return;
        }
        let number = worked.member_number();
        let key = CreditKey::Member(number);

        state.centurion.credit(key.clone(), worked);
        if let Some(band) = worked.contact.band {
            state.by_band.entry(band).or_default().insert(number);
        }

        if self.enforce {
            self.apply_enforced(state, worked, key);
        } else {
            self.apply_legacy(state, worked, key);
        }
    }

    fn finish(&self, state: Self::State) -> Vec<AwardProgress> {
        let t = &self.thresholds;
        let mut out = Vec::new();

        let centurion_ladder = multiples_ladder(t.centurion, "Centurion", "Cx", 50);
        let band_counts: BTreeMap<String, u64> = state
            .by_band
            .iter()
            .map(|(band, members)| (band.label().to_string(), members.len() as u64))
            .collect();
        out.push(
            AwardProgress::on_ladder(
                "Centurion",
                None,
                Unit::Members,
                state.centurion.len(),
                &centurion_ladder,
            )
            .with_breakdown(band_counts)
            .with_credits(state.centurion.into_credits()),
        );
        for (band, members) in &state.by_band {
            out.push(AwardProgress::on_ladder(
                "Centurion",
                Some(band.label().to_string()),
                Unit::Members,
                members.len() as u64,
                &Ladder::single("Centurion", t.centurion),
            ));
        }

        let tribune_count = state.tribune.len();
        out.push(
            AwardProgress::on_ladder(
                "Tribune",
                None,
                Unit::Members,
                tribune_count,
                &multiples_ladder(t.tribune, "Tribune", "Tx", 50),
            )
            .with_breakdown(state.tribune_by_tier)
            .with_credits(state.tribune.into_credits()),
        );

        let senator_ladder = multiples_ladder(t.senator, "Senator", "Sx", 10);
        let prerequisite_met = if self.enforce {
            state.senator_unlocked_at.is_some()
        } else {
            tribune_count >= t.senator_prerequisite()
        };
        let mut senator = AwardProgress::on_ladder(
            "Senator",
            None,
            Unit::Members,
            state.senator.len(),
            &senator_ladder,
        );
        if !prerequisite_met {
            senator.locked = true;
            senator.achieved = None;
            senator.next = senator_ladder.rungs().first().cloned();
            senator.remaining = senator_ladder.base().saturating_sub(senator.value);
            senator.target = senator_ladder.base();
        }
        let mut senator_breakdown = state.senator_by_tier;
        senator_breakdown.insert("tribune_prerequisite".to_string(), t.senator_prerequisite());
        senator_breakdown.insert("tribune_count".to_string(), tribune_count);
        out.push(
            senator
                .with_breakdown(senator_breakdown)
                .with_credits(state.senator.into_credits()),
        );
        out
    }
}
