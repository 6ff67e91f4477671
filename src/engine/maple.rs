use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    filter::{CommonRules, Eligibility},
    geo,
    ladder::Ladder,
    report::{AwardProgress, Unit},
    types::{Band, HF_AWARD_BANDS},
};

use super::traits::{AwardEngine, CreditKey, Ledger, Worked};

const AWARD: &str = "Canadian Maple";
const PROVINCES_REQUIRED: u64 = 10;

/// Canadian province and territory coverage, overall and per HF band.
#[derive(Debug, Clone)]
pub struct MapleEngine {
    eligibility: Eligibility,
    common: CommonRules,
}

/// Fold state for [`MapleEngine`].
#[derive(Debug, Default)]
pub struct MapleState {
    overall: Ledger,
    by_band: BTreeMap<Band, Ledger>,
    qrp_by_band: BTreeMap<Band, Ledger>,
}

impl MapleEngine {
    /// Engine applying `common` to every band.
    pub fn new(common: CommonRules) -> Self {
        Self {
            eligibility: Eligibility::always().hf_bands(),
            common,
        }
    }
}

fn bands_complete(pools: &BTreeMap<Band, Ledger>) -> BTreeMap<String, u64> {
    pools
        .iter()
        .map(|(band, ledger)| (band.label().to_string(), ledger.len()))
        .collect()
}

fn complete_count(pools: &BTreeMap<Band, Ledger>) -> u64 {
    pools
        .values()
        .filter(|ledger| ledger.len() >= PROVINCES_REQUIRED)
        .count() as u64
}

impl AwardEngine for MapleEngine {
    type State = MapleState;

    fn new_state(&self) -> Self::State {
        MapleState::default()
    }

    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>) {
        let contact = worked.contact;
        if self.eligibility.check(contact, &self.common).is_err() {
            return;
        }
        let Some(province) = geo::province_of(&contact.call) else {
            return;
        };
        if contact.date() < province.counts_from {
            return;
        }
        let Some(band) = contact.band else {
            return;
        };

        let key = CreditKey::Province(province.code);
        state.overall.credit(key.clone(), worked);
        state.by_band.entry(band).or_default().credit(key.clone(), worked);
        if contact.qrp {
            state.qrp_by_band.entry(band).or_default().credit(key, worked);
        }
    }

    fn finish(&self, state: Self::State) -> Vec<AwardProgress> {
        let provinces = Ladder::single("Yellow", PROVINCES_REQUIRED);
        let all_bands = HF_AWARD_BANDS.len() as u64;
        let mut out = Vec::with_capacity(HF_AWARD_BANDS.len() + 3);

        out.push(
            AwardProgress::on_ladder(
                AWARD,
                Some("Yellow".to_string()),
                Unit::Provinces,
                state.overall.len(),
                &provinces,
            )
            .with_breakdown(bands_complete(&state.by_band))
            .with_credits(state.overall.credits().to_vec()),
        );

        for band in HF_AWARD_BANDS {
            let ledger = state.by_band.get(&band);
            let count = ledger.map_or(0, Ledger::len);
            let credits = ledger.map(|l| l.credits().to_vec()).unwrap_or_default();
            out.push(
                AwardProgress::on_ladder(
                    AWARD,
                    Some(format!("Orange {}", band.label())),
                    Unit::Provinces,
                    count,
                    &Ladder::single("Orange", PROVINCES_REQUIRED),
                )
                .with_credits(credits),
            );
        }

        let red = complete_count(&state.by_band);
        out.push(
            AwardProgress::on_ladder(
                AWARD,
                Some("Red".to_string()),
                Unit::Bands,
                red,
                &Ladder::single("Red", all_bands),
            )
            .with_breakdown(bands_complete(&state.by_band)),
        );

        let gold = complete_count(&state.qrp_by_band);
        out.push(
            AwardProgress::on_ladder(
                AWARD,
                Some("Gold".to_string()),
                Unit::Bands,
                gold,
                &Ladder::single("Gold", all_bands),
            )
            .with_breakdown(bands_complete(&state.qrp_by_band)),
        );

        debug!(provinces = state.overall.len(), red, gold, "maple coverage folded");
        out
    }
}
