use std::collections::BTreeMap;

use crate::{
    filter::{CommonRules, Eligibility},
    geo,
    ladder::Ladder,
    report::{AwardProgress, Unit},
    types::{Band, Continent},
};

use super::{
    traits::{AwardEngine, CreditKey, Ledger, Worked},
    ymd,
};

const AWARD: &str = "WAC";

/// Worked All Continents, with QRP and per-band variants.
#[derive(Debug, Clone)]
pub struct WacEngine {
    eligibility: Eligibility,
    common: CommonRules,
}

/// Fold state for [`WacEngine`].
#[derive(Debug, Default)]
pub struct WacState {
    overall: Ledger,
    qrp: Ledger,
    by_band: BTreeMap<Band, Ledger>,
    qrp_by_band: BTreeMap<Band, Ledger>,
}

impl WacEngine {
    /// Engine applying `common` to every variant.
    pub fn new(common: CommonRules) -> Self {
        Self {
            eligibility: Eligibility::from_date(ymd(2011, 10, 9)),
            common,
        }
    }
}

fn progress(variant: Option<String>, ledger: Ledger) -> AwardProgress {
    let ladder = Ladder::single(AWARD, Continent::ALL_SIX.len() as u64);
    AwardProgress::on_ladder(AWARD, variant, Unit::Continents, ledger.len(), &ladder)
        .with_credits(ledger.into_credits())
}

impl AwardEngine for WacEngine {
    type State = WacState;

    fn new_state(&self) -> Self::State {
        WacState::default()
    }

    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>) {
        let contact = worked.contact;
        if self.eligibility.check(contact, &self.common).is_err() {
            return;
        }
        let Some(continent) = geo::continent_of(&contact.call) else {
            return;
        };
        if !Continent::ALL_SIX.contains(&continent) {
            return;
        }

        let key = CreditKey::Continent(continent);
        state.overall.credit(key.clone(), worked);
        if contact.qrp {
            state.qrp.credit(key.clone(), worked);
        }
        if let Some(band) = contact.band {
            state.by_band.entry(band).or_default().credit(key.clone(), worked);
            if contact.qrp {
                state.qrp_by_band.entry(band).or_default().credit(key, worked);
            }
        }
    }

    fn finish(&self, mut state: Self::State) -> Vec<AwardProgress> {
        let mut out = vec![
            progress(None, state.overall),
            progress(Some("QRP".to_string()), state.qrp),
        ];
        for (band, ledger) in state.by_band {
            out.push(progress(Some(band.label().to_string()), ledger));
            if let Some(qrp) = state.qrp_by_band.remove(&band) {
                out.push(progress(Some(format!("{} QRP", band.label())), qrp));
            }
        }
        out
    }
}
