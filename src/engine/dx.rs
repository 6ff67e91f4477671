use std::collections::BTreeMap;

use crate::{
    filter::{CommonRules, Eligibility},
    geo,
    ladder::Ladder,
    report::{AwardProgress, Unit},
};

use super::{
    traits::{AwardEngine, CreditKey, Ledger, Worked},
    ymd,
};

const THRESHOLDS: [u64; 12] = [10, 25, 50, 75, 100, 125, 150, 200, 250, 300, 400, 500];

/// Out-of-country awards: DXQ counts unique members, DXC unique countries.
#[derive(Debug, Clone)]
pub struct DxEngine {
    home_country: String,
    dxq: Eligibility,
    dxc: Eligibility,
    common: CommonRules,
}

/// Fold state for [`DxEngine`].
#[derive(Debug, Default)]
pub struct DxState {
    dxq: Ledger,
    dxq_qrp: Ledger,
    dxq_countries: BTreeMap<String, u64>,
    dxc: Ledger,
    dxc_qrp: Ledger,
}

impl DxEngine {
    /// Engine treating `home_country` as local.
    pub fn new(home_country: impl Into<String>, common: CommonRules) -> Self {
        Self {
            home_country: home_country.into(),
            dxq: Eligibility::from_date(ymd(2009, 6, 14)),
            dxc: Eligibility::from_date(ymd(2009, 12, 19)),
            common,
        }
    }
}

fn ladder(award: &'static str) -> Ladder {
    Ladder::absolute(&THRESHOLDS, |t| format!("{award}-{t}"))
}

impl AwardEngine for DxEngine {
    type State = DxState;

    fn new_state(&self) -> Self::State {
        DxState::default()
    }

    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>) {
        let contact = worked.contact;
        let Some(country) = geo::country_of(&contact.call) else {
            return;
        };
        if country == self.home_country {
            return;
        }

        if self.dxq.check(contact, &self.common).is_ok() {
            let key = CreditKey::Member(worked.member_number());
            if state.dxq.credit(key.clone(), worked) {
                *state.dxq_countries.entry(country.to_string()).or_default() += 1;
            }
            if contact.qrp {
                state.dxq_qrp.credit(key, worked);
            }
        }

        if self.dxc.check(contact, &self.common).is_ok() {
            let key = CreditKey::Country(country);
            state.dxc.credit(key.clone(), worked);
            if contact.qrp {
                state.dxc_qrp.credit(key, worked);
            }
        }
    }

    fn finish(&self, state: Self::State) -> Vec<AwardProgress> {
        let dxq = ladder("DXQ");
        let dxc = ladder("DXC");
        vec![
            AwardProgress::on_ladder("DXQ", None, Unit::Contacts, state.dxq.len(), &dxq)
                .with_breakdown(state.dxq_countries)
                .with_credits(state.dxq.into_credits()),
            AwardProgress::on_ladder(
                "DXQ",
                Some("QRP".to_string()),
                Unit::Contacts,
                state.dxq_qrp.len(),
                &dxq,
            )
            .with_credits(state.dxq_qrp.into_credits()),
            AwardProgress::on_ladder("DXC", None, Unit::Countries, state.dxc.len(), &dxc)
                .with_credits(state.dxc.into_credits()),
            AwardProgress::on_ladder(
                "DXC",
                Some("QRP".to_string()),
                Unit::Countries,
                state.dxc_qrp.len(),
                &dxc,
            )
            .with_credits(state.dxc_qrp.into_credits()),
        ]
    }
}
