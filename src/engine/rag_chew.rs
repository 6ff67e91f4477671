//! Rag Chew: accumulated minutes of long conversations.
//!
//! A conversation is a run of adjacent contacts with the same member in the
//! time-ordered stream. The run counts once, with its longest qualifying
//! contact, so back-to-back contacts with one station are never summed.

use std::collections::BTreeMap;

use hashbrown::HashSet;

use crate::{
    contact::Contact,
    filter::{CommonRules, Eligibility},
    ladder::Ladder,
    report::{AwardProgress, Credit, Unit},
    types::{Band, ContactSeq, MemberNumber},
};

use super::{
    traits::{AwardEngine, CreditKey, Worked},
    ymd,
};

const AWARD: &str = "Rag Chew";
const MIN_MINUTES: u32 = 30;
const MIN_MINUTES_MULTI: u32 = 40;
const MINUTES_PER_LEVEL: u64 = 300;

/// Contacts whose time span overlaps another contact's span.
///
/// `contacts` must be sorted by start time.
pub fn overlapping_seqs(contacts: &[Contact]) -> HashSet<ContactSeq> {
    let mut out = HashSet::new();
    for (i, first) in contacts.iter().enumerate() {
        let Some(end) = first.end else {
            continue;
        };
        for second in contacts[i + 1..].iter().take_while(|c| c.at < end) {
            if second.end.is_some_and(|e| e > first.at) {
                out.insert(first.seq);
                out.insert(second.seq);
            }
        }
    }
    out
}

/// Rag Chew minutes, overall and per band.
#[derive(Debug, Clone)]
pub struct RagChewEngine {
    eligibility: Eligibility,
    common: CommonRules,
    multi_station: HashSet<ContactSeq>,
}

#[derive(Debug)]
struct Candidate {
    minutes: u32,
    band: Option<Band>,
    credit: Credit,
}

/// Fold state for [`RagChewEngine`].
#[derive(Debug, Default)]
pub struct RagChewState {
    run_member: Option<MemberNumber>,
    run_best: Option<Candidate>,
    conversations: Vec<Candidate>,
}

impl RagChewState {
    fn close_run(&mut self) {
        if let Some(best) = self.run_best.take() {
            self.conversations.push(best);
        }
    }
}

impl RagChewEngine {
    /// `multi_station` holds the contacts held to the higher minimum.
    pub fn new(common: CommonRules, multi_station: HashSet<ContactSeq>) -> Self {
        Self {
            eligibility: Eligibility::from_date(ymd(2013, 7, 1)).min_minutes(MIN_MINUTES),
            common,
            multi_station,
        }
    }

    /// Endorsement ladder for the overall award.
    pub fn ladder() -> Ladder {
        Ladder::multiples(MINUTES_PER_LEVEL, 10, 5, 50, |n| format!("RC{n}"))
    }

    fn qualifying_minutes(&self, worked: &Worked<'_>) -> Option<u32> {
        let contact = worked.contact;
        self.eligibility.check(contact, &self.common).ok()?;
        let minutes = contact.duration_minutes?;
        let multi = contact.multi_station || self.multi_station.contains(&contact.seq);
        if multi && minutes < MIN_MINUTES_MULTI {
            return None;
        }
        Some(minutes)
    }
}

impl AwardEngine for RagChewEngine {
    type State = RagChewState;

    fn new_state(&self) -> Self::State {
        RagChewState::default()
    }

    fn apply(&self, state: &mut Self::State, worked: &Worked<'_>) {
        let number = worked.member_number();
        if state.run_member != Some(number) {
            state.close_run();
            state.run_member = Some(number);
        }

        let Some(minutes) = self.qualifying_minutes(worked) else {
            return;
        };
        if state.run_best.as_ref().is_some_and(|b| b.minutes >= minutes) {
            return;
        }
        state.run_best = Some(Candidate {
            minutes,
            band: worked.contact.band,
            credit: Credit {
                key: CreditKey::Conversation(worked.contact.seq),
                seq: worked.contact.seq,
                at: worked.contact.at,
                call: worked.contact.call.clone(),
                confidence: worked.resolution.confidence,
            },
        });
    }

    fn finish(&self, mut state: Self::State) -> Vec<AwardProgress> {
        state.close_run();
        let ladder = Self::ladder();

        let mut total = 0u64;
        let mut by_band: BTreeMap<Band, (u64, Vec<Credit>)> = BTreeMap::new();
        let mut credits = Vec::with_capacity(state.conversations.len());
        for conversation in state.conversations {
            let minutes = u64::from(conversation.minutes);
            total += minutes;
            if let Some(band) = conversation.band {
                let entry = by_band.entry(band).or_default();
                entry.0 += minutes;
                entry.1.push(conversation.credit.clone());
            }
            credits.push(conversation.credit);
        }

        let mut breakdown: BTreeMap<String, u64> = by_band
            .iter()
            .map(|(band, (minutes, _))| (band.label().to_string(), *minutes))
            .collect();
        breakdown.insert("conversations".to_string(), credits.len() as u64);

        let mut out = vec![
            AwardProgress::on_ladder(AWARD, None, Unit::Minutes, total, &ladder)
                .with_breakdown(breakdown)
                .with_credits(credits),
        ];
        for (band, (minutes, band_credits)) in by_band {
            out.push(
                AwardProgress::on_ladder(
                    AWARD,
                    Some(band.label().to_string()),
                    Unit::Minutes,
                    minutes,
                    &ladder,
                )
                .with_credits(band_credits),
            );
        }
        out
    }
}
