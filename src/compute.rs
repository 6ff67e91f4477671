//! One computation run: drafts and roster in, report out.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use hashbrown::HashSet;
use tracing::{debug, info};

use crate::{
    config::{ConfigError, EngineConfig},
    contact::{Contact, ContactDraft, TokenField},
    engine::{
        dx::DxEngine,
        maple::MapleEngine,
        pfx::PfxEngine,
        rag_chew::{RagChewEngine, overlapping_seqs},
        tier::TierEngine,
        traits::{AwardEngine, Worked, run_engine},
        triple_key::TripleKeyEngine,
        wac::WacEngine,
    },
    filter::CommonRules,
    report::{AwardProgress, AwardReport, Diagnostic, RunSummary, aggregate},
    resolve::{Resolver, TierSource, own_tier_at},
    roster::Roster,
    types::{MemberNumber, Tier},
};

/// Computes every award for `drafts` against `roster`.
///
/// Pure and deterministic: identical inputs give identical reports. Only an
/// invalid configuration is an error; bad records become diagnostics.
pub fn compute(
    drafts: &[ContactDraft],
    roster: &Roster,
    config: &EngineConfig,
) -> Result<AwardReport, ConfigError> {
    config.validate()?;
    let normalizer = config.normalizer();
    let mut diagnostics = Vec::new();
    let mut summary = RunSummary {
        total: drafts.len(),
        ..RunSummary::default()
    };

    let mut contacts = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.iter().enumerate() {
        match Contact::from_draft(draft, index as u64, &normalizer, config.qrp_max_watts) {
            Ok(contact) => contacts.push(contact),
            Err(reason) => diagnostics.push(Diagnostic::SkippedContact {
                index,
                call: draft.call.trim().to_string(),
                reason,
            }),
        }
    }
    summary.skipped = drafts.len() - contacts.len();
    summary.accepted = contacts.len();
    contacts.sort_by_key(|c| (c.at, c.seq));

    let resolver = Resolver::new(roster, config.enforce_tier_rules);
    let mut worked: Vec<Worked<'_>> = Vec::with_capacity(contacts.len());
    let mut unmatched = BTreeSet::new();
    let mut members = HashSet::<MemberNumber>::new();

    for contact in &contacts {
        if contact.call_ambiguous {
            diagnostics.push(Diagnostic::AmbiguousCallsign {
                seq: contact.seq,
                call: contact.call.clone(),
            });
        }
        if let Some(label) = &contact.band_unrecognised {
            diagnostics.push(Diagnostic::UnknownBand {
                seq: contact.seq,
                label: label.clone(),
            });
        }
        if let TokenField::Unparseable(token) = &contact.token {
            diagnostics.push(Diagnostic::UnparseableToken {
                seq: contact.seq,
                token: token.clone(),
            });
        }

        let resolution = resolver.resolve_full(contact);
        let Some(member) = resolution.member else {
            unmatched.insert(contact.call_raw.to_ascii_uppercase());
            continue;
        };
        if resolution.before_join(contact.date()) {
            summary.before_join += 1;
            if let Some(joined) = member.join_date {
                diagnostics.push(Diagnostic::BeforeJoinDate {
                    seq: contact.seq,
                    call: contact.call.clone(),
                    joined,
                });
            }
            continue;
        }
        if resolution.token_mismatch {
            if let Some(token) = contact.token.token() {
                diagnostics.push(Diagnostic::TokenNumberMismatch {
                    seq: contact.seq,
                    call: contact.call.clone(),
                    token_number: token.number,
                    roster_number: member.number,
                });
            }
        }
        if resolution.source == TierSource::RosterFallback {
            summary.low_confidence_resolutions += 1;
            diagnostics.push(Diagnostic::LowConfidenceTier {
                seq: contact.seq,
                call: contact.call.clone(),
                tier: resolution.tier,
            });
        }

        members.insert(member.number);
        worked.push(Worked {
            contact,
            resolution,
            own_tier: Tier::None,
        });
    }
    summary.matched = worked.len();
    summary.unique_members = members.len();
    summary.unmatched_calls = unmatched.into_iter().collect();

    let common = CommonRules::from_config(config);
    let tier_engine = TierEngine::new(config, common.clone());
    let log_centurion_at = log_centurion_moment(&worked, &tier_engine, &common, config);
    for w in &mut worked {
        w.own_tier = own_tier_at(w.contact, log_centurion_at, config.own_centurion_date);
    }

    let mut awards: Vec<AwardProgress> = Vec::new();
    awards.extend(fold("tier", &tier_engine, &worked));
    awards.extend(fold("maple", &MapleEngine::new(common.clone()), &worked));
    awards.extend(fold(
        "dx",
        &DxEngine::new(config.resolved_home_country(), common.clone()),
        &worked,
    ));
    awards.extend(fold("pfx", &PfxEngine::new(common.clone()), &worked));
    awards.extend(fold("triple_key", &TripleKeyEngine::new(common.clone()), &worked));
    awards.extend(fold(
        "rag_chew",
        &RagChewEngine::new(common.clone(), overlapping_seqs(&contacts)),
        &worked,
    ));
    awards.extend(fold("wac", &WacEngine::new(common), &worked));

    info!(
        total = summary.total,
        skipped = summary.skipped,
        matched = summary.matched,
        unique_members = summary.unique_members,
        low_confidence = summary.low_confidence_resolutions,
        "award computation finished"
    );
    Ok(aggregate(awards, summary, diagnostics))
}

fn fold<E: AwardEngine>(name: &str, engine: &E, stream: &[Worked<'_>]) -> Vec<AwardProgress> {
    let out = run_engine(engine, stream);
    debug!(engine = name, results = out.len(), "engine folded");
    out
}

/// Moment the log itself reaches the Centurion threshold, if it does.
fn log_centurion_moment(
    worked: &[Worked<'_>],
    tier_engine: &TierEngine,
    common: &CommonRules,
    config: &EngineConfig,
) -> Option<NaiveDateTime> {
    let threshold = usize::try_from(config.thresholds.centurion).ok()?;
    let mut seen = HashSet::<MemberNumber>::new();
    for w in worked {
        if tier_engine.eligibility().check(w.contact, common).is_err() {
            continue;
        }
        if seen.insert(w.member_number()) && seen.len() == threshold {
            return Some(w.contact.at);
        }
    }
    None
}
