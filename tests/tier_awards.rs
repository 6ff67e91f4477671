use chrono::NaiveDate;

use awardlog::{
    compute::compute,
    config::{ConfigError, EngineConfig, LowConfidencePolicy, TierThresholds},
    contact::ContactDraft,
    report::{AwardReport, Diagnostic},
    roster::{Member, Roster},
    types::Tier,
};

fn member(number: u32, call: &str, tier: Tier) -> Member {
    Member {
        number,
        call: call.to_string(),
        tier,
        join_date: None,
        state: None,
        country: None,
    }
}

fn draft(call: &str, date: &str, time: &str, token: Option<&str>) -> ContactDraft {
    ContactDraft {
        call: call.to_string(),
        qso_date: date.to_string(),
        time_on: Some(time.to_string()),
        band: Some("40M".to_string()),
        mode: Some("CW".to_string()),
        member_token: token.map(str::to_string),
        ..ContactDraft::default()
    }
}

fn run(drafts: &[ContactDraft], members: Vec<Member>, config: &EngineConfig) -> AwardReport {
    let roster = Roster::new(members, &config.normalizer());
    compute(drafts, &roster, config).expect("compute")
}

fn own_centurion_config() -> EngineConfig {
    EngineConfig {
        own_centurion_date: NaiveDate::from_ymd_opt(2000, 1, 1),
        ..EngineConfig::default()
    }
}

fn small_thresholds() -> EngineConfig {
    EngineConfig {
        thresholds: TierThresholds {
            centurion: 1,
            tribune: 1,
            senator: 1,
            senator_prerequisite_multiple: 2,
        },
        ..EngineConfig::default()
    }
}

#[test]
fn centurion_counts_each_member_once_with_first_contact() {
    let config = EngineConfig::default();
    let drafts = vec![
        draft("K1AA", "20200301", "1200", Some("1C")),
        draft("K1AA", "20200101", "1200", Some("1C")),
        draft("K1AA/P", "20200201", "1200", Some("1C")),
    ];
    let report = run(&drafts, vec![member(1, "K1AA", Tier::Centurion)], &config);

    let centurion = report.find("Centurion", None).expect("centurion");
    assert_eq!(centurion.value, 1);
    assert_eq!(centurion.credited.len(), 1);
    assert_eq!(centurion.credited[0].seq, 1);
    assert_eq!(centurion.credited_members(), vec![1]);
    assert_eq!(report.summary.matched, 3);
    assert_eq!(report.summary.unique_members, 1);
}

#[test]
fn senator_stays_locked_one_short_of_prerequisite() {
    let config = small_thresholds();
    let members = vec![member(1, "K1AA", Tier::Senator), member(2, "K2BB", Tier::Senator)];

    let short = run(&[draft("K1AA", "20200101", "1200", Some("1S"))], members.clone(), &config);
    let senator = short.find("Senator", None).expect("senator");
    assert!(senator.locked);
    assert_eq!(senator.value, 0);
    assert!(senator.achieved.is_none());
    assert_eq!(senator.breakdown.get("tribune_count"), Some(&1));

    let exact = run(
        &[
            draft("K1AA", "20200101", "1200", Some("1S")),
            draft("K2BB", "20200102", "1200", Some("2S")),
        ],
        members,
        &config,
    );
    let senator = exact.find("Senator", None).expect("senator");
    assert!(!senator.locked);
    assert_eq!(senator.value, 1);
    assert_eq!(senator.credited_members(), vec![2]);
    assert_eq!(senator.achieved.as_ref().map(|r| r.label.as_str()), Some("Senator"));
}

#[test]
fn senator_ignores_contacts_before_its_window() {
    let config = small_thresholds();
    let members = vec![
        member(1, "K1AA", Tier::Senator),
        member(2, "K2BB", Tier::Senator),
        member(3, "K3CC", Tier::Senator),
    ];
    let report = run(
        &[
            draft("K1AA", "20120101", "1200", Some("1S")),
            draft("K2BB", "20120102", "1200", Some("2S")),
            draft("K3CC", "20130801", "0000", Some("3S")),
        ],
        members,
        &config,
    );
    let senator = report.find("Senator", None).expect("senator");
    assert_eq!(senator.credited_members(), vec![3]);
}

#[test]
fn tribune_needs_own_centurion() {
    let drafts = vec![
        draft("K1AA", "20200101", "1200", Some("1C")),
        draft("K2BB", "20200102", "1200", Some("2T")),
    ];
    let members = vec![member(1, "K1AA", Tier::Centurion), member(2, "K2BB", Tier::Tribune)];

    let without = run(&drafts, members.clone(), &EngineConfig::default());
    assert_eq!(without.find("Tribune", None).expect("tribune").value, 0);
    assert_eq!(without.find("Centurion", None).expect("centurion").value, 2);

    let with = run(&drafts, members.clone(), &own_centurion_config());
    let tribune = with.find("Tribune", None).expect("tribune");
    assert_eq!(tribune.value, 2);
    assert_eq!(tribune.breakdown.get("C"), Some(&1));
    assert_eq!(tribune.breakdown.get("T"), Some(&1));

    let own_token: Vec<ContactDraft> = drafts
        .iter()
        .cloned()
        .map(|d| ContactDraft {
            my_token: Some("9000C".to_string()),
            ..d
        })
        .collect();
    let via_token = run(&own_token, members, &EngineConfig::default());
    assert_eq!(via_token.find("Tribune", None).expect("tribune").value, 2);
}

#[test]
fn plain_member_token_is_not_promoted_by_current_roster() {
    let drafts = vec![draft("K4XYZ", "20200101", "1200", Some("29650"))];
    let members = vec![member(29650, "K4XYZ", Tier::Tribune)];

    let enforced = run(&drafts, members.clone(), &own_centurion_config());
    assert_eq!(enforced.find("Centurion", None).expect("centurion").value, 1);
    assert_eq!(enforced.find("Tribune", None).expect("tribune").value, 0);

    let legacy = EngineConfig {
        enforce_tier_rules: false,
        ..EngineConfig::default()
    };
    let report = run(&drafts, members, &legacy);
    assert_eq!(report.find("Tribune", None).expect("tribune").value, 1);
}

#[test]
fn roster_fallback_can_be_excluded_from_tier_pools() {
    let drafts = vec![draft("K1AA", "20200101", "1200", None)];
    let members = vec![member(1, "K1AA", Tier::Tribune)];

    let fallback = run(&drafts, members.clone(), &own_centurion_config());
    assert_eq!(fallback.find("Tribune", None).expect("tribune").value, 1);
    assert_eq!(fallback.summary.low_confidence_resolutions, 1);
    assert!(
        fallback
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::LowConfidenceTier { tier: Tier::Tribune, .. }))
    );

    let exclude = EngineConfig {
        low_confidence: LowConfidencePolicy::Exclude,
        ..own_centurion_config()
    };
    let excluded = run(&drafts, members, &exclude);
    assert_eq!(excluded.find("Tribune", None).expect("tribune").value, 0);
    assert_eq!(excluded.find("Centurion", None).expect("centurion").value, 1);
}

#[test]
fn contact_before_join_date_credits_nothing() {
    let mut joined = member(1, "K1AA", Tier::Centurion);
    joined.join_date = NaiveDate::from_ymd_opt(2021, 1, 1);
    let report = run(
        &[draft("K1AA", "20200101", "1200", Some("1C"))],
        vec![joined],
        &EngineConfig::default(),
    );
    assert_eq!(report.find("Centurion", None).expect("centurion").value, 0);
    assert_eq!(report.summary.before_join, 1);
    assert!(
        report
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::BeforeJoinDate { seq: 0, .. }))
    );
}

#[test]
fn excluded_and_non_cw_contacts_do_not_count() {
    let members = vec![member(1, "K9SKC", Tier::Senator), member(2, "K2BB", Tier::Centurion)];
    let mut phone = draft("K2BB", "20200101", "1300", Some("2C"));
    phone.mode = Some("SSB".to_string());
    let report = run(
        &[draft("K9SKC", "20200101", "1200", Some("1S")), phone],
        members,
        &EngineConfig::default(),
    );
    assert_eq!(report.find("Centurion", None).expect("centurion").value, 0);
}

#[test]
fn key_enforcement_filters_devices() {
    let config = EngineConfig {
        enforce_key_type: true,
        treat_missing_key_as_valid: false,
        allowed_key_types: vec![awardlog::types::KeyType::Straight],
        ..EngineConfig::default()
    };
    let mut straight = draft("K1AA", "20200101", "1200", Some("1C"));
    straight.key_type = Some("Straight key".to_string());
    let mut bug = draft("K2BB", "20200101", "1300", Some("2C"));
    bug.key_type = Some("Vibroplex bug".to_string());
    let missing = draft("K3CC", "20200101", "1400", Some("3C"));

    let report = run(
        &[straight, bug, missing],
        vec![
            member(1, "K1AA", Tier::Centurion),
            member(2, "K2BB", Tier::Centurion),
            member(3, "K3CC", Tier::Centurion),
        ],
        &config,
    );
    assert_eq!(
        report.find("Centurion", None).expect("centurion").credited_members(),
        vec![1]
    );
}

#[test]
fn invalid_config_is_the_only_error() {
    let config = EngineConfig {
        qrp_max_watts: 0.0,
        ..EngineConfig::default()
    };
    let roster = Roster::default();
    let err = compute(&[], &roster, &config).expect_err("invalid config");
    assert!(matches!(err, ConfigError::Invalid(_)));
}
