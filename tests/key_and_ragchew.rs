use awardlog::{
    compute::compute,
    config::EngineConfig,
    contact::ContactDraft,
    report::AwardReport,
    roster::{Member, Roster},
    types::Tier,
};

fn member(number: u32, call: &str) -> Member {
    Member {
        number,
        call: call.to_string(),
        tier: Tier::Centurion,
        join_date: None,
        state: None,
        country: None,
    }
}

fn draft(call: &str, date: &str, on: &str, off: &str) -> ContactDraft {
    ContactDraft {
        call: call.to_string(),
        qso_date: date.to_string(),
        time_on: Some(on.to_string()),
        time_off: Some(off.to_string()),
        band: Some("40M".to_string()),
        mode: Some("CW".to_string()),
        ..ContactDraft::default()
    }
}

fn keyed(call: &str, date: &str, key: &str) -> ContactDraft {
    ContactDraft {
        key_type: Some(key.to_string()),
        ..draft(call, date, "1200", "1205")
    }
}

fn run(drafts: &[ContactDraft], members: Vec<Member>) -> AwardReport {
    let config = EngineConfig::default();
    let roster = Roster::new(members, &config.normalizer());
    compute(drafts, &roster, &config).expect("compute")
}

fn rag_chew_minutes(report: &AwardReport) -> u64 {
    report.find("Rag Chew", None).expect("rag chew").value
}

#[test]
fn back_to_back_contacts_are_one_conversation() {
    let report = run(
        &[
            draft("K1AA", "20200101", "1200", "1235"),
            draft("K1AA", "20200101", "1236", "1320"),
        ],
        vec![member(1, "K1AA")],
    );
    let rag = report.find("Rag Chew", None).expect("rag chew");
    assert_eq!(rag.value, 44);
    assert_eq!(rag.breakdown.get("conversations"), Some(&1));
    assert_eq!(rag.credited.len(), 1);
    assert_eq!(rag.credited[0].seq, 1);
}

#[test]
fn separate_runs_with_the_same_member_both_count() {
    let report = run(
        &[
            draft("K1AA", "20200101", "1200", "1240"),
            draft("K2BB", "20200101", "1300", "1335"),
            draft("K1AA", "20200101", "1400", "1430"),
        ],
        vec![member(1, "K1AA"), member(2, "K2BB")],
    );
    assert_eq!(rag_chew_minutes(&report), 40 + 35 + 30);
}

#[test]
fn overlapping_contacts_need_forty_minutes() {
    let short = run(
        &[
            draft("K1AA", "20200101", "1200", "1235"),
            draft("K2BB", "20200101", "1210", "1245"),
        ],
        vec![member(1, "K1AA"), member(2, "K2BB")],
    );
    assert_eq!(rag_chew_minutes(&short), 0);

    let long = run(
        &[
            draft("K1AA", "20200101", "1200", "1245"),
            draft("K2BB", "20200101", "1210", "1250"),
        ],
        vec![member(1, "K1AA"), member(2, "K2BB")],
    );
    assert_eq!(rag_chew_minutes(&long), 85);
}

#[test]
fn untimed_contacts_with_durations_do_not_overlap() {
    let untimed = |call: &str| ContactDraft {
        call: call.to_string(),
        qso_date: "20200101".to_string(),
        band: Some("40M".to_string()),
        mode: Some("CW".to_string()),
        duration_minutes: Some(35),
        ..ContactDraft::default()
    };
    let report = run(
        &[untimed("K1AA"), untimed("K2BB")],
        vec![member(1, "K1AA"), member(2, "K2BB")],
    );
    assert_eq!(rag_chew_minutes(&report), 70);
}

#[test]
fn multi_station_flag_raises_the_minimum() {
    let mut flagged = draft("K1AA", "20200101", "1200", "1235");
    flagged.multi_station = true;
    let report = run(&[flagged], vec![member(1, "K1AA")]);
    assert_eq!(rag_chew_minutes(&report), 0);
}

#[test]
fn short_and_early_contacts_do_not_count() {
    let report = run(
        &[
            draft("K1AA", "20200101", "1200", "1229"),
            draft("K2BB", "20130630", "1200", "1300"),
        ],
        vec![member(1, "K1AA"), member(2, "K2BB")],
    );
    assert_eq!(rag_chew_minutes(&report), 0);
}

#[test]
fn conversation_across_midnight() {
    let report = run(
        &[draft("K1AA", "20200101", "2340", "0020")],
        vec![member(1, "K1AA")],
    );
    assert_eq!(rag_chew_minutes(&report), 40);
    assert_eq!(
        report.find("Rag Chew", Some("40M")).expect("40m").value,
        40
    );
}

#[test]
fn triple_key_pools_are_independent() {
    let report = run(
        &[
            keyed("K1AA", "20200101", "straight key"),
            keyed("K1AA", "20200102", "Vibroplex bug"),
            keyed("K2BB", "20200103", "cootie"),
            keyed("K3CC", "20200104", "paddles"),
            keyed("K4DD", "20180101", "straight"),
        ],
        vec![member(1, "K1AA"), member(2, "K2BB"), member(3, "K3CC"), member(4, "K4DD")],
    );

    let overall = report.find("Triple Key", None).expect("overall");
    assert_eq!(overall.value, 3);
    assert_eq!(overall.target, 300);
    assert_eq!(overall.breakdown.get("straight"), Some(&1));
    assert_eq!(overall.breakdown.get("bug"), Some(&1));
    assert_eq!(overall.breakdown.get("sideswiper"), Some(&1));

    let straight = report.find("Triple Key", Some("straight")).expect("straight");
    assert_eq!(straight.credited_members(), vec![1]);
}

#[test]
fn key_type_is_read_from_comment() {
    let mut draft = keyed("K1AA", "20200101", "");
    draft.key_type = None;
    draft.comment = Some("nice sideswiper fist".to_string());
    let report = run(&[draft], vec![member(1, "K1AA")]);
    assert_eq!(
        report.find("Triple Key", Some("sideswiper")).expect("sideswiper").value,
        1
    );
}

#[test]
fn prosign_in_comment_is_not_a_straight_key() {
    let mut draft = keyed("K1AA", "20200101", "");
    draft.key_type = None;
    draft.comment = Some("tnx fer QSO 73 SK".to_string());
    let report = run(&[draft], vec![member(1, "K1AA")]);
    assert_eq!(
        report.find("Triple Key", Some("straight")).expect("straight").value,
        0
    );
    assert_eq!(report.find("Triple Key", None).expect("overall").value, 0);
}

#[test]
fn explicit_sk_key_field_is_a_straight_key() {
    let report = run(&[keyed("K1AA", "20200101", "SK")], vec![member(1, "K1AA")]);
    assert_eq!(
        report.find("Triple Key", Some("straight")).expect("straight").value,
        1
    );
}
