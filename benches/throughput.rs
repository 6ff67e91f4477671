use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use awardlog::{
    adif::parse_adif,
    compute::compute,
    config::EngineConfig,
    contact::ContactDraft,
    roster::{Member, Roster},
    types::Tier,
};

const PREFIXES: [&str; 8] = ["K", "W", "N", "VE", "DL", "G", "JA", "VK"];
const BANDS: [&str; 5] = ["80M", "40M", "30M", "20M", "15M"];
const TIERS: [&str; 4] = ["", "C", "T", "S"];

fn call(i: u32) -> String {
    let prefix = PREFIXES[(i % PREFIXES.len() as u32) as usize];
    let suffix: String = (0..3)
        .map(|k| char::from(b'A' + ((i / 8 / 26u32.pow(k)) % 26) as u8))
        .collect();
    format!("{prefix}{}{suffix}", i % 10)
}

fn roster(members: u32, config: &EngineConfig) -> Roster {
    let list = (0..members)
        .map(|i| Member {
            number: i + 1,
            call: call(i),
            tier: Tier::Tribune,
            join_date: None,
            state: None,
            country: None,
        })
        .collect();
    Roster::new(list, &config.normalizer())
}

fn draft(i: u32, members: u32) -> ContactDraft {
    let who = (i * 7919) % members;
    let day = i % 3000;
    let date = chrono::NaiveDate::from_ymd_opt(2014, 1, 1)
        .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(day))))
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_default();
    let minute = (i * 13) % 1380;
    ContactDraft {
        call: call(who),
        qso_date: date,
        time_on: Some(format!("{:02}{:02}", minute / 60, minute % 60)),
        time_off: Some(format!("{:02}{:02}", (minute + 35) / 60, (minute + 35) % 60)),
        band: Some(BANDS[(i % BANDS.len() as u32) as usize].to_string()),
        mode: Some("CW".to_string()),
        member_token: Some(format!("{}{}", who + 1, TIERS[(i % 4) as usize])),
        my_token: Some("4242T".to_string()),
        key_type: Some(if i % 2 == 0 { "straight" } else { "bug" }.to_string()),
        ..ContactDraft::default()
    }
}

fn bench_compute(c: &mut Criterion) {
    let config = EngineConfig::default();
    let members = 20_000;
    let roster = roster(members, &config);

    let mut group = c.benchmark_group("compute");
    for n in [1_000u32, 10_000, 50_000] {
        let drafts: Vec<ContactDraft> = (0..n).map(|i| draft(i, members)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &drafts, |b, drafts| {
            b.iter(|| compute(drafts, &roster, &config).expect("compute"));
        });
    }
    group.finish();
}

fn bench_adif_parse(c: &mut Criterion) {
    let text: String = (0..10_000u32)
        .map(|i| {
            let call = call(i);
            format!(
                "<CALL:{}>{call} <QSO_DATE:8>20200101 <TIME_ON:4>1200 <BAND:3>40M <MODE:2>CW <SKCC:4>{:04} <EOR>\n",
                call.len(),
                i % 10_000
            )
        })
        .collect();
    c.bench_function("adif_parse_10k", |b| {
        b.iter(|| parse_adif(&text));
    });
}

criterion_group!(benches, bench_compute, bench_adif_parse);
criterion_main!(benches);
