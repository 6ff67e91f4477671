//! ADIF reader producing [`ContactDraft`]s.
//!
//! Only the fields the award engines consume are picked up. Everything else
//! in a record is ignored, and so is the header up to `<EOH>`.

use std::sync::OnceLock;

use hashbrown::HashMap;
use regex::Regex;
use tracing::debug;

use crate::contact::ContactDraft;

const TOKEN_FIELDS: [&str; 2] = ["skcc", "app_skcc"];
const MY_TOKEN_FIELDS: [&str; 2] = ["my_skcc", "app_my_skcc"];
const KEY_FIELDS: [&str; 5] = [
    "key",
    "app_skcc_key",
    "skcc_key",
    "app_key",
    "app_skcclogger_keytype",
];
const CLUB_SIG: &str = "SKCC";

fn field_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^<([A-Za-z0-9_]+):(\d+)(?::[A-Za-z])?>").expect("static pattern")
    })
}

fn comment_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bSKCC\b\s*[:#-]?\s*(\d+[A-Z]?)").expect("static pattern")
    })
}

/// Membership token written into a free-text comment, e.g. `SKCC: 14947C`.
pub fn token_from_comment(comment: &str) -> Option<String> {
    let upper = comment.to_ascii_uppercase();
    comment_token()
        .captures(&upper)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Default)]
struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.get(n)).map(str::to_string)
    }

    fn sig_info(&self, sig: &str, info: &str) -> Option<String> {
        let sig_ok = self.get(sig).is_none_or(|s| s.eq_ignore_ascii_case(CLUB_SIG));
        if sig_ok { self.get(info).map(str::to_string) } else { None }
    }

    fn into_draft(self) -> ContactDraft {
        let comment = self.first_of(&["comment", "notes"]);
        let member_token = self
            .first_of(&TOKEN_FIELDS)
            .or_else(|| self.sig_info("sig", "sig_info"))
            .or_else(|| comment.as_deref().and_then(token_from_comment));
        ContactDraft {
            call: self.get("call").unwrap_or_default().to_string(),
            qso_date: self.get("qso_date").unwrap_or_default().to_string(),
            time_on: self.first_of(&["time_on"]),
            time_off: self.first_of(&["time_off"]),
            band: self.first_of(&["band"]),
            freq_mhz: self.first_of(&["freq"]),
            mode: self.first_of(&["mode"]),
            member_token,
            my_token: self
                .first_of(&MY_TOKEN_FIELDS)
                .or_else(|| self.sig_info("my_sig", "my_sig_info")),
            tx_power: self.first_of(&["tx_pwr"]),
            key_type: self.first_of(&KEY_FIELDS),
            comment,
            duration_minutes: None,
            multi_station: false,
        }
    }
}

fn starts_with_tag(text: &str, tag: &str) -> bool {
    text.get(..tag.len()).is_some_and(|t| t.eq_ignore_ascii_case(tag))
}

fn ceil_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx.min(text.len())
}

/// Parses one ADIF document.
///
/// Records end at `<EOR>`; a trailing record without one is kept. Field
/// names are case-insensitive and blank values count as absent. Records with
/// no fields at all are dropped; records missing a call are kept so that
/// validation can report them.
pub fn parse_adif(content: &str) -> Vec<ContactDraft> {
    let mut drafts = Vec::new();
    let mut current = Record::default();
    let mut idx = 0;

    while let Some(offset) = content[idx..].find('<') {
        let pos = idx + offset;
        let rest = &content[pos..];
        if starts_with_tag(rest, "<eor>") {
            if !current.fields.is_empty() {
                drafts.push(std::mem::take(&mut current).into_draft());
            }
            idx = pos + 5;
            continue;
        }
        if starts_with_tag(rest, "<eoh>") {
            current = Record::default();
            idx = pos + 5;
            continue;
        }
        let Some(caps) = field_tag().captures(rest) else {
            idx = pos + 1;
            continue;
        };
        let (Some(tag), Some(name), Some(len)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            idx = pos + 1;
            continue;
        };
        let len: usize = len.as_str().parse().unwrap_or(0);
        let start = pos + tag.end();
        let end = ceil_boundary(content, start.saturating_add(len));
        let value = content[start..end].trim();
        if !value.is_empty() {
            current
                .fields
                .insert(name.as_str().to_ascii_lowercase(), value.to_string());
        }
        idx = end;
    }

    if current.get("call").is_some() {
        drafts.push(current.into_draft());
    }
    debug!(records = drafts.len(), "parsed ADIF document");
    drafts
}

/// Parses several documents and concatenates their records in order.
pub fn parse_adif_files<S: AsRef<str>>(contents: &[S]) -> Vec<ContactDraft> {
    contents
        .iter()
        .flat_map(|c| parse_adif(c.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "Exported log <ADIF_VER:5>3.1.4 <EOH>\n\
        <CALL:5>K3WWP <QSO_DATE:8>20200105 <TIME_ON:4>1200 <BAND:3>40M \
        <MODE:2>CW <SKCC:4>660S <TX_PWR:1>5 <APP_SKCCLOGGER_KEYTYPE:3>BUG <eor>\n\
        <call:6>VE3ABC <qso_date:8>20200106 <freq:6>14.050 <mode:2>CW \
        <comment:15>SKCC: 14947C hi <EOR>\n\
        <CALL:4>W1AW <QSO_DATE:8>20200107 <MODE:2>CW";

    #[test]
    fn reads_fields_and_trailing_record() {
        let drafts = parse_adif(LOG);
        assert_eq!(drafts.len(), 3);

        let first = &drafts[0];
        assert_eq!(first.call, "K3WWP");
        assert_eq!(first.qso_date, "20200105");
        assert_eq!(first.band.as_deref(), Some("40M"));
        assert_eq!(first.member_token.as_deref(), Some("660S"));
        assert_eq!(first.key_type.as_deref(), Some("BUG"));
        assert_eq!(first.tx_power.as_deref(), Some("5"));

        let second = &drafts[1];
        assert_eq!(second.freq_mhz.as_deref(), Some("14.050"));
        assert_eq!(second.member_token.as_deref(), Some("14947C"));

        assert_eq!(drafts[2].call, "W1AW");
    }

    #[test]
    fn header_fields_do_not_leak() {
        let drafts = parse_adif("<CALL:4>N0NE <EOH><CALL:4>W1AW <QSO_DATE:8>20200107 <EOR>");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].call, "W1AW");
    }

    #[test]
    fn sig_info_only_for_club() {
        let drafts = parse_adif(
            "<CALL:4>W1AW <SIG:4>POTA <SIG_INFO:6>K-0001 <EOR>\
             <CALL:4>K1AB <SIG:4>skcc <SIG_INFO:4>123T <MY_SIG_INFO:5>9999C <EOR>",
        );
        assert_eq!(drafts[0].member_token, None);
        assert_eq!(drafts[1].member_token.as_deref(), Some("123T"));
        assert_eq!(drafts[1].my_token.as_deref(), Some("9999C"));
    }

    #[test]
    fn comment_token_pattern() {
        assert_eq!(token_from_comment("tnx skcc#1234t").as_deref(), Some("1234T"));
        assert_eq!(token_from_comment("skcclogger"), None);
    }

    #[test]
    fn multiple_documents_concatenate() {
        let docs = ["<CALL:4>W1AW <EOR>", "<CALL:4>K1AB <EOR>"];
        let drafts = parse_adif_files(&docs);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].call, "K1AB");
    }
}
