//! Contact records: the raw draft a log parser yields and the validated,
//! immutable form the award engines consume.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    callsign::Normalizer,
    types::{Band, ContactSeq, KeyType, MemberNumber, Tier},
};

/// One logged contact as read from a log file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDraft {
    /// Counterparty call as logged.
    pub call: String,
    /// UTC date, `YYYYMMDD` or `YYYY-MM-DD`.
    pub qso_date: String,
    /// UTC start time, `HHMM` or `HHMMSS`.
    pub time_on: Option<String>,
    /// UTC end time, `HHMM` or `HHMMSS`.
    pub time_off: Option<String>,
    /// Band label such as `40M`.
    pub band: Option<String>,
    /// Frequency in MHz.
    pub freq_mhz: Option<String>,
    /// Operating mode.
    pub mode: Option<String>,
    /// Counterparty membership token as recorded, e.g. `660S`.
    pub member_token: Option<String>,
    /// The logging station's own token as recorded.
    pub my_token: Option<String>,
    /// Transmit power in watts.
    pub tx_power: Option<String>,
    /// Free-text sending device.
    pub key_type: Option<String>,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Explicit contact length in minutes.
    pub duration_minutes: Option<u32>,
    /// Logged as part of a multi-station conversation.
    pub multi_station: bool,
}

/// Membership number plus the rank suffix recorded with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberToken {
    /// Membership number.
    pub number: MemberNumber,
    /// Rank at the time the token was recorded.
    pub tier: Tier,
}

impl MemberToken {
    /// Parses `digits[C|T|S][x<digits>]`, case-insensitive.
    ///
    /// The trailing `x<digits>` endorsement marker (`1234Tx3`) is accepted
    /// and ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim().to_ascii_uppercase();
        let digits_end = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        if digits_end == 0 {
            return None;
        }
        let number: MemberNumber = text[..digits_end].parse().ok()?;
        let mut rest = text[digits_end..].chars().peekable();

        let tier = match rest.peek().copied() {
            Some(c) if c != 'X' => {
                rest.next();
                Tier::from_suffix(c)?
            }
            _ => Tier::None,
        };

        match rest.next() {
            None => {}
            Some('X') => {
                let tail: String = rest.collect();
                if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
            }
            Some(_) => return None,
        }
        Some(Self { number, tier })
    }
}

/// The counterparty token field after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenField {
    /// Parsed token.
    Present(MemberToken),
    /// No token recorded.
    Missing,
    /// Token text that does not parse.
    Unparseable(String),
}

impl TokenField {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|t| !t.is_empty()) {
            None => Self::Missing,
            Some(text) => match MemberToken::parse(text) {
                Some(token) => Self::Present(token),
                None => Self::Unparseable(text.to_string()),
            },
        }
    }

    /// Parsed token, if any.
    pub fn token(&self) -> Option<MemberToken> {
        match self {
            Self::Present(token) => Some(*token),
            _ => None,
        }
    }
}

/// Why a draft was not turned into a [`Contact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No counterparty call.
    MissingCall,
    /// No date.
    MissingDate,
    /// Date text that does not parse.
    BadDate(String),
}

/// Validated, immutable contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Input position, used as the tie-break for equal timestamps.
    pub seq: ContactSeq,
    /// Counterparty call as logged.
    pub call_raw: String,
    /// Normalized counterparty call.
    pub call: String,
    /// Normalization could not pick a base call.
    pub call_ambiguous: bool,
    /// Start of the contact, UTC. Midnight when no time was logged.
    pub at: NaiveDateTime,
    /// End of the contact. Only set when a start time was logged.
    pub end: Option<NaiveDateTime>,
    /// Band, from the label or else from the frequency.
    pub band: Option<Band>,
    /// Band label that did not parse, kept for diagnostics.
    pub band_unrecognised: Option<String>,
    /// Operating mode, upper-cased.
    pub mode: Option<String>,
    /// Transmit power in watts.
    pub power_watts: Option<f64>,
    /// Low-power contact by power, comment or mode marker.
    pub qrp: bool,
    /// Sending device.
    pub key: Option<KeyType>,
    /// Counterparty token.
    pub token: TokenField,
    /// Own token, when recorded and parseable.
    pub my_token: Option<MemberToken>,
    /// Length in minutes.
    pub duration_minutes: Option<u32>,
    /// Flagged multi-station in the log.
    pub multi_station: bool,
}

impl Contact {
    /// Validates `draft` into a contact.
    pub fn from_draft(
        draft: &ContactDraft,
        seq: ContactSeq,
        normalizer: &Normalizer,
        qrp_max_watts: f64,
    ) -> Result<Self, SkipReason> {
        if draft.call.trim().is_empty() {
            return Err(SkipReason::MissingCall);
        }
        let date_text = draft.qso_date.trim();
        if date_text.is_empty() {
            return Err(SkipReason::MissingDate);
        }
        let date = parse_date(date_text).ok_or_else(|| SkipReason::BadDate(date_text.to_string()))?;

        let time_on = draft.time_on.as_deref().and_then(parse_time);
        let at = date.and_time(time_on.unwrap_or(NaiveTime::MIN));

        let duration_minutes = draft.duration_minutes.or_else(|| {
            let on = time_on?;
            let off = draft.time_off.as_deref().and_then(parse_time)?;
            let mut span = off - on;
            if span < Duration::zero() {
                span += Duration::days(1);
            }
            u32::try_from(span.num_minutes()).ok()
        });
        let end = time_on
            .and(duration_minutes)
            .map(|m| at + Duration::minutes(i64::from(m)));

        let band_label = draft.band.as_deref().map(str::trim).filter(|b| !b.is_empty());
        let band = band_label.and_then(Band::from_label).or_else(|| {
            draft
                .freq_mhz
                .as_deref()
                .and_then(|f| f.trim().parse::<f64>().ok())
                .and_then(Band::from_freq_mhz)
        });
        let band_unrecognised = match (band, band_label) {
            (None, Some(label)) => Some(label.to_string()),
            _ => None,
        };

        let mode = draft
            .mode
            .as_deref()
            .map(|m| m.trim().to_ascii_uppercase())
            .filter(|m| !m.is_empty());
        let power_watts = draft.tx_power.as_deref().and_then(parse_watts);
        let comment_upper = draft.comment.as_deref().map(str::to_ascii_uppercase);
        let qrp = power_watts.is_some_and(|w| w <= qrp_max_watts)
            || comment_upper.as_deref().is_some_and(|c| c.contains("QRP"))
            || mode.as_deref().is_some_and(|m| m.contains("QRP"));

        let key = draft
            .key_type
            .as_deref()
            .and_then(KeyType::detect)
            .or_else(|| {
                draft
                    .comment
                    .as_deref()
                    .and_then(KeyType::detect_in_comment)
                    .filter(|k| *k != KeyType::Other)
            });

        let normalized = normalizer.normalize(&draft.call);
        Ok(Self {
            seq,
            call_raw: draft.call.trim().to_string(),
            call: normalized.call,
            call_ambiguous: normalized.ambiguous,
            at,
            end,
            band,
            band_unrecognised,
            mode,
            power_watts,
            qrp,
            key,
            token: TokenField::from_raw(draft.member_token.as_deref()),
            my_token: draft.my_token.as_deref().and_then(MemberToken::parse),
            duration_minutes,
            multi_station: draft.multi_station,
        })
    }

    /// UTC calendar date.
    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    /// True when two contacts' time spans overlap.
    pub fn overlaps(&self, other: &Contact) -> bool {
        match (self.end, other.end) {
            (Some(a_end), Some(b_end)) => self.at < b_end && other.at < a_end,
            _ => false,
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let digits: String = text.trim().chars().filter(|c| *c != ':').collect();
    match digits.len() {
        4 => NaiveTime::parse_from_str(&digits, "%H%M").ok(),
        6 => NaiveTime::parse_from_str(&digits, "%H%M%S").ok(),
        _ => None,
    }
}

fn parse_watts(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches(['W', 'w']).trim();
    trimmed.parse::<f64>().ok().filter(|w| w.is_finite() && *w >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_grammar() {
        assert_eq!(
            MemberToken::parse("660S"),
            Some(MemberToken { number: 660, tier: Tier::Senator })
        );
        assert_eq!(
            MemberToken::parse("29650"),
            Some(MemberToken { number: 29650, tier: Tier::None })
        );
        assert_eq!(
            MemberToken::parse(" 1234tx3 "),
            Some(MemberToken { number: 1234, tier: Tier::Tribune })
        );
        assert_eq!(MemberToken::parse("1234Q"), None);
        assert_eq!(MemberToken::parse("C1234"), None);
        assert_eq!(MemberToken::parse("1234Cx"), None);
    }

    #[test]
    fn duration_wraps_midnight() {
        let draft = ContactDraft {
            call: "W1ABC".into(),
            qso_date: "20200101".into(),
            time_on: Some("2350".into()),
            time_off: Some("0030".into()),
            ..ContactDraft::default()
        };
        let contact = Contact::from_draft(&draft, 0, &Normalizer::new(), 5.0).expect("valid");
        assert_eq!(contact.duration_minutes, Some(40));
    }

    #[test]
    fn untimed_contact_has_no_span() {
        let draft = ContactDraft {
            call: "W1ABC".into(),
            qso_date: "20200101".into(),
            duration_minutes: Some(35),
            ..ContactDraft::default()
        };
        let contact = Contact::from_draft(&draft, 0, &Normalizer::new(), 5.0).expect("valid");
        assert_eq!(contact.duration_minutes, Some(35));
        assert_eq!(contact.end, None);
    }

    #[test]
    fn missing_date_is_skipped() {
        let draft = ContactDraft {
            call: "W1ABC".into(),
            ..ContactDraft::default()
        };
        assert_eq!(
            Contact::from_draft(&draft, 0, &Normalizer::new(), 5.0),
            Err(SkipReason::MissingDate)
        );
    }
}
