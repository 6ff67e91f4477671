//! Shared primitive ids and award-related enums.

use serde::{Deserialize, Serialize};

/// Club membership number.
pub type MemberNumber = u32;
/// Input-order sequence assigned to each contact at ingestion.
pub type ContactSeq = u64;

/// Amateur band bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    /// 160 meters.
    B160m,
    /// 80 meters.
    B80m,
    /// 60 meters.
    B60m,
    /// 40 meters.
    B40m,
    /// 30 meters.
    B30m,
    /// 20 meters.
    B20m,
    /// 17 meters.
    B17m,
    /// 15 meters.
    B15m,
    /// 12 meters.
    B12m,
    /// 10 meters.
    B10m,
    /// 6 meters.
    B6m,
    /// 2 meters.
    B2m,
}

/// The nine HF bands used by band-coverage endorsements.
pub const HF_AWARD_BANDS: [Band; 9] = [
    Band::B160m,
    Band::B80m,
    Band::B40m,
    Band::B30m,
    Band::B20m,
    Band::B17m,
    Band::B15m,
    Band::B12m,
    Band::B10m,
];

const BAND_EDGES_MHZ: [(Band, f64, f64); 12] = [
    (Band::B160m, 1.8, 2.0),
    (Band::B80m, 3.5, 4.0),
    (Band::B60m, 5.25, 5.45),
    (Band::B40m, 7.0, 7.3),
    (Band::B30m, 10.1, 10.15),
    (Band::B20m, 14.0, 14.35),
    (Band::B17m, 18.068, 18.168),
    (Band::B15m, 21.0, 21.45),
    (Band::B12m, 24.89, 24.99),
    (Band::B10m, 28.0, 29.7),
    (Band::B6m, 50.0, 54.0),
    (Band::B2m, 144.0, 148.0),
];

impl Band {
    /// Parses a log band label such as `"40M"` or `"40m"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase();
        let band = match label.as_str() {
            "160M" => Self::B160m,
            "80M" => Self::B80m,
            "60M" => Self::B60m,
            "40M" => Self::B40m,
            "30M" => Self::B30m,
            "20M" => Self::B20m,
            "17M" => Self::B17m,
            "15M" => Self::B15m,
            "12M" => Self::B12m,
            "10M" => Self::B10m,
            "6M" => Self::B6m,
            "2M" => Self::B2m,
            _ => return None,
        };
        Some(band)
    }

    /// Maps a frequency in MHz onto its band, if inside a known allocation.
    pub fn from_freq_mhz(mhz: f64) -> Option<Self> {
        BAND_EDGES_MHZ
            .iter()
            .find(|(_, lo, hi)| mhz >= *lo && mhz <= *hi)
            .map(|(band, _, _)| *band)
    }

    /// Upper-case log label, e.g. `"20M"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::B160m => "160M",
            Self::B80m => "80M",
            Self::B60m => "60M",
            Self::B40m => "40M",
            Self::B30m => "30M",
            Self::B20m => "20M",
            Self::B17m => "17M",
            Self::B15m => "15M",
            Self::B12m => "12M",
            Self::B10m => "10M",
            Self::B6m => "6M",
            Self::B2m => "2M",
        }
    }

    /// True for the nine bands counted by band-coverage endorsements.
    pub fn is_hf_award_band(self) -> bool {
        HF_AWARD_BANDS.contains(&self)
    }
}

/// Membership award rank, ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tier {
    /// Plain member without a rank suffix.
    #[default]
    None,
    /// `C` suffix.
    Centurion,
    /// `T` suffix.
    Tribune,
    /// `S` suffix.
    Senator,
}

impl Tier {
    /// Maps a single rank letter (`C`, `T`, `S`) onto a tier.
    pub fn from_suffix(suffix: char) -> Option<Self> {
        match suffix.to_ascii_uppercase() {
            'C' => Some(Self::Centurion),
            'T' => Some(Self::Tribune),
            'S' => Some(Self::Senator),
            _ => None,
        }
    }

    /// Rank letter, or `None` for [`Tier::None`].
    pub fn suffix(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Centurion => Some('C'),
            Self::Tribune => Some('T'),
            Self::Senator => Some('S'),
        }
    }
}

/// Sending device recorded for a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Straight key.
    Straight,
    /// Semi-automatic key (bug).
    Bug,
    /// Side-swiper (cootie).
    Sideswiper,
    /// Recorded, but not one of the recognised devices.
    Other,
}

impl KeyType {
    /// Devices that qualify for key-type awards.
    pub const MECHANICAL: [KeyType; 3] = [KeyType::Straight, KeyType::Bug, KeyType::Sideswiper];

    /// Detects a device from a free-text tag or comment.
    ///
    /// Matching is word-based and case-insensitive. Bug wording wins over
    /// side-swiper wording, which wins over straight-key wording, so a
    /// comment like "bug, used to run a straight key" reads as a bug.
    /// Returns `None` for blank input and [`KeyType::Other`] for text that
    /// names no known device.
    ///
    /// The abbreviations `SK` and `SS` are read here. Use
    /// [`KeyType::detect_in_comment`] for prose.
    pub fn detect(text: &str) -> Option<Self> {
        Self::detect_words(text, true)
    }

    /// Like [`KeyType::detect`], but ignores the `SK` and `SS`
    /// abbreviations, which are prosigns and contest names in comments.
    pub fn detect_in_comment(text: &str) -> Option<Self> {
        Self::detect_words(text, false)
    }

    fn detect_words(text: &str, abbreviations: bool) -> Option<Self> {
        let upper = text.to_ascii_uppercase();
        let words: Vec<&str> = upper
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return None;
        }
        let has = |w: &str| words.contains(&w);
        let pair = |a: &str, b: &str| words.windows(2).any(|p| p[0] == a && p[1] == b);

        let bug = has("BUG")
            || has("VIBRO")
            || has("VIBROPLEX")
            || has("SEMIAUTO")
            || has("SEMIAUTOMATIC")
            || pair("SEMI", "AUTO")
            || pair("SEMI", "AUTOMATIC");
        if bug {
            return Some(Self::Bug);
        }

        let sideswiper = has("SIDESWIPER")
            || has("SIDESSWIPER")
            || has("COOTIE")
            || has("SIDEWINDER")
            || (abbreviations && has("SS"))
            || pair("SIDE", "SWIPER");
        if sideswiper {
            return Some(Self::Sideswiper);
        }

        if has("STRAIGHT") || (abbreviations && has("SK")) {
            return Some(Self::Straight);
        }
        Some(Self::Other)
    }

    /// Short label used in report variants.
    pub fn label(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Bug => "bug",
            Self::Sideswiper => "sideswiper",
            Self::Other => "other",
        }
    }
}

/// Continent bucket derived from a counterparty's country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    /// North America.
    NA,
    /// South America.
    SA,
    /// Europe.
    EU,
    /// Africa.
    AF,
    /// Asia.
    AS,
    /// Oceania.
    OC,
    /// Antarctica. Never required for continent coverage.
    AN,
}

impl Continent {
    /// The six continents required for coverage awards.
    pub const ALL_SIX: [Continent; 6] = [
        Continent::NA,
        Continent::SA,
        Continent::EU,
        Continent::AF,
        Continent::AS,
        Continent::OC,
    ];

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Self::NA => "NA",
            Self::SA => "SA",
            Self::EU => "EU",
            Self::AF => "AF",
            Self::AS => "AS",
            Self::OC => "OC",
            Self::AN => "AN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_detection_prefers_bug_then_sideswiper() {
        assert_eq!(KeyType::detect("Vibroplex bug"), Some(KeyType::Bug));
        assert_eq!(KeyType::detect("straight and cootie"), Some(KeyType::Sideswiper));
        assert_eq!(KeyType::detect("SK"), Some(KeyType::Straight));
        assert_eq!(KeyType::detect("side swiper"), Some(KeyType::Sideswiper));
        assert_eq!(KeyType::detect("paddle"), Some(KeyType::Other));
        assert_eq!(KeyType::detect("  "), None);
    }

    #[test]
    fn skcc_in_comment_is_not_a_straight_key() {
        assert_eq!(KeyType::detect("SKCC 1234C"), Some(KeyType::Other));
    }

    #[test]
    fn prosigns_in_comments_name_no_key() {
        assert_eq!(KeyType::detect_in_comment("tnx fer QSO 73 SK"), Some(KeyType::Other));
        assert_eq!(KeyType::detect_in_comment("worked in the SS"), Some(KeyType::Other));
        assert_eq!(KeyType::detect_in_comment("73 SK on my straight key"), Some(KeyType::Straight));
        assert_eq!(KeyType::detect("SS"), Some(KeyType::Sideswiper));
    }

    #[test]
    fn band_from_frequency() {
        assert_eq!(Band::from_freq_mhz(7.055), Some(Band::B40m));
        assert_eq!(Band::from_freq_mhz(9.0), None);
        assert_eq!(Band::from_label("20m"), Some(Band::B20m));
    }
}
