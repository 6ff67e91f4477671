//! Rule toggles and constants for one computation run.

use std::{collections::BTreeMap, fs, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{callsign::Normalizer, geo, types::KeyType};

/// Configuration failures. Data-quality problems never land here.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config text is not valid JSON for [`EngineConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A nonsensical combination of settings.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What tier-gated awards do with a tier that came from the roster fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowConfidencePolicy {
    /// Use the roster's current tier.
    #[default]
    FallBackToRoster,
    /// Keep the contact out of tier-gated pools.
    Exclude,
}

/// Base counts for the membership-rank awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Unique members for Centurion.
    pub centurion: u64,
    /// Unique C/T/S members for Tribune.
    pub tribune: u64,
    /// Unique T/S members for Senator.
    pub senator: u64,
    /// Tribune multiple that unlocks Senator counting.
    pub senator_prerequisite_multiple: u64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            centurion: 100,
            tribune: 50,
            senator: 200,
            senator_prerequisite_multiple: 8,
        }
    }
}

impl TierThresholds {
    /// Tribune count at which Senator counting begins.
    pub fn senator_prerequisite(&self) -> u64 {
        self.tribune.saturating_mul(self.senator_prerequisite_multiple)
    }
}

/// Callsign excluded from all awards on or after a date.
///
/// A trailing `*` in `pattern` matches any call starting with the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    /// Call or prefix pattern, upper case.
    pub pattern: String,
    /// First date the exclusion applies. Always when absent.
    pub from: Option<NaiveDate>,
}

impl ExclusionRule {
    /// True when `call` on `date` is excluded.
    pub fn matches(&self, call: &str, date: NaiveDate) -> bool {
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        match self.pattern.strip_suffix('*') {
            Some(prefix) => call.starts_with(prefix),
            None => call == self.pattern,
        }
    }
}

/// Named toggles and constants consumed by [`crate::compute::compute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Drop contacts whose key device is not whitelisted.
    pub enforce_key_type: bool,
    /// With enforcement on, let contacts without a key device through.
    pub treat_missing_key_as_valid: bool,
    /// Key devices accepted under enforcement.
    pub allowed_key_types: Vec<KeyType>,
    /// Resolve ranks at QSO time. Off selects the legacy current-rank mode.
    pub enforce_tier_rules: bool,
    /// Handling of roster-fallback ranks in tier-gated pools.
    pub low_confidence: LowConfidencePolicy,
    /// Membership-rank award bases.
    pub thresholds: TierThresholds,
    /// Power ceiling in watts for QRP variants.
    pub qrp_max_watts: f64,
    /// Logging station's country. Derived from `my_call` when absent.
    pub home_country: Option<String>,
    /// Logging station's call.
    pub my_call: Option<String>,
    /// Date the logging station reached Centurion, if earlier than its log shows.
    pub own_centurion_date: Option<NaiveDate>,
    /// Calls excluded from every award.
    pub excluded_calls: Vec<ExclusionRule>,
    /// Old call to current call.
    pub call_aliases: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let special_cutoff = NaiveDate::from_ymd_opt(2009, 12, 1);
        Self {
            enforce_key_type: false,
            treat_missing_key_as_valid: true,
            allowed_key_types: KeyType::MECHANICAL.to_vec(),
            enforce_tier_rules: true,
            low_confidence: LowConfidencePolicy::default(),
            thresholds: TierThresholds::default(),
            qrp_max_watts: 5.0,
            home_country: None,
            my_call: None,
            own_centurion_date: None,
            excluded_calls: vec![
                ExclusionRule {
                    pattern: "K9SKC".to_string(),
                    from: special_cutoff,
                },
                ExclusionRule {
                    pattern: "K3Y".to_string(),
                    from: special_cutoff,
                },
                ExclusionRule {
                    pattern: "K3Y/*".to_string(),
                    from: special_cutoff,
                },
            ],
            call_aliases: BTreeMap::new(),
        }
    }
}

const DEFAULT_HOME_COUNTRY: &str = "United States";

impl EngineConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Rejects combinations that cannot produce a meaningful report.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if t.centurion == 0 || t.tribune == 0 || t.senator == 0 {
            return Err(ConfigError::Invalid("award thresholds must be positive".into()));
        }
        if t.senator_prerequisite_multiple == 0 {
            return Err(ConfigError::Invalid(
                "senator prerequisite multiple must be positive".into(),
            ));
        }
        if !self.qrp_max_watts.is_finite() || self.qrp_max_watts <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "qrp_max_watts must be a positive number, got {}",
                self.qrp_max_watts
            )));
        }
        if self.enforce_key_type && self.allowed_key_types.is_empty() {
            return Err(ConfigError::Invalid(
                "key type enforcement needs at least one allowed key type".into(),
            ));
        }
        if let Some(country) = self.home_country.as_deref().filter(|c| !c.trim().is_empty()) {
            if geo::canonical_country(country).is_none() {
                return Err(ConfigError::Invalid(format!("unknown home country {country:?}")));
            }
        }
        if let Some(rule) = self.excluded_calls.iter().find(|r| r.pattern.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "empty exclusion pattern (from {:?})",
                rule.from
            )));
        }
        Ok(())
    }

    /// Normalizer carrying this configuration's alias table.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::with_aliases(self.call_aliases.iter())
    }

    /// Country whose stations do not count as DX.
    pub fn resolved_home_country(&self) -> String {
        if let Some(country) = self.home_country.as_deref().filter(|c| !c.trim().is_empty()) {
            return geo::canonical_country(country)
                .map(str::to_string)
                .unwrap_or_else(|| country.trim().to_string());
        }
        self.my_call
            .as_deref()
            .and_then(|call| geo::country_of(&call.trim().to_ascii_uppercase()))
            .unwrap_or(DEFAULT_HOME_COUNTRY)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "enforce_key_type": true }"#).expect("parse");
        assert!(config.enforce_key_type);
        assert_eq!(config.thresholds.tribune, 50);
        assert_eq!(config.excluded_calls.len(), 3);
    }

    #[test]
    fn rejects_zero_threshold() {
        let err = EngineConfig::from_json_str(r#"{ "thresholds": { "tribune": 0 } }"#)
            .expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn home_country_from_own_call() {
        let config = EngineConfig {
            my_call: Some("ve3abc".into()),
            ..EngineConfig::default()
        };
        assert_eq!(config.resolved_home_country(), "Canada");
    }

    #[test]
    fn home_country_matches_table_spelling() {
        let config = EngineConfig {
            home_country: Some(" united states ".into()),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.resolved_home_country(), "United States");

        let unknown = EngineConfig {
            home_country: Some("Atlantis".into()),
            ..EngineConfig::default()
        };
        assert!(matches!(unknown.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn wildcard_exclusion_respects_start_date() {
        let rule = ExclusionRule {
            pattern: "K3Y/*".into(),
            from: NaiveDate::from_ymd_opt(2009, 12, 1),
        };
        let before = NaiveDate::from_ymd_opt(2009, 1, 5).expect("date");
        let after = NaiveDate::from_ymd_opt(2012, 1, 5).expect("date");
        assert!(!rule.matches("K3Y/4", before));
        assert!(rule.matches("K3Y/4", after));
        assert!(!rule.matches("K3YA", after));
    }
}
