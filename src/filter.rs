//! Per-award eligibility predicates.
//!
//! Every award owns an [`Eligibility`]; the run-wide [`CommonRules`] carry
//! the exclusion list and key policy from the configuration. A contact that
//! fails one award's check can still count for any other award.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    config::{EngineConfig, ExclusionRule},
    contact::Contact,
    types::KeyType,
};

/// Why a contact does not qualify for an award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Dated before the award's window opens.
    BeforeWindow,
    /// Dated after the award's window closes.
    AfterWindow,
    /// Counterparty is on the exclusion list.
    ExcludedCall,
    /// Not a Morse contact.
    NotCw,
    /// Key device recorded but not allowed.
    KeyNotAllowed,
    /// No key device recorded where one is required.
    KeyMissing,
    /// No band recorded where one is required.
    NoBand,
    /// Band outside the award's band set.
    BandNotCounted,
    /// Shorter than the award's minimum.
    TooShort,
    /// Not a low-power contact.
    NotQrp,
}

/// Key-device policy from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPolicy {
    /// Apply the whitelist at all.
    pub enforce: bool,
    /// Let contacts without a device through.
    pub missing_ok: bool,
    /// Accepted devices.
    pub allowed: Vec<KeyType>,
}

impl KeyPolicy {
    /// Checks one contact's device.
    pub fn admits(&self, key: Option<KeyType>) -> Result<(), Rejection> {
        if !self.enforce {
            return Ok(());
        }
        match key {
            None if self.missing_ok => Ok(()),
            None => Err(Rejection::KeyMissing),
            Some(k) if self.allowed.contains(&k) => Ok(()),
            Some(_) => Err(Rejection::KeyNotAllowed),
        }
    }
}

/// Rules shared by every award in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonRules {
    /// Excluded calls.
    pub exclusions: Vec<ExclusionRule>,
    /// Key policy.
    pub keys: KeyPolicy,
}

impl CommonRules {
    /// Rules taken from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            exclusions: config.excluded_calls.clone(),
            keys: KeyPolicy {
                enforce: config.enforce_key_type,
                missing_ok: config.treat_missing_key_as_valid,
                allowed: config.allowed_key_types.clone(),
            },
        }
    }

    /// True when either the normalized or the logged call is excluded.
    pub fn is_excluded(&self, contact: &Contact) -> bool {
        let date = contact.date();
        let raw = contact.call_raw.to_ascii_uppercase();
        self.exclusions
            .iter()
            .any(|rule| rule.matches(&contact.call, date) || rule.matches(&raw, date))
    }
}

/// Award-local eligibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    /// First qualifying date.
    pub valid_from: Option<NaiveDate>,
    /// Last qualifying date.
    pub valid_until: Option<NaiveDate>,
    /// Contact must carry a band.
    pub require_band: bool,
    /// Band must be one of the nine HF award bands.
    pub hf_award_bands_only: bool,
    /// Minimum length in minutes.
    pub min_duration_minutes: Option<u32>,
    /// Contact must be low power.
    pub qrp_only: bool,
    /// Award-specific device whitelist, on top of the run's key policy.
    pub key_types: Option<Vec<KeyType>>,
}

impl Eligibility {
    /// No award-local restriction.
    pub fn always() -> Self {
        Self::default()
    }

    /// Window opening on `date`.
    pub fn from_date(date: Option<NaiveDate>) -> Self {
        Self {
            valid_from: date,
            ..Self::default()
        }
    }

    /// Same rules, restricted to low-power contacts.
    pub fn qrp(mut self) -> Self {
        self.qrp_only = true;
        self
    }

    /// Same rules, restricted to HF award bands.
    pub fn hf_bands(mut self) -> Self {
        self.require_band = true;
        self.hf_award_bands_only = true;
        self
    }

    /// Same rules, requiring a band.
    pub fn with_band(mut self) -> Self {
        self.require_band = true;
        self
    }

    /// Same rules with a minimum length.
    pub fn min_minutes(mut self, minutes: u32) -> Self {
        self.min_duration_minutes = Some(minutes);
        self
    }

    /// Same rules with a device whitelist.
    pub fn keys(mut self, keys: &[KeyType]) -> Self {
        self.key_types = Some(keys.to_vec());
        self
    }

    /// Checks `contact` against these rules and the run's `common` rules.
    pub fn check(&self, contact: &Contact, common: &CommonRules) -> Result<(), Rejection> {
        let date = contact.date();
        if self.valid_from.is_some_and(|from| date < from) {
            return Err(Rejection::BeforeWindow);
        }
        if self.valid_until.is_some_and(|until| date > until) {
            return Err(Rejection::AfterWindow);
        }
        if !is_cw(contact.mode.as_deref()) {
            return Err(Rejection::NotCw);
        }
        if common.is_excluded(contact) {
            return Err(Rejection::ExcludedCall);
        }
        common.keys.admits(contact.key)?;
        if let Some(keys) = &self.key_types {
            match contact.key {
                None => return Err(Rejection::KeyMissing),
                Some(k) if !keys.contains(&k) => return Err(Rejection::KeyNotAllowed),
                Some(_) => {}
            }
        }
        if self.require_band || self.hf_award_bands_only {
            match contact.band {
                None => return Err(Rejection::NoBand),
                Some(b) if self.hf_award_bands_only && !b.is_hf_award_band() => {
                    return Err(Rejection::BandNotCounted);
                }
                Some(_) => {}
            }
        }
        if let Some(min) = self.min_duration_minutes {
            if contact.duration_minutes.is_none_or(|d| d < min) {
                return Err(Rejection::TooShort);
            }
        }
        if self.qrp_only && !contact.qrp {
            return Err(Rejection::NotQrp);
        }
        Ok(())
    }
}

/// Morse modes. A contact with no recorded mode is assumed to be Morse.
fn is_cw(mode: Option<&str>) -> bool {
    match mode {
        None => true,
        Some(m) => m == "A1A" || m.starts_with("CW"),
    }
}
