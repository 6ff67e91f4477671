//! Callsign canonicalization.
//!
//! A logged call may carry operating-location prefixes (`DL/W1ABC`),
//! portable or mobile modifiers (`W1ABC/P`, `W1ABC/QRP`), or a region digit
//! (`K5ZMD/7`). All of these collapse to the base call so the same operator
//! is recognised across contacts and roster entries.

use hashbrown::HashMap;
use tracing::warn;

const MODIFIER_TOKENS: [&str; 6] = ["P", "QRP", "M", "MM", "AM", "SOTA"];

/// Result of normalizing one raw callsign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCall {
    /// Canonical call. For ambiguous input this is the cleaned raw text.
    pub call: String,
    /// True when no base segment could be chosen safely.
    pub ambiguous: bool,
}

/// Pure, idempotent callsign normalizer with an optional alias table.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    aliases: HashMap<String, String>,
}

impl Normalizer {
    /// Normalizer without aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a normalizer from `(old call, current call)` pairs.
    ///
    /// Both sides are normalized structurally first. Chains are collapsed
    /// to their final target; pairs that form a cycle are dropped.
    pub fn with_aliases<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut direct: HashMap<String, String> = HashMap::new();
        for (from, to) in pairs {
            let from = structural(from.as_ref());
            let to = structural(to.as_ref());
            if from.ambiguous || to.ambiguous || from.call.is_empty() || to.call.is_empty() {
                warn!(from = %from.call, to = %to.call, "ignoring alias with ambiguous callsign");
                continue;
            }
            if from.call != to.call {
                direct.entry(from.call).or_insert(to.call);
            }
        }

        let mut aliases = HashMap::with_capacity(direct.len());
        for start in direct.keys() {
            let mut current = start;
            let mut hops = 0usize;
            let mut cyclic = false;
            while let Some(next) = direct.get(current) {
                current = next;
                hops += 1;
                if current == start || hops > direct.len() {
                    cyclic = true;
                    break;
                }
            }
            if cyclic {
                warn!(call = %start, "dropping cyclic callsign alias");
                continue;
            }
            aliases.insert(start.clone(), current.clone());
        }
        Self { aliases }
    }

    /// Number of active alias mappings.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Canonicalizes `raw`.
    pub fn normalize(&self, raw: &str) -> NormalizedCall {
        let base = structural(raw);
        match self.aliases.get(&base.call) {
            Some(target) => NormalizedCall {
                call: target.clone(),
                ambiguous: false,
            },
            None => base,
        }
    }

    /// Convenience wrapper returning only the canonical text.
    pub fn canonical(&self, raw: &str) -> String {
        self.normalize(raw).call
    }
}

fn structural(raw: &str) -> NormalizedCall {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if !cleaned.contains('/') {
        return NormalizedCall {
            call: cleaned,
            ambiguous: false,
        };
    }

    let segments: Vec<&str> = cleaned
        .split('/')
        .filter(|s| !s.is_empty())
        .filter(|s| !MODIFIER_TOKENS.contains(s))
        .filter(|s| !(s.len() == 1 && s.chars().all(|c| c.is_ascii_digit())))
        .collect();

    let shaped: Vec<&str> = segments.iter().copied().filter(|s| is_call_shaped(s)).collect();
    let chosen = match shaped.as_slice() {
        [only] => Some(*only),
        [] => None,
        many => {
            let longest = many.iter().map(|s| s.len()).max().unwrap_or(0);
            let mut best = many.iter().filter(|s| s.len() == longest);
            match (best.next(), best.next()) {
                (Some(one), None) => Some(*one),
                _ => None,
            }
        }
    };

    match chosen {
        Some(call) => NormalizedCall {
            call: call.to_string(),
            ambiguous: false,
        },
        None => NormalizedCall {
            call: cleaned,
            ambiguous: true,
        },
    }
}

/// A segment that can stand alone as a callsign: at least three characters,
/// a digit, and a letter after the last digit.
fn is_call_shaped(segment: &str) -> bool {
    if segment.len() < 3 || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    match segment.rfind(|c: char| c.is_ascii_digit()) {
        Some(pos) => segment[pos + 1..].chars().any(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Prefix of a normalized call: everything up to and including its last digit.
///
/// `AC2C` gives `AC2`, `2D0YLX` gives `2D0`, `S51AF` gives `S51`. Calls
/// without a digit, or still carrying a `/`, have no prefix.
pub fn prefix_of(call: &str) -> Option<&str> {
    if call.is_empty() || call.contains('/') {
        return None;
    }
    call.rfind(|c: char| c.is_ascii_digit())
        .map(|pos| &call[..=pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_modifiers_and_location_prefixes() {
        let n = Normalizer::new();
        assert_eq!(n.canonical("w1abc/p"), "W1ABC");
        assert_eq!(n.canonical("K1ABC/7/P"), "K1ABC");
        assert_eq!(n.canonical("DL/W1ABC"), "W1ABC");
        assert_eq!(n.canonical("W4/IB4DX"), "IB4DX");
        assert_eq!(n.canonical("DU3/W5LFA"), "W5LFA");
        assert_eq!(n.canonical(" K5ZMD/7 "), "K5ZMD");
    }

    #[test]
    fn two_full_calls_of_equal_length_stay_raw() {
        let out = Normalizer::new().normalize("W1ABC/K2XYZ");
        assert!(out.ambiguous);
        assert_eq!(out.call, "W1ABC/K2XYZ");
    }

    #[test]
    fn aliases_collapse_chains_and_drop_cycles() {
        let n = Normalizer::with_aliases([("N1OLD", "N1MID"), ("N1MID", "N1NEW"), ("A1AA", "B1BB"), ("B1BB", "A1AA")]);
        assert_eq!(n.canonical("N1OLD/P"), "N1NEW");
        assert_eq!(n.canonical("N1MID"), "N1NEW");
        assert_eq!(n.canonical("A1AA"), "A1AA");
        assert_eq!(n.alias_count(), 2);
    }

    #[test]
    fn prefix_examples() {
        assert_eq!(prefix_of("AC2C"), Some("AC2"));
        assert_eq!(prefix_of("2D0YLX"), Some("2D0"));
        assert_eq!(prefix_of("S51AF"), Some("S51"));
        assert_eq!(prefix_of("N6WK"), Some("N6"));
        assert_eq!(prefix_of("ABC"), None);
    }
}
