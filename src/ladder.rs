//! Endorsement ladders: named thresholds over a count, score or minutes.

use serde::{Deserialize, Serialize};

/// One named threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rung {
    /// Display name, e.g. `Tx3` or `Px7`.
    pub label: String,
    /// Value required.
    pub threshold: u64,
}

/// Ordered thresholds, lowest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ladder {
    rungs: Vec<Rung>,
}

/// Where a value sits on a ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderStatus {
    /// Highest rung met.
    pub achieved: Option<Rung>,
    /// Lowest rung not yet met.
    pub next: Option<Rung>,
    /// Amount still needed for `next`. Zero at the top of the ladder.
    pub remaining: u64,
}

impl Ladder {
    /// Ladder from explicit rungs. Rungs are sorted by threshold.
    pub fn new(mut rungs: Vec<Rung>) -> Self {
        rungs.sort_by_key(|r| r.threshold);
        Self { rungs }
    }

    /// Multiples of `base`: every multiple from 1 to `linear_max`, then every
    /// `step` multiple up to `coarse_max`. `label` names multiple `n`.
    ///
    /// ```
    /// use awardlog::ladder::Ladder;
    ///
    /// let tribune = Ladder::multiples(50, 10, 5, 50, |n| {
    ///     if n == 1 { "Tribune".to_string() } else { format!("Tx{n}") }
    /// });
    /// let status = tribune.evaluate(170);
    /// assert_eq!(status.achieved.map(|r| r.label), Some("Tx3".to_string()));
    /// assert_eq!(status.remaining, 30);
    /// ```
    pub fn multiples(
        base: u64,
        linear_max: u64,
        step: u64,
        coarse_max: u64,
        label: impl Fn(u64) -> String,
    ) -> Self {
        let mut factors: Vec<u64> = (1..=linear_max).collect();
        if step > 0 {
            let mut n = linear_max + step;
            while n <= coarse_max {
                factors.push(n);
                n += step;
            }
        }
        Self::new(
            factors
                .into_iter()
                .map(|n| Rung {
                    label: label(n),
                    threshold: base.saturating_mul(n),
                })
                .collect(),
        )
    }

    /// Absolute thresholds labelled by `label`.
    pub fn absolute(thresholds: &[u64], label: impl Fn(u64) -> String) -> Self {
        Self::new(
            thresholds
                .iter()
                .map(|t| Rung {
                    label: label(*t),
                    threshold: *t,
                })
                .collect(),
        )
    }

    /// A single pass/fail threshold.
    pub fn single(label: impl Into<String>, threshold: u64) -> Self {
        Self::new(vec![Rung {
            label: label.into(),
            threshold,
        }])
    }

    /// Rungs, lowest first.
    pub fn rungs(&self) -> &[Rung] {
        &self.rungs
    }

    /// Lowest threshold, or zero for an empty ladder.
    pub fn base(&self) -> u64 {
        self.rungs.first().map_or(0, |r| r.threshold)
    }

    /// Highest rung met by `value` and the gap to the next one.
    pub fn evaluate(&self, value: u64) -> LadderStatus {
        let split = self.rungs.partition_point(|r| r.threshold <= value);
        let achieved = split.checked_sub(1).map(|i| self.rungs[i].clone());
        let next = self.rungs.get(split).cloned();
        let remaining = next.as_ref().map_or(0, |r| r.threshold - value);
        LadderStatus {
            achieved,
            next,
            remaining,
        }
    }
}
