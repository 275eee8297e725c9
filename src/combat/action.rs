//! Simplified actions for live play
//!
//! An action is either always usable, or carries a recharge threshold: once
//! used it stays unavailable until a d6 roll at the start of its owner's turn
//! meets the threshold.

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::dice::roll_die_with;
use super::error::CombatError;

/// Valid recharge thresholds
pub const RECHARGE_RANGE: std::ops::RangeInclusive<u8> = 2..=6;

// `{@recharge 5}`, or bare `{@recharge}` meaning 6
static RECHARGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@recharge(?:\s+(\d))?\}").unwrap());

// Plain text "(Recharge 5-6)" or "(Recharge 6)"
static RECHARGE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*recharge\s+(\d)(?:\s*[-–]\s*6)?\s*\)").unwrap());

fn default_available() -> bool {
    true
}

/// A named action, trait or legendary action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub recharge: Option<u8>,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl Action {
    /// An action that is always available
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recharge: None,
            available: true,
        }
    }

    /// An action that recovers on a d6 roll of `threshold` or higher
    pub fn with_recharge(name: impl Into<String>, threshold: u8) -> Result<Self, CombatError> {
        let name = name.into();
        if !RECHARGE_RANGE.contains(&threshold) {
            return Err(CombatError::InvalidRecharge {
                action: name,
                threshold,
            });
        }
        Ok(Self {
            name,
            recharge: Some(threshold),
            available: true,
        })
    }

    /// Build from a bestiary action name, detecting and stripping any
    /// recharge tag
    pub fn from_name(raw: &str) -> Self {
        let (name, threshold) = split_recharge(raw);
        match threshold {
            Some(t) if RECHARGE_RANGE.contains(&t) => Self {
                name,
                recharge: Some(t),
                available: true,
            },
            Some(t) => {
                debug!(action = %name, threshold = t, "ignoring out-of-range recharge");
                Self::new(name)
            }
            None => Self::new(name),
        }
    }

    pub fn is_rechargeable(&self) -> bool {
        self.recharge.is_some()
    }

    /// Use the action. Returns false if it is unavailable.
    pub fn trigger(&mut self) -> bool {
        if !self.available {
            return false;
        }
        if self.recharge.is_some() {
            self.available = false;
        }
        true
    }

    /// Roll to recover a spent recharge action. Returns the d6 result when a
    /// roll was made.
    pub fn recharge_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u32> {
        let threshold = self.recharge?;
        if self.available {
            return None;
        }
        let roll = roll_die_with(rng, 6);
        self.available = roll >= u32::from(threshold);
        debug!(action = %self.name, roll, threshold, recovered = self.available, "recharge roll");
        Some(roll)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.recharge {
            Some(t) if t >= 6 => write!(f, "{} (Recharge 6)", self.name)?,
            Some(t) => write!(f, "{} (Recharge {}-6)", self.name, t)?,
            None => write!(f, "{}", self.name)?,
        }
        if !self.available {
            write!(f, " [spent]")?;
        }
        Ok(())
    }
}

/// Split a recharge tag off an action name
fn split_recharge(raw: &str) -> (String, Option<u8>) {
    for pattern in [&*RECHARGE_TAG, &*RECHARGE_TEXT] {
        if let Some(caps) = pattern.captures(raw) {
            let threshold = caps
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(6);
            let stripped = pattern.replace(raw, "");
            let name = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
            return (name, Some(threshold));
        }
    }
    (raw.trim().to_string(), None)
}
