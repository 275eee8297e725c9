//! Movement speeds
//!
//! A creature's speed is a rate per movement mode. Monster documents give
//! each rate either as a bare number or as `{number, condition}`; both
//! shapes are resolved into [`SpeedValue`] once, at parse time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of movement modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MovementMode {
    Walk,
    Fly,
    Swim,
    Climb,
    Hover,
    Burrow,
}

impl MovementMode {
    /// All modes in display order
    pub fn all() -> &'static [MovementMode] {
        &[
            MovementMode::Walk,
            MovementMode::Fly,
            MovementMode::Swim,
            MovementMode::Climb,
            MovementMode::Hover,
            MovementMode::Burrow,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementMode::Walk => "walk",
            MovementMode::Fly => "fly",
            MovementMode::Swim => "swim",
            MovementMode::Climb => "climb",
            MovementMode::Hover => "hover",
            MovementMode::Burrow => "burrow",
        }
    }
}

/// Movement mode name outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown movement mode: {0}")]
pub struct UnknownMovementMode(pub String);

impl FromStr for MovementMode {
    type Err = UnknownMovementMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" => Ok(MovementMode::Walk),
            "fly" => Ok(MovementMode::Fly),
            "swim" => Ok(MovementMode::Swim),
            "climb" => Ok(MovementMode::Climb),
            "hover" => Ok(MovementMode::Hover),
            "burrow" => Ok(MovementMode::Burrow),
            _ => Err(UnknownMovementMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for MovementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rate for one movement mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeedValue {
    /// Bare number of feet
    Flat(u32),
    /// Rate with an optional condition, e.g. `{"number": 40, "condition": "(hover)"}`
    Conditioned {
        number: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
}

impl SpeedValue {
    /// Rate in feet
    pub fn rate(&self) -> u32 {
        match self {
            SpeedValue::Flat(n) => *n,
            SpeedValue::Conditioned { number, .. } => *number,
        }
    }

    /// Condition text, if any
    pub fn condition(&self) -> Option<&str> {
        match self {
            SpeedValue::Flat(_) => None,
            SpeedValue::Conditioned { condition, .. } => condition.as_deref(),
        }
    }
}

impl std::fmt::Display for SpeedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.condition() {
            Some(cond) if cond.starts_with('(') => write!(f, "{} {}", self.rate(), cond),
            Some(cond) if !cond.is_empty() => write!(f, "{} ({})", self.rate(), cond),
            _ => write!(f, "{}", self.rate()),
        }
    }
}

/// Wire shape of [`Speed`]: mode name to rate, plus the hover flag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SpeedRecord {
    #[serde(rename = "canHover", default, skip_serializing_if = "std::ops::Not::not")]
    can_hover: bool,
    #[serde(flatten)]
    modes: BTreeMap<String, SpeedValue>,
}

/// Speeds by movement mode; unset modes have rate 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpeedRecord", into = "SpeedRecord")]
pub struct Speed {
    modes: BTreeMap<MovementMode, SpeedValue>,
    /// Source data marks the creature as able to hover while flying
    pub can_hover: bool,
}

impl Speed {
    /// Create an empty speed (no movement)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a bare walking speed
    pub fn walk(rate: u32) -> Self {
        let mut speed = Self::new();
        speed.set(MovementMode::Walk, SpeedValue::Flat(rate));
        speed
    }

    /// Set the rate for a mode; a zero rate clears it
    pub fn set(&mut self, mode: MovementMode, value: SpeedValue) {
        if value.rate() == 0 {
            self.modes.remove(&mode);
        } else {
            self.modes.insert(mode, value);
        }
    }

    /// Set a rate by mode name, rejecting names outside the closed set
    pub fn set_named(&mut self, mode: &str, value: SpeedValue) -> Result<(), UnknownMovementMode> {
        let mode = mode.parse::<MovementMode>()?;
        self.set(mode, value);
        Ok(())
    }

    /// Rate for a mode (0 when unset)
    pub fn get(&self, mode: MovementMode) -> u32 {
        self.modes.get(&mode).map(SpeedValue::rate).unwrap_or(0)
    }

    /// Full value for a mode, if set
    pub fn value(&self, mode: MovementMode) -> Option<&SpeedValue> {
        self.modes.get(&mode)
    }

    /// Modes with a non-zero rate, in display order
    pub fn modes(&self) -> impl Iterator<Item = (MovementMode, &SpeedValue)> {
        self.modes.iter().map(|(m, v)| (*m, v))
    }
}

impl TryFrom<SpeedRecord> for Speed {
    type Error = UnknownMovementMode;

    fn try_from(record: SpeedRecord) -> Result<Self, Self::Error> {
        let mut speed = Speed {
            modes: BTreeMap::new(),
            can_hover: record.can_hover,
        };
        for (name, value) in record.modes {
            speed.set_named(&name, value)?;
        }
        Ok(speed)
    }
}

impl From<Speed> for SpeedRecord {
    fn from(speed: Speed) -> Self {
        let modes = speed
            .modes
            .into_iter()
            .map(|(m, v)| (m.as_str().to_string(), v))
            .collect();
        SpeedRecord {
            can_hover: speed.can_hover,
            modes,
        }
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.modes().map(|(m, v)| format!("{}: {}", m, v)).collect();
        if parts.is_empty() {
            write!(f, "no movement")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
