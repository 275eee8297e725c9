//! Ability scores
//!
//! The six named scores every creature carries, and the derived modifier.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the six abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    /// All abilities in statblock order
    pub fn all() -> &'static [Ability] {
        &[
            Ability::Str,
            Ability::Dex,
            Ability::Con,
            Ability::Int,
            Ability::Wis,
            Ability::Cha,
        ]
    }

    /// Lowercase key used in monster documents ("str", "dex", ...)
    pub fn key(&self) -> &'static str {
        match self {
            Ability::Str => "str",
            Ability::Dex => "dex",
            Ability::Con => "con",
            Ability::Int => "int",
            Ability::Wis => "wis",
            Ability::Cha => "cha",
        }
    }
}

impl FromStr for Ability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Str),
            "dex" | "dexterity" => Ok(Ability::Dex),
            "con" | "constitution" => Ok(Ability::Con),
            "int" | "intelligence" => Ok(Ability::Int),
            "wis" | "wisdom" => Ok(Ability::Wis),
            "cha" | "charisma" => Ok(Ability::Cha),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key().to_uppercase())
    }
}

/// Compute the modifier for a raw score: floor((score - 10) / 2)
pub fn modifier(score: i32) -> i32 {
    // Scores are not range-checked; widen so extreme values cannot overflow
    (i64::from(score) - 10).div_euclid(2) as i32
}

/// The six ability scores of a creature
///
/// Serialized with uppercase keys (`{"STR": 16, ...}`), the shape used in
/// encounter snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "STR")]
    pub str_: i32,
    #[serde(rename = "DEX")]
    pub dex: i32,
    #[serde(rename = "CON")]
    pub con: i32,
    #[serde(rename = "INT")]
    pub int: i32,
    #[serde(rename = "WIS")]
    pub wis: i32,
    #[serde(rename = "CHA")]
    pub cha: i32,
}

impl AbilityScores {
    /// Create a full set of scores
    pub fn new(str_: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self { str_, dex, con, int, wis, cha }
    }

    /// Get the raw score for an ability
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str_,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    /// Get the derived modifier for an ability
    pub fn modifier(&self, ability: Ability) -> i32 {
        modifier(self.score(ability))
    }

    /// Iterate (ability, score) pairs in statblock order
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::all().iter().map(move |a| (*a, self.score(*a)))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

impl std::fmt::Display for AbilityScores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(a, s)| format!("{}: {}", a, s)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_table() {
        let table = [
            (1, -5),
            (3, -4),
            (8, -1),
            (9, -1),
            (10, 0),
            (11, 0),
            (12, 1),
            (17, 3),
            (20, 5),
            (30, 10),
        ];
        for (score, expected) in table {
            assert_eq!(modifier(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_modifier_extremes() {
        assert_eq!(modifier(i32::MIN), -1_073_741_829);
        assert_eq!(modifier(i32::MAX), 1_073_741_818);
        assert_eq!(modifier(-1), -6);
    }

    #[test]
    fn test_modifier_by_ability() {
        let scores = AbilityScores::new(8, 14, 10, 8, 8, 8);
        assert_eq!(scores.modifier(Ability::Str), -1);
        assert_eq!(scores.modifier(Ability::Dex), 2);
        assert_eq!(scores.modifier(Ability::Con), 0);
    }

    #[test]
    fn test_ability_parsing() {
        assert_eq!("STR".parse::<Ability>(), Ok(Ability::Str));
        assert_eq!("wisdom".parse::<Ability>(), Ok(Ability::Wis));
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn test_serialized_keys() {
        let scores = AbilityScores::new(16, 14, 14, 10, 12, 10);
        let json = serde_json::to_value(scores).unwrap();
        assert_eq!(json["STR"], 16);
        assert_eq!(json["CHA"], 10);
    }

    #[test]
    fn test_display() {
        let scores = AbilityScores::new(16, 14, 14, 10, 12, 10);
        assert_eq!(
            scores.to_string(),
            "STR: 16, DEX: 14, CON: 14, INT: 10, WIS: 12, CHA: 10"
        );
    }
}
