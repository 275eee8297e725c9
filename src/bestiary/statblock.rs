//! Bestiary statblock model
//!
//! The strongly-typed result of parsing one monster document. Every
//! field-shape ambiguity in the source is resolved into one of these types.

use serde::Serialize;
use std::collections::BTreeMap;

use super::damage::DamageModifiers;
use super::entries::TextEntry;
use crate::stats::{AbilityScores, Speed};

/// Creature type, optionally with descriptive tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CreatureType {
    Plain(String),
    Tagged {
        #[serde(rename = "type")]
        type_: String,
        tags: Vec<String>,
    },
}

impl CreatureType {
    /// The type label without tags
    pub fn label(&self) -> &str {
        match self {
            CreatureType::Plain(t) => t,
            CreatureType::Tagged { type_, .. } => type_,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            CreatureType::Plain(_) => &[],
            CreatureType::Tagged { tags, .. } => tags,
        }
    }
}

impl std::fmt::Display for CreatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tags() {
            [] => write!(f, "{}", self.label()),
            tags => write!(f, "{} ({})", self.label(), tags.join(", ")),
        }
    }
}

/// Armor class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArmorClass {
    /// Bare number
    Flat(i64),
    /// Number with the armor it comes from and an optional condition
    Described {
        ac: i64,
        from: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
    /// Free text, e.g. "12 + your Intelligence modifier"
    Text(String),
}

impl ArmorClass {
    /// Numeric armor class, reading a leading number out of free text
    pub fn value(&self) -> Option<i64> {
        match self {
            ArmorClass::Flat(ac) | ArmorClass::Described { ac, .. } => Some(*ac),
            ArmorClass::Text(text) => {
                let digits: String = text
                    .trim_start()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            }
        }
    }

    /// Descriptive suffix ("natural armor", "with mage armor")
    pub fn note(&self) -> Option<String> {
        match self {
            ArmorClass::Flat(_) => None,
            ArmorClass::Described { from, condition, .. } => {
                let mut parts = Vec::new();
                if !from.is_empty() {
                    parts.push(from.join(", "));
                }
                if let Some(cond) = condition {
                    parts.push(cond.clone());
                }
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
            ArmorClass::Text(text) => Some(text.clone()),
        }
    }
}

impl std::fmt::Display for ArmorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArmorClass::Flat(ac) => write!(f, "{}", ac),
            ArmorClass::Described { ac, .. } => match self.note() {
                Some(note) => write!(f, "{} ({})", ac, note),
                None => write!(f, "{}", ac),
            },
            ArmorClass::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Hit points: average, dice formula, or special text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HitPoints {
    pub average: Option<i64>,
    pub formula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

/// Challenge rating with optional lair/coven variants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeRating {
    /// Base rating as displayed ("5", "1/8", "0.50")
    pub cr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coven: Option<String>,
    /// Numeric base rating, for range comparisons
    pub value: Option<f64>,
}

impl ChallengeRating {
    /// Plain rating without variants
    pub fn new(cr: impl Into<String>) -> Self {
        let cr = cr.into();
        let value = cr_value(&cr);
        Self {
            cr,
            lair: None,
            coven: None,
            value,
        }
    }

    /// Single display string, variants appended in parentheses
    pub fn display(&self) -> String {
        let mut out = self.cr.clone();
        if let Some(lair) = &self.lair {
            out.push_str(&format!(" (lair {})", lair));
        }
        if let Some(coven) = &self.coven {
            out.push_str(&format!(" (coven {})", coven));
        }
        out
    }
}

impl std::fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Numeric value of a rating string: "1/8" -> 0.125, "5" -> 5.0
pub fn cr_value(cr: &str) -> Option<f64> {
    let cr = cr.split_whitespace().next()?;
    match cr.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => cr.parse().ok(),
    }
}

/// A named trait, action or legendary action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionEntry {
    pub name: String,
    pub entries: Vec<TextEntry>,
}

impl ActionEntry {
    /// `"Name: entry1; entry2"` rendering used by the row projection
    pub fn render(&self) -> String {
        let entries: Vec<String> = self.entries.iter().map(TextEntry::render).collect();
        format!("{}: {}", self.name, entries.join("; "))
    }
}

/// Spells known at one slot level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellSlot {
    pub level: u32,
    pub slots: Option<u32>,
    pub spells: Vec<String>,
}

/// A spellcasting block
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Spellcasting {
    pub name: String,
    pub header_entries: Vec<String>,
    pub footer_entries: Option<Vec<String>>,
    pub spells: BTreeMap<u32, SpellSlot>,
    /// Innate at-will spells
    pub will: Vec<String>,
    /// Innate limited-use spells keyed by frequency ("1e", "3")
    pub daily: BTreeMap<String, Vec<String>>,
}

/// A fully parsed monster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBlock {
    pub name: String,
    pub size: Vec<String>,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub source: String,
    pub alignment: Vec<String>,
    pub ac: ArmorClass,
    pub hp: HitPoints,
    pub speed: Speed,
    pub abilities: AbilityScores,
    pub saves: BTreeMap<String, String>,
    pub skills: BTreeMap<String, String>,
    pub resist: DamageModifiers,
    pub immune: DamageModifiers,
    pub vulnerable: DamageModifiers,
    pub condition_immune: Vec<String>,
    pub senses: Vec<String>,
    pub passive: Option<i64>,
    pub languages: Vec<String>,
    pub cr: Option<ChallengeRating>,
    pub traits: Vec<ActionEntry>,
    pub actions: Vec<ActionEntry>,
    pub bonus_actions: Vec<ActionEntry>,
    pub reactions: Vec<ActionEntry>,
    pub legendary: Option<Vec<ActionEntry>>,
    pub legendary_group: Option<String>,
    pub page: Option<u32>,
    pub spellcasting: Vec<Spellcasting>,
}
