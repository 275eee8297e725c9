//! Engine statblock
//!
//! A reduced, serializable template used during play. Built from a parsed
//! bestiary statblock or by hand, then cloned into each combatant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::action::Action;
use super::dice::{parse_dice, DiceRoll};
use crate::bestiary;
use crate::stats::{AbilityScores, Speed};

fn default_armor_class() -> i64 {
    10
}

fn default_hit_dice() -> String {
    "1d8".to_string()
}

fn default_max_hp() -> i32 {
    1
}

fn default_challenge_rating() -> String {
    "0".to_string()
}

/// Statistics for one creature during play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default, rename = "type")]
    pub creature_type: String,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_armor_class")]
    pub armor_class: i64,
    /// "natural armor", "with mage armor", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_note: Option<String>,
    #[serde(default = "default_hit_dice")]
    pub hit_dice: String,
    #[serde(default = "default_max_hp")]
    pub max_hp: i32,
    #[serde(default)]
    pub speed: Speed,
    pub abilities: AbilityScores,
    #[serde(default)]
    pub saves: BTreeMap<String, String>,
    #[serde(default)]
    pub skills: BTreeMap<String, String>,
    #[serde(default)]
    pub senses: Vec<String>,
    #[serde(default)]
    pub passive: Option<i64>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default = "default_challenge_rating")]
    pub challenge_rating: String,
    #[serde(default)]
    pub traits: Vec<Action>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonus_actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Action>,
    #[serde(default)]
    pub legendary_actions: Vec<Action>,
    #[serde(default)]
    pub legendary_group: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl StatBlock {
    /// A bare template with the given scores, speed and maximum HP
    pub fn new(name: impl Into<String>, abilities: AbilityScores, speed: Speed, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            size: String::new(),
            creature_type: String::new(),
            alignment: String::new(),
            source: String::new(),
            armor_class: default_armor_class(),
            ac_note: None,
            hit_dice: default_hit_dice(),
            max_hp,
            speed,
            abilities,
            saves: BTreeMap::new(),
            skills: BTreeMap::new(),
            senses: Vec::new(),
            passive: None,
            languages: Vec::new(),
            challenge_rating: default_challenge_rating(),
            traits: Vec::new(),
            actions: Vec::new(),
            bonus_actions: Vec::new(),
            reactions: Vec::new(),
            legendary_actions: Vec::new(),
            legendary_group: None,
            page: None,
        }
    }

    /// Convert a parsed bestiary statblock
    pub fn from_bestiary(sb: &bestiary::StatBlock) -> Self {
        let formula = sb.hp.formula.as_deref().map(str::trim).filter(|f| !f.is_empty());
        let max_hp = sb
            .hp
            .average
            .and_then(|avg| i32::try_from(avg).ok())
            .or_else(|| formula.and_then(|f| parse_dice(f).ok()).map(|d| d.average()))
            .unwrap_or(1)
            .max(1);

        let names = |entries: &[bestiary::ActionEntry]| -> Vec<Action> {
            entries.iter().map(|e| Action::from_name(&e.name)).collect()
        };

        Self {
            name: sb.name.clone(),
            size: sb.size.join(", "),
            creature_type: sb.creature_type.to_string(),
            alignment: sb.alignment.join(", "),
            source: sb.source.clone(),
            armor_class: sb.ac.value().unwrap_or_else(default_armor_class),
            ac_note: sb.ac.note(),
            hit_dice: formula.map(String::from).unwrap_or_else(default_hit_dice),
            max_hp,
            speed: sb.speed.clone(),
            abilities: sb.abilities,
            saves: sb.saves.clone(),
            skills: sb.skills.clone(),
            senses: sb.senses.clone(),
            passive: sb.passive,
            languages: sb.languages.clone(),
            challenge_rating: sb
                .cr
                .as_ref()
                .map(|cr| cr.display())
                .unwrap_or_else(default_challenge_rating),
            traits: names(&sb.traits),
            actions: names(&sb.actions),
            bonus_actions: names(&sb.bonus_actions),
            reactions: names(&sb.reactions),
            legendary_actions: sb.legendary.as_deref().map(names).unwrap_or_default(),
            legendary_group: sb.legendary_group.clone(),
            page: sb.page,
        }
    }

    /// Parsed hit-dice formula, if it is valid notation
    pub fn hit_dice_roll(&self) -> Option<DiceRoll> {
        parse_dice(&self.hit_dice).ok()
    }

    /// Every owned action: traits, actions, bonus actions, reactions and
    /// legendary actions
    pub fn all_actions(&self) -> impl Iterator<Item = &Action> {
        self.traits
            .iter()
            .chain(&self.actions)
            .chain(&self.bonus_actions)
            .chain(&self.reactions)
            .chain(&self.legendary_actions)
    }

    pub fn all_actions_mut(&mut self) -> impl Iterator<Item = &mut Action> {
        self.traits
            .iter_mut()
            .chain(self.actions.iter_mut())
            .chain(self.bonus_actions.iter_mut())
            .chain(self.reactions.iter_mut())
            .chain(self.legendary_actions.iter_mut())
    }

    /// Find an action by name (case-insensitive)
    pub fn action_mut(&mut self, name: &str) -> Option<&mut Action> {
        self.all_actions_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for StatBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}; AC {}, max HP {} ({}), Speed [{}]",
            self.abilities, self.armor_class, self.max_hp, self.hit_dice, self.speed
        )
    }
}
