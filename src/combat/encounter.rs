//! Encounter turn engine
//!
//! Orders combatants by initiative and tracks whose turn it is:
//! - Stable descending sort at construction, never re-sorted afterwards
//! - `next_turn` advances the pointer, recharges the incoming actor, and
//!   bumps the round on wrap-around
//! - Snapshots reproduce the exact turn order they were taken from

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use super::action::RECHARGE_RANGE;
use super::combatant::{Combatant, RechargeRoll};
use super::error::CombatError;

/// Addresses one combatant by position or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for Target<'_> {
    fn from(index: usize) -> Self {
        Target::Index(index)
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(name: &'a str) -> Self {
        Target::Name(name)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(name: &'a String) -> Self {
        Target::Name(name)
    }
}

/// Serialized encounter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub round: u32,
    pub turn_index: usize,
    pub combatants: Vec<Combatant>,
}

/// A running combat encounter
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    combatants: Vec<Combatant>,
    turn_index: usize,
    round: u32,
}

impl Encounter {
    /// Build an encounter, sorting by descending initiative. Ties keep their
    /// input order.
    pub fn new(mut combatants: Vec<Combatant>) -> Result<Self, CombatError> {
        validate_roster(&combatants)?;
        combatants.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        debug!(combatants = combatants.len(), "encounter created");
        Ok(Self::from_ordered(combatants))
    }

    /// Wrap combatants already in turn order. Caller guarantees the list is
    /// non-empty and every initiative is assigned.
    pub(crate) fn from_ordered(combatants: Vec<Combatant>) -> Self {
        Self {
            combatants,
            turn_index: 0,
            round: 1,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// All combatants in turn order
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// The combatant whose turn it is
    pub fn current(&self) -> &Combatant {
        &self.combatants[self.turn_index]
    }

    /// Combatants who already acted this round
    pub fn previous(&self) -> &[Combatant] {
        &self.combatants[..self.turn_index]
    }

    /// Combatants still to act this round
    pub fn upcoming(&self) -> &[Combatant] {
        &self.combatants[self.turn_index + 1..]
    }

    /// Advance to the next combatant. Their spent recharge actions are rolled
    /// at the start of their turn.
    pub fn next_turn_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<RechargeRoll> {
        self.turn_index = (self.turn_index + 1) % self.combatants.len();
        let rolls = self.combatants[self.turn_index].recharge_actions_with(rng);
        if self.turn_index == 0 {
            self.round += 1;
        }
        info!(
            round = self.round,
            turn = self.turn_index,
            combatant = %self.current().name,
            "turn started"
        );
        rolls
    }

    pub fn next_turn(&mut self) -> Vec<RechargeRoll> {
        self.next_turn_with(&mut rand::rng())
    }

    /// Position of the first combatant with this name (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.combatants
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn get<'a>(&self, target: impl Into<Target<'a>>) -> Result<&Combatant, CombatError> {
        let index = self.resolve(target.into())?;
        Ok(&self.combatants[index])
    }

    pub fn get_mut<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
    ) -> Result<&mut Combatant, CombatError> {
        let index = self.resolve(target.into())?;
        Ok(&mut self.combatants[index])
    }

    fn resolve(&self, target: Target<'_>) -> Result<usize, CombatError> {
        match target {
            Target::Index(i) if i < self.combatants.len() => Ok(i),
            Target::Index(i) => Err(CombatError::NoSuchIndex(i)),
            Target::Name(name) => {
                let mut matches = self
                    .combatants
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.name.eq_ignore_ascii_case(name))
                    .map(|(i, _)| i);
                match (matches.next(), matches.next()) {
                    (Some(i), None) => Ok(i),
                    (Some(_), Some(_)) => Err(CombatError::AmbiguousName(name.to_string())),
                    (None, _) => Err(CombatError::NoSuchCombatant(name.to_string())),
                }
            }
        }
    }

    pub fn take_damage<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        amount: u32,
    ) -> Result<&Combatant, CombatError> {
        let combatant = self.get_mut(target)?;
        combatant.take_damage(amount);
        debug!(combatant = %combatant.name, amount, hp = combatant.current_hp, "damage taken");
        Ok(combatant)
    }

    pub fn heal<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        amount: u32,
    ) -> Result<&Combatant, CombatError> {
        let combatant = self.get_mut(target)?;
        combatant.heal(amount);
        debug!(combatant = %combatant.name, amount, hp = combatant.current_hp, "healed");
        Ok(combatant)
    }

    pub fn update_hp<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        hp: i32,
    ) -> Result<&Combatant, CombatError> {
        let combatant = self.get_mut(target)?;
        combatant.update_hp(hp);
        debug!(combatant = %combatant.name, hp = combatant.current_hp, "hp set");
        Ok(combatant)
    }

    /// Use an action; recharge actions become unavailable
    pub fn trigger_action<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        action: &str,
    ) -> Result<&Combatant, CombatError> {
        let combatant = self.get_mut(target)?;
        combatant.use_action(action)?;
        debug!(combatant = %combatant.name, action, "action used");
        Ok(combatant)
    }

    /// A new encounter with extra combatants sorted in. The round and the
    /// current actor carry over.
    pub fn with_added(self, extra: Vec<Combatant>) -> Result<Self, CombatError> {
        let current_id = self.current().id;
        let round = self.round;

        let mut combatants = self.combatants;
        combatants.extend(extra);
        let mut encounter = Self::new(combatants)?;

        encounter.round = round;
        encounter.turn_index = encounter
            .combatants
            .iter()
            .position(|c| c.id == current_id)
            .unwrap_or(0);
        Ok(encounter)
    }

    pub fn to_snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            round: self.round,
            turn_index: self.turn_index,
            combatants: self.combatants.clone(),
        }
    }

    /// Rebuild from a snapshot, keeping its combatant order as-is
    pub fn from_snapshot(snapshot: EncounterSnapshot) -> Result<Self, CombatError> {
        validate_roster(&snapshot.combatants)?;
        if snapshot.round < 1 {
            return Err(CombatError::InvalidRound);
        }
        if snapshot.turn_index >= snapshot.combatants.len() {
            return Err(CombatError::TurnIndexOutOfRange {
                turn_index: snapshot.turn_index,
                len: snapshot.combatants.len(),
            });
        }
        for combatant in &snapshot.combatants {
            if combatant.statblock.max_hp <= 0 {
                return Err(CombatError::InvalidMaxHp {
                    combatant: combatant.name.clone(),
                    max_hp: combatant.statblock.max_hp,
                });
            }
            if combatant.current_hp < 0 {
                return Err(CombatError::NegativeHp {
                    combatant: combatant.name.clone(),
                    hp: combatant.current_hp,
                });
            }
            for action in combatant.statblock.all_actions() {
                if let Some(threshold) = action.recharge.filter(|t| !RECHARGE_RANGE.contains(t)) {
                    return Err(CombatError::InvalidRecharge {
                        action: action.name.clone(),
                        threshold,
                    });
                }
            }
        }

        Ok(Self {
            combatants: snapshot.combatants,
            turn_index: snapshot.turn_index,
            round: snapshot.round,
        })
    }

    pub fn to_json(&self) -> Result<String, CombatError> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self, CombatError> {
        let snapshot: EncounterSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Write a snapshot atomically: a temporary file in the same directory
    /// is persisted over `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CombatError> {
        let path = path.as_ref();
        let json = self.to_json()?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), round = self.round, "encounter saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CombatError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let encounter = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            round = encounter.round,
            combatants = encounter.combatants.len(),
            "encounter loaded"
        );
        Ok(encounter)
    }
}

impl std::fmt::Display for Encounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Round {}", self.round)?;
        for (i, combatant) in self.combatants.iter().enumerate() {
            let marker = if i == self.turn_index { ">" } else { " " };
            writeln!(f, "{} {}", marker, combatant)?;
        }
        Ok(())
    }
}

fn validate_roster(combatants: &[Combatant]) -> Result<(), CombatError> {
    if combatants.is_empty() {
        return Err(CombatError::EmptyEncounter);
    }
    if let Some(c) = combatants.iter().find(|c| c.initiative.is_none()) {
        return Err(CombatError::MissingInitiative(c.name.clone()));
    }
    Ok(())
}
