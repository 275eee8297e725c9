//! Combat engine
//!
//! Tracks live encounter state, not rules:
//! - Dice notation (e.g., "2d6+3") with injectable randomness
//! - Simplified actions with d6 recharge
//! - Engine statblocks built from bestiary entries
//! - Combatants with clamped hit points and initiative
//! - The encounter turn engine and its JSON snapshots

mod action;
mod combatant;
mod demo;
mod dice;
mod encounter;
mod error;
mod statblock;

pub use action::{Action, RECHARGE_RANGE};
pub use combatant::{Combatant, RechargeRoll};
pub use demo::default_encounter;
pub use dice::{parse_dice, roll_d20_with, roll_die_with, DiceError, DiceRoll};
pub use encounter::{Encounter, EncounterSnapshot, Target};
pub use error::CombatError;
pub use statblock::StatBlock;
