//! lairkeep - monster statblocks and initiative tracking
//!
//! Parses loosely-shaped bestiary documents into typed statblocks, and runs
//! a turn-based encounter tracker with recharge abilities and JSON snapshots.

pub mod bestiary;
pub mod combat;
pub mod config;
pub mod stats;

pub use combat::{default_encounter, Combatant, CombatError, Encounter, EncounterSnapshot};
pub use config::{Config, ConfigError};
