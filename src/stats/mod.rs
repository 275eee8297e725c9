//! Shared creature statistics
//!
//! Ability scores and movement speeds, used by both the parsed bestiary
//! statblock and the combat engine's statblock.

mod abilities;
mod speed;

pub use abilities::{modifier, Ability, AbilityScores};
pub use speed::{MovementMode, Speed, SpeedValue, UnknownMovementMode};
