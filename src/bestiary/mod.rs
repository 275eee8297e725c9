//! Bestiary statblocks
//!
//! Parses loosely-typed monster documents into strongly-typed statblocks:
//! - Tolerant field-shape normalization (alignment, speed, CR, ...)
//! - Damage resistance/immunity/vulnerability sets
//! - Prose entry trees for traits and actions
//! - Flat row projection for bulk listing
//! - Batch loading that survives bad records

mod damage;
mod entries;
mod load;
mod parser;
mod projection;
mod statblock;

pub use damage::{DamageEntry, DamageModifierKind, DamageModifiers};
pub use entries::{TextEntry, MAX_ENTRY_DEPTH};
pub use load::{load_bestiary, rows, BestiaryLoad, RecordFailure};
pub use parser::{parse_statblock, ParseError};
pub use projection::Row;
pub use statblock::{
    cr_value, ActionEntry, ArmorClass, ChallengeRating, CreatureType, HitPoints, SpellSlot,
    Spellcasting, StatBlock,
};
