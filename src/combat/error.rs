use thiserror::Error;

/// Encounter validation, lookup and snapshot errors
#[derive(Debug, Error)]
pub enum CombatError {
    #[error("an encounter needs at least one combatant")]
    EmptyEncounter,

    #[error("combatant {0} has no initiative")]
    MissingInitiative(String),

    #[error("turn index {turn_index} out of range for {len} combatants")]
    TurnIndexOutOfRange { turn_index: usize, len: usize },

    #[error("round must be at least 1")]
    InvalidRound,

    #[error("{combatant}: current HP {hp} is negative")]
    NegativeHp { combatant: String, hp: i32 },

    #[error("{combatant}: max HP {max_hp} must be positive")]
    InvalidMaxHp { combatant: String, max_hp: i32 },

    #[error("name {0} matches more than one combatant")]
    AmbiguousName(String),

    #[error("recharge threshold {threshold} for {action} is outside 2-6")]
    InvalidRecharge { action: String, threshold: u8 },

    #[error("no combatant named {0}")]
    NoSuchCombatant(String),

    #[error("no combatant at index {0}")]
    NoSuchIndex(usize),

    #[error("{combatant} has no action named {action}")]
    NoSuchAction { combatant: String, action: String },

    #[error("{combatant}: {action} is not available")]
    ActionUnavailable { combatant: String, action: String },

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
