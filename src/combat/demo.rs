//! Built-in demo encounter

use super::action::Action;
use super::combatant::Combatant;
use super::encounter::Encounter;
use super::statblock::StatBlock;
use crate::stats::{AbilityScores, Speed};

fn statblock(
    name: &str,
    abilities: AbilityScores,
    hit_dice: &str,
    max_hp: i32,
    actions: Vec<Action>,
) -> StatBlock {
    let mut sb = StatBlock::new(name, abilities, Speed::walk(30), max_hp);
    sb.hit_dice = hit_dice.to_string();
    sb.actions = actions;
    sb
}

/// Three-combatant demo: one hero against two goblins, already in turn order
pub fn default_encounter() -> Encounter {
    let hero = statblock(
        "Fighter",
        AbilityScores::new(16, 14, 14, 10, 12, 10),
        "5d10",
        35,
        vec![
            Action {
                name: "Cleave".to_string(),
                recharge: Some(6),
                available: true,
            },
            Action::new("Shield Bash"),
        ],
    );

    let goblin = statblock(
        "Goblin",
        AbilityScores::new(8, 14, 10, 8, 8, 8),
        "2d6",
        14,
        vec![Action::new("Slash")],
    );

    let king = statblock(
        "Goblin King",
        AbilityScores::new(14, 12, 12, 10, 10, 10),
        "4d8",
        22,
        vec![
            Action::new("Javelin"),
            Action {
                name: "Poison Breath".to_string(),
                recharge: Some(2),
                available: true,
            },
        ],
    );

    Encounter::from_ordered(vec![
        Combatant::new("Hero 1", hero).with_initiative(18).player(),
        Combatant::new("Goblin A", goblin)
            .with_initiative(15)
            .with_current_hp(12),
        Combatant::new("Goblin King", king)
            .with_initiative(10)
            .with_current_hp(20),
    ])
}
