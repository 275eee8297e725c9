//! Combatants
//!
//! One participant in an encounter: an owned statblock plus live hit points,
//! initiative and a player-character flag.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dice::roll_d20_with;
use super::error::CombatError;
use super::statblock::StatBlock;
use crate::stats::Ability;

/// Outcome of one recharge roll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RechargeRoll {
    pub action: String,
    pub roll: u32,
    pub recovered: bool,
}

/// Snapshot form; id and current HP may be absent. Values are checked by
/// `Encounter::from_snapshot`, not clamped here.
#[derive(Deserialize)]
struct CombatantRecord {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    #[serde(default)]
    initiative: Option<i32>,
    #[serde(default)]
    current_hp: Option<i32>,
    #[serde(default)]
    is_pc: bool,
    statblock: StatBlock,
}

impl From<CombatantRecord> for Combatant {
    fn from(record: CombatantRecord) -> Self {
        let current_hp = record.current_hp.unwrap_or(record.statblock.max_hp);
        Self {
            id: record.id.unwrap_or_else(Uuid::new_v4),
            name: record.name,
            initiative: record.initiative,
            current_hp,
            is_pc: record.is_pc,
            statblock: record.statblock,
        }
    }
}

/// A participant in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CombatantRecord")]
pub struct Combatant {
    pub id: Uuid,
    pub name: String,
    pub initiative: Option<i32>,
    pub current_hp: i32,
    pub is_pc: bool,
    pub statblock: StatBlock,
}

impl Combatant {
    /// Wrap a statblock at full HP, without initiative
    pub fn new(name: impl Into<String>, statblock: StatBlock) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initiative: None,
            current_hp: statblock.max_hp.max(0),
            is_pc: false,
            statblock,
        }
    }

    /// Instantiate a template. The statblock is cloned so duplicates never
    /// share action state.
    pub fn from_template(name: impl Into<String>, template: &StatBlock) -> Self {
        Self::new(name, template.clone())
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = Some(initiative);
        self
    }

    pub fn with_current_hp(mut self, hp: i32) -> Self {
        self.update_hp(hp);
        self
    }

    pub fn player(mut self) -> Self {
        self.is_pc = true;
        self
    }

    pub fn max_hp(&self) -> i32 {
        self.statblock.max_hp
    }

    pub fn is_down(&self) -> bool {
        self.current_hp == 0
    }

    /// Lose HP, never below 0
    pub fn take_damage(&mut self, amount: u32) {
        let hp = i64::from(self.current_hp) - i64::from(amount);
        self.current_hp = hp.max(0) as i32;
    }

    /// Regain HP, never above max. HP already above max is left alone.
    pub fn heal(&mut self, amount: u32) {
        if self.current_hp >= self.max_hp() {
            return;
        }
        let hp = i64::from(self.current_hp) + i64::from(amount);
        self.current_hp = hp.min(i64::from(self.max_hp())) as i32;
    }

    /// Set HP directly, clamped at 0 only
    pub fn update_hp(&mut self, hp: i32) {
        self.current_hp = hp.max(0);
    }

    pub fn set_initiative(&mut self, initiative: i32) {
        self.initiative = Some(initiative);
    }

    /// d20 + DEX modifier, assigned as this combatant's initiative
    pub fn roll_initiative_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i32 {
        let roll = (roll_d20_with(rng) as i32)
            .saturating_add(self.statblock.abilities.modifier(Ability::Dex));
        self.set_initiative(roll);
        roll
    }

    /// Re-roll every spent recharge action
    pub fn recharge_actions_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<RechargeRoll> {
        self.statblock
            .all_actions_mut()
            .filter_map(|action| {
                action.recharge_with(&mut *rng).map(|roll| RechargeRoll {
                    action: action.name.clone(),
                    roll,
                    recovered: action.available,
                })
            })
            .collect()
    }

    pub fn recharge_actions(&mut self) -> Vec<RechargeRoll> {
        self.recharge_actions_with(&mut rand::rng())
    }

    /// Trigger an action by name. Recharge actions become unavailable.
    pub fn use_action(&mut self, name: &str) -> Result<(), CombatError> {
        let combatant = self.name.clone();
        let action = self
            .statblock
            .action_mut(name)
            .ok_or_else(|| CombatError::NoSuchAction {
                combatant: combatant.clone(),
                action: name.to_string(),
            })?;
        if !action.trigger() {
            return Err(CombatError::ActionUnavailable {
                combatant,
                action: action.name.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Combatant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_pc {
            write!(f, " [PC]")?;
        }
        match self.initiative {
            Some(init) => write!(f, " (init {})", init)?,
            None => write!(f, " (no init)")?,
        }
        write!(f, " HP {}/{}", self.current_hp, self.max_hp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::action::Action;
    use crate::combat::dice::testing::LowRolls;
    use crate::stats::{AbilityScores, Speed};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn goblin() -> StatBlock {
        let mut sb = StatBlock::new("Goblin", AbilityScores::new(8, 14, 10, 10, 8, 8), Speed::walk(30), 14);
        sb.actions.push(Action::new("Scimitar"));
        sb.actions.push(Action::with_recharge("Dirty Trick", 5).unwrap());
        sb
    }

    #[test]
    fn test_new_defaults_to_max_hp() {
        let c = Combatant::new("Goblin A", goblin());
        assert_eq!(c.current_hp, 14);
        assert_eq!(c.initiative, None);
        assert!(!c.is_pc);
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut c = Combatant::new("Goblin A", goblin());
        c.take_damage(5);
        assert_eq!(c.current_hp, 9);
        c.take_damage(100);
        assert_eq!(c.current_hp, 0);
        assert!(c.is_down());
        c.heal(3);
        assert_eq!(c.current_hp, 3);
        c.heal(100);
        assert_eq!(c.current_hp, 14);
    }

    #[test]
    fn test_damage_then_heal_at_max() {
        for amount in [0, 1, 7, 14, 50] {
            let mut c = Combatant::new("Goblin A", goblin());
            c.take_damage(amount);
            c.heal(amount);
            assert_eq!(c.current_hp, 14);
        }
    }

    #[test]
    fn test_update_hp_override() {
        let mut c = Combatant::new("Goblin A", goblin());
        c.update_hp(-4);
        assert_eq!(c.current_hp, 0);
        c.update_hp(20);
        assert_eq!(c.current_hp, 20);
        c.heal(5);
        assert_eq!(c.current_hp, 20);
    }

    #[test]
    fn test_templates_do_not_share_state() {
        let template = goblin();
        let mut a = Combatant::from_template("Goblin A", &template);
        let b = Combatant::from_template("Goblin B", &template);
        a.use_action("Dirty Trick").unwrap();
        assert!(!a.statblock.actions[1].available);
        assert!(b.statblock.actions[1].available);
        assert!(template.actions[1].available);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_use_action() {
        let mut c = Combatant::new("Goblin A", goblin());
        c.use_action("scimitar").unwrap();
        c.use_action("Scimitar").unwrap();
        c.use_action("Dirty Trick").unwrap();
        assert!(matches!(
            c.use_action("Dirty Trick"),
            Err(CombatError::ActionUnavailable { .. })
        ));
        assert!(matches!(
            c.use_action("Fireball"),
            Err(CombatError::NoSuchAction { .. })
        ));
    }

    #[test]
    fn test_recharge_rolls_only_spent_actions() {
        let mut c = Combatant::new("Goblin A", goblin());
        assert!(c.recharge_actions_with(&mut LowRolls).is_empty());

        c.use_action("Dirty Trick").unwrap();
        let rolls = c.recharge_actions_with(&mut LowRolls);
        assert_eq!(
            rolls,
            vec![RechargeRoll {
                action: "Dirty Trick".to_string(),
                roll: 1,
                recovered: false
            }]
        );
    }

    #[test]
    fn test_recharge_includes_legendary() {
        let mut sb = goblin();
        let mut lair = Action::with_recharge("Lair Burst", 2).unwrap();
        lair.available = false;
        sb.legendary_actions.push(lair);
        let mut c = Combatant::new("Boss", sb);

        let mut rng = StdRng::seed_from_u64(3);
        let rolls = c.recharge_actions_with(&mut rng);
        assert_eq!(rolls.len(), 1);
        assert_eq!(rolls[0].action, "Lair Burst");
        assert_eq!(c.statblock.legendary_actions[0].available, rolls[0].roll >= 2);
    }

    #[test]
    fn test_roll_initiative() {
        let mut c = Combatant::new("Goblin A", goblin());
        // d20 lands on 1, DEX 14 adds 2
        assert_eq!(c.roll_initiative_with(&mut LowRolls), 3);
        assert_eq!(c.initiative, Some(3));
    }

    #[test]
    fn test_roll_initiative_extreme_dex() {
        let mut low = goblin();
        low.abilities.dex = i32::MIN;
        let mut c = Combatant::new("Odd", low);
        assert_eq!(c.roll_initiative_with(&mut LowRolls), 1 - 1_073_741_829);

        let mut high = goblin();
        high.abilities.dex = i32::MAX;
        let mut c = Combatant::new("Odd", high);
        let mut rng = StdRng::seed_from_u64(1);
        let init = c.roll_initiative_with(&mut rng);
        assert!((1_073_741_819..=1_073_741_838).contains(&init));
    }

    #[test]
    fn test_record_without_hp_or_id() {
        let c: Combatant = serde_json::from_value(serde_json::json!({
            "name": "Goblin A",
            "initiative": 12,
            "statblock": {
                "max_hp": 7,
                "abilities": {"STR": 8, "DEX": 14, "CON": 10, "INT": 10, "WIS": 8, "CHA": 8}
            }
        }))
        .unwrap();
        assert_eq!(c.current_hp, 7);
        assert_eq!(c.initiative, Some(12));
        assert!(!c.is_pc);
    }

    #[test]
    fn test_display() {
        let c = Combatant::new("Hero", goblin()).player().with_initiative(18);
        assert_eq!(c.to_string(), "Hero [PC] (init 18) HP 14/14");
    }
}
