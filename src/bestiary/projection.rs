//! Flat row projection for bulk listing
//!
//! One statblock becomes one row of scalar columns. Lists are joined into
//! display strings, speed and abilities expand into one column per mode or
//! ability. Spellcasting is not projected.

use serde_json::{Map, Number, Value};

use super::parser::ParseError;
use super::statblock::{ActionEntry, ArmorClass, StatBlock};

/// A flattened statblock
pub type Row = Map<String, Value>;

fn opt_string(value: Option<&str>) -> Value {
    value.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null)
}

fn opt_int(value: Option<i64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

fn render_actions(actions: &[ActionEntry]) -> String {
    let parts: Vec<String> = actions.iter().map(ActionEntry::render).collect();
    parts.join("; ")
}

impl StatBlock {
    /// Flatten into a single row
    pub fn to_row(&self) -> Result<Row, ParseError> {
        let mut row = Row::new();

        row.insert("name".into(), self.name.clone().into());
        row.insert("size".into(), self.size.join(", ").into());
        row.insert("type".into(), self.creature_type.label().into());
        row.insert("source".into(), self.source.clone().into());
        row.insert("alignment".into(), self.alignment.join(", ").into());
        row.insert(
            "ac".into(),
            match &self.ac {
                ArmorClass::Flat(ac) => Value::from(*ac),
                other => Value::String(other.to_string()),
            },
        );
        row.insert("hp_avg".into(), opt_int(self.hp.average));
        row.insert("hp_formula".into(), opt_string(self.hp.formula.as_deref()));
        row.insert("passive".into(), opt_int(self.passive));
        row.insert("languages".into(), self.languages.join(", ").into());
        row.insert("page".into(), opt_int(self.page.map(i64::from)));
        row.insert("senses".into(), self.senses.join(", ").into());

        match &self.cr {
            Some(cr) => {
                row.insert("cr".into(), cr.display().into());
                let value = match cr.value {
                    Some(v) => Value::Number(Number::from_f64(v).ok_or_else(|| {
                        ParseError::Projection {
                            monster: self.name.clone(),
                            field: "cr".to_string(),
                        }
                    })?),
                    None => Value::Null,
                };
                row.insert("cr_value".into(), value);
            }
            None => {
                row.insert("cr".into(), Value::Null);
                row.insert("cr_value".into(), Value::Null);
            }
        }

        for (mode, value) in self.speed.modes() {
            row.insert(format!("speed_{}", mode), value.to_string().into());
        }

        for (ability, score) in self.abilities.iter() {
            row.insert(ability.key().to_string(), score.into());
        }

        row.insert("resist".into(), self.resist.render().into());
        row.insert("immune".into(), self.immune.render().into());
        row.insert("vulnerable".into(), self.vulnerable.render().into());
        row.insert("conditionImmune".into(), self.condition_immune.join(", ").into());

        row.insert("trait".into(), render_actions(&self.traits).into());
        row.insert("action".into(), render_actions(&self.actions).into());
        if !self.bonus_actions.is_empty() {
            row.insert("bonus".into(), render_actions(&self.bonus_actions).into());
        }
        if !self.reactions.is_empty() {
            row.insert("reaction".into(), render_actions(&self.reactions).into());
        }
        if let Some(legendary) = self.legendary.as_deref().filter(|l| !l.is_empty()) {
            row.insert("legendary".into(), render_actions(legendary).into());
        }

        Ok(row)
    }
}
