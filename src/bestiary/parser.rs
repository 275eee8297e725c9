//! Statblock parser
//!
//! Converts one decoded monster document into a [`StatBlock`]. Required
//! fields fail fast with a [`ParseError`] naming the monster and field;
//! everything else defaults to empty. Fields that appear in several shapes
//! across the source data are normalized here and nowhere else.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use super::damage::{DamageModifierKind, DamageModifiers};
use super::entries::TextEntry;
use super::statblock::{
    ActionEntry, ArmorClass, ChallengeRating, CreatureType, HitPoints, SpellSlot,
    Spellcasting, StatBlock,
};
use crate::stats::{Ability, AbilityScores, Speed, SpeedValue, UnknownMovementMode};

/// Name used in errors for records without a usable name
const UNNAMED: &str = "<unnamed>";

/// Errors from parsing or projecting a monster document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("monster record is not a JSON object")]
    NotAnObject,

    #[error("{monster}: missing required field `{field}`")]
    MissingField { monster: String, field: String },

    #[error("{monster}: field `{field}` must be {expected}")]
    InvalidField {
        monster: String,
        field: String,
        expected: &'static str,
    },

    #[error("{monster}: {source}")]
    UnknownMovementMode {
        monster: String,
        source: UnknownMovementMode,
    },

    #[error("{monster}: cannot flatten field `{field}`")]
    Projection { monster: String, field: String },
}

impl ParseError {
    /// Name of the monster the error belongs to
    pub fn monster(&self) -> Option<&str> {
        match self {
            ParseError::NotAnObject => None,
            ParseError::MissingField { monster, .. }
            | ParseError::InvalidField { monster, .. }
            | ParseError::UnknownMovementMode { monster, .. }
            | ParseError::Projection { monster, .. } => Some(monster),
        }
    }
}

/// Parse one monster document
pub fn parse_statblock(value: &Value) -> Result<StatBlock, ParseError> {
    let obj = value.as_object().ok_or(ParseError::NotAnObject)?;
    let doc = Doc::new(obj);

    let name = doc.required_str("name")?.to_string();
    debug!(monster = %name, "parsing statblock");

    let statblock = StatBlock {
        size: doc.string_list(doc.required("size")?, "size")?,
        creature_type: doc.creature_type()?,
        source: doc.required_str("source")?.to_string(),
        alignment: doc.alignment()?,
        ac: doc.armor_class()?,
        hp: doc.hit_points()?,
        speed: doc.speed()?,
        abilities: doc.abilities()?,
        saves: doc.label_map("save")?,
        skills: doc.label_map("skill")?,
        resist: doc.damage(DamageModifierKind::Resist),
        immune: doc.damage(DamageModifierKind::Immune),
        vulnerable: doc.damage(DamageModifierKind::Vulnerable),
        condition_immune: doc.condition_immune(),
        senses: doc.optional_string_list("senses")?,
        passive: doc.passive(),
        languages: doc.optional_string_list("languages")?,
        cr: doc.challenge_rating()?,
        traits: doc.action_list("trait")?,
        actions: doc.action_list("action")?,
        bonus_actions: doc.action_list("bonus")?,
        reactions: doc.action_list("reaction")?,
        legendary: match doc.get("legendary") {
            Some(_) => Some(doc.action_list("legendary")?),
            None => None,
        },
        legendary_group: doc
            .get("legendaryGroup")
            .and_then(|g| g.get("name").or(Some(g)))
            .and_then(Value::as_str)
            .map(str::to_string),
        page: doc
            .get("page")
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok()),
        spellcasting: doc.spellcasting()?,
        name,
    };

    Ok(statblock)
}

/// A monster document being parsed, with its name for error reporting
struct Doc<'a> {
    obj: &'a Map<String, Value>,
    monster: String,
}

impl<'a> Doc<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        let monster = obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNNAMED)
            .to_string();
        Self { obj, monster }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        match self.obj.get(field) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    fn missing(&self, field: &str) -> ParseError {
        ParseError::MissingField {
            monster: self.monster.clone(),
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: impl Into<String>, expected: &'static str) -> ParseError {
        ParseError::InvalidField {
            monster: self.monster.clone(),
            field: field.into(),
            expected,
        }
    }

    fn required(&self, field: &str) -> Result<&'a Value, ParseError> {
        self.get(field).ok_or_else(|| self.missing(field))
    }

    fn required_str(&self, field: &str) -> Result<&'a str, ParseError> {
        self.required(field)?
            .as_str()
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    /// A string or a list of strings
    fn string_list(&self, value: &Value, field: &str) -> Result<Vec<String>, ParseError> {
        match value {
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(field, "a string or list of strings"))
                })
                .collect(),
            _ => Err(self.invalid(field, "a string or list of strings")),
        }
    }

    fn optional_string_list(&self, field: &str) -> Result<Vec<String>, ParseError> {
        match self.get(field) {
            Some(value) => self.string_list(value, field),
            None => Ok(Vec::new()),
        }
    }

    fn creature_type(&self) -> Result<CreatureType, ParseError> {
        match self.required("type")? {
            Value::String(t) => Ok(CreatureType::Plain(t.clone())),
            Value::Object(obj) => {
                let type_ = match obj.get("type") {
                    Some(Value::String(t)) => t.clone(),
                    // {"type": {"choose": ["beast", "monstrosity"]}}
                    Some(Value::Object(inner)) => match inner.get("choose") {
                        Some(choices) => self.string_list(choices, "type.type.choose")?.join("/"),
                        None => return Err(self.invalid("type.type", "a string")),
                    },
                    _ => return Err(self.invalid("type.type", "a string")),
                };
                let tags = match obj.get("tags") {
                    Some(Value::Array(tags)) => tags.iter().map(tag_label).collect(),
                    _ => Vec::new(),
                };
                if tags.is_empty() {
                    Ok(CreatureType::Plain(type_))
                } else {
                    Ok(CreatureType::Tagged { type_, tags })
                }
            }
            _ => Err(self.invalid("type", "a string or {type, tags} object")),
        }
    }

    fn alignment(&self) -> Result<Vec<String>, ParseError> {
        match self.required("alignment")? {
            Value::String(a) => Ok(vec![a.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| self.alignment_entry(item))
                .collect(),
            _ => Err(self.invalid("alignment", "a string or list")),
        }
    }

    /// `"L"` or `{"alignment": ["L", "E"], "chance": 50}` -> `"L,E 50%"`
    fn alignment_entry(&self, item: &Value) -> Result<String, ParseError> {
        match item {
            Value::String(a) => Ok(a.clone()),
            Value::Object(obj) => {
                if let Some(special) = obj.get("special").and_then(Value::as_str) {
                    return Ok(special.to_string());
                }
                let components = obj
                    .get("alignment")
                    .ok_or_else(|| self.missing("alignment[].alignment"))?;
                let mut rendered = self
                    .string_list(components, "alignment[].alignment")?
                    .join(",");
                if let Some(chance) = obj.get("chance") {
                    let chance = match chance {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    rendered.push_str(&format!(" {}%", chance));
                }
                Ok(rendered)
            }
            _ => Err(self.invalid("alignment[]", "a string or {alignment, chance} object")),
        }
    }

    fn armor_class(&self) -> Result<ArmorClass, ParseError> {
        let value = match self.required("ac")? {
            // bestiary files list alternatives; the first is the headline value
            Value::Array(items) => items.first().ok_or_else(|| self.invalid("ac", "non-empty"))?,
            other => other,
        };
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(ArmorClass::Flat)
                .ok_or_else(|| self.invalid("ac", "an integer")),
            Value::String(s) => Ok(ArmorClass::Text(s.clone())),
            Value::Object(obj) => {
                if let Some(ac) = obj.get("ac").and_then(Value::as_i64) {
                    let from = match obj.get("from") {
                        Some(from) => self.string_list(from, "ac.from")?,
                        None => Vec::new(),
                    };
                    Ok(ArmorClass::Described {
                        ac,
                        from,
                        condition: obj
                            .get("condition")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                } else if let Some(special) = obj.get("special").and_then(Value::as_str) {
                    Ok(ArmorClass::Text(special.to_string()))
                } else {
                    Err(self.invalid("ac", "an integer, text or {ac, from} object"))
                }
            }
            _ => Err(self.invalid("ac", "an integer, text or {ac, from} object")),
        }
    }

    fn hit_points(&self) -> Result<HitPoints, ParseError> {
        match self.required("hp")? {
            Value::Number(n) => Ok(HitPoints {
                average: Some(n.as_i64().ok_or_else(|| self.invalid("hp", "an integer"))?),
                ..HitPoints::default()
            }),
            Value::Object(obj) => {
                let average = match obj.get("average") {
                    Some(Value::Null) | None => None,
                    Some(v) => Some(
                        v.as_i64()
                            .ok_or_else(|| self.invalid("hp.average", "an integer"))?,
                    ),
                };
                Ok(HitPoints {
                    average,
                    formula: obj.get("formula").and_then(Value::as_str).map(str::to_string),
                    special: obj.get("special").and_then(Value::as_str).map(str::to_string),
                })
            }
            _ => Err(self.invalid("hp", "an {average, formula} object")),
        }
    }

    fn speed(&self) -> Result<Speed, ParseError> {
        let obj = self
            .required("speed")?
            .as_object()
            .ok_or_else(|| self.invalid("speed", "an object"))?;

        let mut speed = Speed::new();
        for (mode, value) in obj {
            match mode.as_str() {
                "canHover" => {
                    speed.can_hover = value.as_bool().unwrap_or(false);
                    continue;
                }
                "alternate" | "choose" => {
                    debug!(monster = %self.monster, key = %mode, "ignoring speed key");
                    continue;
                }
                _ => {}
            }
            let field = format!("speed.{}", mode);
            let rate = match value {
                Value::Number(_) => SpeedValue::Flat(self.rate(value, &field)?),
                Value::Object(entry) => SpeedValue::Conditioned {
                    number: self.rate(
                        entry.get("number").ok_or_else(|| self.missing(&field))?,
                        &field,
                    )?,
                    condition: entry
                        .get("condition")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
                _ => return Err(self.invalid(field, "a number or {number, condition} object")),
            };
            speed
                .set_named(mode, rate)
                .map_err(|source| ParseError::UnknownMovementMode {
                    monster: self.monster.clone(),
                    source,
                })?;
        }
        Ok(speed)
    }

    fn rate(&self, value: &Value, field: &str) -> Result<u32, ParseError> {
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.invalid(field, "a non-negative integer"))
    }

    fn abilities(&self) -> Result<AbilityScores, ParseError> {
        let score = |ability: Ability| -> Result<i32, ParseError> {
            let key = ability.key();
            self.required(key)?
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| self.invalid(key, "an integer"))
        };
        Ok(AbilityScores::new(
            score(Ability::Str)?,
            score(Ability::Dex)?,
            score(Ability::Con)?,
            score(Ability::Int)?,
            score(Ability::Wis)?,
            score(Ability::Cha)?,
        ))
    }

    /// Save/skill bonus maps: `{"dex": "+5"}`
    fn label_map(&self, field: &str) -> Result<BTreeMap<String, String>, ParseError> {
        let obj = match self.get(field) {
            Some(Value::Object(obj)) => obj,
            Some(_) => return Err(self.invalid(field, "an object")),
            None => return Ok(BTreeMap::new()),
        };
        let mut map = BTreeMap::new();
        for (key, value) in obj {
            match value {
                Value::String(s) => {
                    map.insert(key.clone(), s.clone());
                }
                Value::Number(n) => {
                    map.insert(key.clone(), n.to_string());
                }
                _ => debug!(monster = %self.monster, field, key = %key, "skipping non-scalar bonus"),
            }
        }
        Ok(map)
    }

    fn damage(&self, kind: DamageModifierKind) -> DamageModifiers {
        DamageModifiers::parse(self.get(kind.key()).unwrap_or(&Value::Null), kind)
    }

    fn condition_immune(&self) -> Vec<String> {
        let items = match self.get("conditionImmune") {
            Some(Value::Array(items)) => items,
            Some(Value::String(s)) => return vec![s.clone()],
            _ => return Vec::new(),
        };
        let mut labels = Vec::new();
        for item in items {
            match item {
                Value::String(s) => labels.push(s.clone()),
                Value::Object(obj) => match obj.get("conditionImmune") {
                    Some(Value::Array(inner)) => labels.extend(
                        inner.iter().filter_map(Value::as_str).map(str::to_string),
                    ),
                    _ => labels.push(item.to_string()),
                },
                other => labels.push(other.to_string()),
            }
        }
        labels
    }

    fn passive(&self) -> Option<i64> {
        match self.get("passive")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn challenge_rating(&self) -> Result<Option<ChallengeRating>, ParseError> {
        let value = match self.get("cr") {
            Some(v) => v,
            None => return Ok(None),
        };
        match value {
            Value::Object(obj) => {
                let base = obj.get("cr").ok_or_else(|| self.missing("cr.cr"))?;
                let mut cr = ChallengeRating::new(self.cr_text(base, "cr.cr")?);
                cr.lair = match obj.get("lair") {
                    Some(v) => Some(self.cr_text(v, "cr.lair")?),
                    None => None,
                };
                cr.coven = match obj.get("coven") {
                    Some(v) => Some(self.cr_text(v, "cr.coven")?),
                    None => None,
                };
                Ok(Some(cr))
            }
            other => {
                let mut cr = ChallengeRating::new(self.cr_text(other, "cr")?);
                if let Some(f) = other.as_f64() {
                    cr.value = Some(f);
                }
                Ok(Some(cr))
            }
        }
    }

    fn cr_text(&self, value: &Value, field: &str) -> Result<String, ParseError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Ok(format!("{:.2}", f)),
                None => Err(self.invalid(field, "a number or string")),
            },
            _ => Err(self.invalid(field, "a number, string or {cr, lair, coven} object")),
        }
    }

    fn action_list(&self, field: &str) -> Result<Vec<ActionEntry>, ParseError> {
        let items = match self.get(field) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(self.invalid(field, "a list")),
            None => return Ok(Vec::new()),
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| -> Result<ActionEntry, ParseError> {
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| self.missing(&format!("{}[{}].name", field, i)))?;
                let entries = item
                    .get("entries")
                    .map(TextEntry::parse_list)
                    .unwrap_or_default();
                Ok(ActionEntry {
                    name: name.to_string(),
                    entries,
                })
            })
            .collect()
    }

    fn spellcasting(&self) -> Result<Vec<Spellcasting>, ParseError> {
        let blocks = match self.get("spellcasting") {
            Some(Value::Array(blocks)) => blocks,
            Some(_) => return Err(self.invalid("spellcasting", "a list")),
            None => return Ok(Vec::new()),
        };
        blocks
            .iter()
            .map(|block| -> Result<Spellcasting, ParseError> {
                let mut spells = BTreeMap::new();
                if let Some(Value::Object(levels)) = block.get("spells") {
                    for (level, info) in levels {
                        let level: u32 = level
                            .trim()
                            .parse()
                            .map_err(|_| self.invalid("spellcasting.spells", "keyed by spell level"))?;
                        let slots = info
                            .get("slots")
                            .and_then(Value::as_u64)
                            .and_then(|s| u32::try_from(s).ok());
                        spells.insert(
                            level,
                            SpellSlot {
                                level,
                                slots,
                                spells: text_list(info.get("spells")),
                            },
                        );
                    }
                }
                let daily = match block.get("daily") {
                    Some(Value::Object(freq)) => freq
                        .iter()
                        .map(|(k, v)| (k.clone(), text_list(Some(v))))
                        .collect(),
                    _ => BTreeMap::new(),
                };
                Ok(Spellcasting {
                    name: block
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or("Spellcasting")
                        .to_string(),
                    header_entries: text_list(block.get("headerEntries")),
                    footer_entries: block.get("footerEntries").map(|f| text_list(Some(f))),
                    spells,
                    will: text_list(block.get("will")),
                    daily,
                })
            })
            .collect()
    }
}

/// Tags are strings or `{"tag": "shapechanger", "prefix": "..."}`
fn tag_label(tag: &Value) -> String {
    match tag {
        Value::String(s) => s.clone(),
        Value::Object(obj) => {
            let label = obj.get("tag").and_then(Value::as_str).unwrap_or_default();
            match obj.get("prefix").and_then(Value::as_str) {
                Some(prefix) => format!("{} {}", prefix, label),
                None => label.to_string(),
            }
        }
        other => other.to_string(),
    }
}

/// Lenient list of strings; non-string items are rendered as entries
fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => TextEntry::parse(other).render(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestiary::DamageEntry;
    use crate::stats::MovementMode;
    use serde_json::json;

    fn goblin() -> Value {
        json!({
            "name": "Goblin",
            "source": "MM",
            "page": 166,
            "size": ["S"],
            "type": {"type": "humanoid", "tags": ["goblinoid"]},
            "alignment": ["N", "E"],
            "ac": [{"ac": 15, "from": ["leather armor", "shield"]}],
            "hp": {"average": 7, "formula": "2d6"},
            "speed": {"walk": 30},
            "str": 8, "dex": 14, "con": 10, "int": 10, "wis": 8, "cha": 8,
            "skill": {"stealth": "+6"},
            "senses": ["darkvision 60 ft."],
            "passive": 9,
            "languages": ["Common", "Goblin"],
            "cr": "1/4",
            "trait": [{"name": "Nimble Escape", "entries": ["The goblin can take the Disengage or Hide action."]}],
            "action": [
                {"name": "Scimitar", "entries": ["{@atk mw} {@hit 4} to hit, reach 5 ft."]}
            ]
        })
    }

    fn with(mut doc: Value, key: &str, value: Value) -> Value {
        doc[key] = value;
        doc
    }

    fn without(mut doc: Value, key: &str) -> Value {
        if let Some(obj) = doc.as_object_mut() {
            obj.remove(key);
        }
        doc
    }

    #[test]
    fn test_parse_goblin() {
        let sb = parse_statblock(&goblin()).unwrap();
        assert_eq!(sb.name, "Goblin");
        assert_eq!(sb.size, vec!["S"]);
        assert_eq!(sb.creature_type.to_string(), "humanoid (goblinoid)");
        assert_eq!(sb.alignment, vec!["N", "E"]);
        assert_eq!(sb.ac.value(), Some(15));
        assert_eq!(sb.ac.note().as_deref(), Some("leather armor, shield"));
        assert_eq!(sb.hp.average, Some(7));
        assert_eq!(sb.hp.formula.as_deref(), Some("2d6"));
        assert_eq!(sb.speed.get(MovementMode::Walk), 30);
        assert_eq!(sb.abilities.dex, 14);
        assert_eq!(sb.skills.get("stealth").map(String::as_str), Some("+6"));
        assert_eq!(sb.passive, Some(9));
        assert_eq!(sb.cr.as_ref().map(|c| c.display()), Some("1/4".to_string()));
        assert_eq!(sb.cr.as_ref().and_then(|c| c.value), Some(0.25));
        assert_eq!(sb.traits.len(), 1);
        assert_eq!(sb.actions[0].name, "Scimitar");
        assert!(sb.legendary.is_none());
        assert_eq!(sb.page, Some(166));
    }

    #[test]
    fn test_missing_required_field() {
        for field in ["name", "size", "type", "source", "alignment", "ac", "hp", "speed", "wis"] {
            let err = parse_statblock(&without(goblin(), field)).unwrap_err();
            match err {
                ParseError::MissingField { field: f, .. } => assert_eq!(f, field),
                other => panic!("{}: unexpected {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_error_names_monster() {
        let err = parse_statblock(&without(goblin(), "hp")).unwrap_err();
        assert_eq!(err.monster(), Some("Goblin"));
        assert_eq!(err.to_string(), "Goblin: missing required field `hp`");
    }

    #[test]
    fn test_non_integer_ability_rejected() {
        let err = parse_statblock(&with(goblin(), "str", json!(8.5))).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { ref field, .. } if field == "str"));
        let err = parse_statblock(&with(goblin(), "cha", json!("8"))).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { ref field, .. } if field == "cha"));
    }

    #[test]
    fn test_alignment_shapes() {
        let sb = parse_statblock(&with(goblin(), "alignment", json!("U"))).unwrap();
        assert_eq!(sb.alignment, vec!["U"]);

        let sb = parse_statblock(&with(
            goblin(),
            "alignment",
            json!([{"alignment": ["L", "E"], "chance": 50}, {"alignment": ["N"], "chance": 50}]),
        ))
        .unwrap();
        assert_eq!(sb.alignment, vec!["L,E 50%", "N 50%"]);

        let sb = parse_statblock(&with(
            goblin(),
            "alignment",
            json!([{"special": "any alignment"}]),
        ))
        .unwrap();
        assert_eq!(sb.alignment, vec!["any alignment"]);
    }

    #[test]
    fn test_plain_type() {
        let sb = parse_statblock(&with(goblin(), "type", json!("dragon"))).unwrap();
        assert_eq!(sb.creature_type, CreatureType::Plain("dragon".to_string()));
    }

    #[test]
    fn test_speed_shapes() {
        let sb = parse_statblock(&with(
            goblin(),
            "speed",
            json!({"walk": 10, "fly": {"number": 60, "condition": "(hover)"}, "canHover": true}),
        ))
        .unwrap();
        assert_eq!(sb.speed.get(MovementMode::Fly), 60);
        assert_eq!(
            sb.speed.value(MovementMode::Fly).and_then(SpeedValue::condition),
            Some("(hover)")
        );
        assert_eq!(sb.speed.value(MovementMode::Walk), Some(&SpeedValue::Flat(10)));
        assert!(sb.speed.can_hover);
    }

    #[test]
    fn test_unknown_speed_mode() {
        let err = parse_statblock(&with(goblin(), "speed", json!({"teleport": 30}))).unwrap_err();
        assert!(matches!(err, ParseError::UnknownMovementMode { .. }));
    }

    #[test]
    fn test_challenge_rating_shapes() {
        let cr = |v: Value| {
            parse_statblock(&with(goblin(), "cr", v))
                .unwrap()
                .cr
                .map(|c| c.display())
        };
        assert_eq!(cr(json!(3)), Some("3".to_string()));
        assert_eq!(cr(json!("1/8")), Some("1/8".to_string()));
        assert_eq!(cr(json!(0.5)), Some("0.50".to_string()));
        assert_eq!(cr(json!({"cr": "5", "lair": "7"})), Some("5 (lair 7)".to_string()));
        assert_eq!(cr(json!({"cr": "3", "coven": "5"})), Some("3 (coven 5)".to_string()));
        assert_eq!(parse_statblock(&without(goblin(), "cr")).unwrap().cr, None);
    }

    #[test]
    fn test_float_cr_keeps_numeric_value() {
        let sb = parse_statblock(&with(goblin(), "cr", json!(0.125))).unwrap();
        assert_eq!(sb.cr.and_then(|c| c.value), Some(0.125));
    }

    #[test]
    fn test_damage_sets() {
        let sb = parse_statblock(&with(
            goblin(),
            "immune",
            json!(["poison", {"immune": ["fire"], "note": "while in lava"}]),
        ))
        .unwrap();
        assert_eq!(sb.immune.entries[0], DamageEntry::Type("poison".to_string()));
        assert_eq!(sb.immune.render(), "poison, fire (Note: while in lava)");
        assert!(sb.resist.is_empty());
    }

    #[test]
    fn test_nested_action_entries() {
        let sb = parse_statblock(&with(
            goblin(),
            "action",
            json!([{
                "name": "Multiattack",
                "entries": [
                    "The dragon attacks:",
                    {"type": "list", "style": "list-hang-notitle", "items": ["Bite", "Claw"]}
                ]
            }]),
        ))
        .unwrap();
        let action = &sb.actions[0];
        assert_eq!(action.entries.len(), 2);
        assert_eq!(
            action.render(),
            "Multiattack: The dragon attacks:; list (Bite, Claw)"
        );
    }

    #[test]
    fn test_action_without_name_fails() {
        let err = parse_statblock(&with(goblin(), "trait", json!([{"entries": ["x"]}]))).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                monster: "Goblin".to_string(),
                field: "trait[0].name".to_string()
            }
        );
    }

    #[test]
    fn test_legendary_present_but_empty() {
        let sb = parse_statblock(&with(goblin(), "legendary", json!([]))).unwrap();
        assert_eq!(sb.legendary, Some(Vec::new()));
    }

    #[test]
    fn test_spellcasting() {
        let sb = parse_statblock(&with(
            goblin(),
            "spellcasting",
            json!([{
                "name": "Spellcasting",
                "headerEntries": ["The mage is a 9th-level spellcaster."],
                "spells": {
                    "0": {"spells": ["{@spell fire bolt}", "{@spell light}"]},
                    "1": {"slots": 4, "spells": ["{@spell shield}"]}
                },
                "will": ["{@spell mage hand}"],
                "daily": {"1e": ["{@spell fly}"]}
            }]),
        ))
        .unwrap();
        let block = &sb.spellcasting[0];
        assert_eq!(block.spells.len(), 2);
        assert_eq!(block.spells[&0].slots, None);
        assert_eq!(block.spells[&1].slots, Some(4));
        assert_eq!(block.spells[&1].spells, vec!["{@spell shield}"]);
        assert_eq!(block.will.len(), 1);
        assert_eq!(block.daily["1e"], vec!["{@spell fly}"]);
        assert!(block.footer_entries.is_none());
    }

    #[test]
    fn test_bad_spell_level_key() {
        let err = parse_statblock(&with(
            goblin(),
            "spellcasting",
            json!([{"name": "Spellcasting", "spells": {"first": {"spells": []}}}]),
        ))
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { .. }));
    }

    #[test]
    fn test_ac_shapes() {
        let ac = |v: Value| parse_statblock(&with(goblin(), "ac", v)).unwrap().ac;
        assert_eq!(ac(json!(12)), ArmorClass::Flat(12));
        assert_eq!(ac(json!([13])), ArmorClass::Flat(13));
        assert_eq!(
            ac(json!("12 + Int modifier")),
            ArmorClass::Text("12 + Int modifier".to_string())
        );
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(parse_statblock(&json!([1, 2])), Err(ParseError::NotAnObject));
    }
}
