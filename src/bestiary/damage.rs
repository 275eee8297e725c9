//! Damage resistances, immunities and vulnerabilities
//!
//! Each set is an ordered list. An entry is a bare damage type, or a group
//! of types sharing a note:
//! `{"resist": ["bludgeoning", "piercing"], "note": "from nonmagical attacks"}`.

use serde::Serialize;
use serde_json::Value;

/// Which of the three sets a list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageModifierKind {
    Resist,
    Immune,
    Vulnerable,
}

impl DamageModifierKind {
    /// Document key, which is also the inner key of note-entries
    pub fn key(&self) -> &'static str {
        match self {
            DamageModifierKind::Resist => "resist",
            DamageModifierKind::Immune => "immune",
            DamageModifierKind::Vulnerable => "vulnerable",
        }
    }
}

/// One entry in a damage modifier set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DamageEntry {
    /// Bare damage type label
    Type(String),
    /// Several types with an explanatory note
    Noted { types: Vec<String>, note: String },
    /// Unrecognized object, kept verbatim
    Opaque(Value),
}

impl DamageEntry {
    pub fn render(&self) -> String {
        match self {
            DamageEntry::Type(label) => label.clone(),
            DamageEntry::Noted { types, note } => {
                format!("{} (Note: {})", types.join(", "), note)
            }
            DamageEntry::Opaque(value) => value.to_string(),
        }
    }
}

/// Ordered damage modifier set; duplicates are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DamageModifiers {
    pub entries: Vec<DamageEntry>,
}

impl DamageModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the list stored under `kind`'s key
    pub fn parse(value: &Value, kind: DamageModifierKind) -> Self {
        let entries = match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items.iter().map(|v| parse_entry(v, kind)).collect(),
            other => vec![parse_entry(other, kind)],
        };
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every damage type label mentioned, in order
    pub fn labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|e| match e {
                DamageEntry::Type(label) => vec![label.as_str()],
                DamageEntry::Noted { types, .. } => types.iter().map(String::as_str).collect(),
                DamageEntry::Opaque(_) => Vec::new(),
            })
            .collect()
    }

    /// `"types (Note: note), ..."` rendering used by the row projection
    pub fn render(&self) -> String {
        let parts: Vec<String> = self.entries.iter().map(DamageEntry::render).collect();
        parts.join(", ")
    }
}

fn parse_entry(value: &Value, kind: DamageModifierKind) -> DamageEntry {
    match value {
        Value::String(label) => DamageEntry::Type(label.clone()),
        Value::Object(obj) => match obj.get(kind.key()) {
            Some(inner) => DamageEntry::Noted {
                types: labels_of(inner),
                note: obj
                    .get("note")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            None => DamageEntry::Opaque(value.clone()),
        },
        other => DamageEntry::Opaque(other.clone()),
    }
}

fn labels_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    }
}
