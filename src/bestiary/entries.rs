//! Prose entries for traits, actions and spellcasting text
//!
//! Monster documents describe abilities with an `entries` list whose
//! elements are either plain strings or typed containers such as
//! `{"type": "list", "style": "list-hang-notitle", "items": [...]}`.

use serde::Serialize;
use serde_json::Value;

/// Nesting depth past which containers are kept as raw JSON text
pub const MAX_ENTRY_DEPTH: usize = 8;

/// One unit of prose
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextEntry {
    /// Plain text
    Text { text: String },
    /// Key/value item, e.g. `{"type": "item", "name": "Bite.", "entry": "..."}`
    Item { name: String, text: String },
    /// Typed container holding further entries
    Block {
        #[serde(rename = "type")]
        type_: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        items: Vec<TextEntry>,
    },
}

impl TextEntry {
    /// Plain text entry
    pub fn text(text: impl Into<String>) -> Self {
        TextEntry::Text { text: text.into() }
    }

    /// Parse one entry value. Never fails: unrecognized shapes and
    /// containers nested deeper than [`MAX_ENTRY_DEPTH`] become raw text.
    pub fn parse(value: &Value) -> Self {
        parse_at(value, 0)
    }

    /// Parse an `entries`/`items` list
    pub fn parse_list(value: &Value) -> Vec<TextEntry> {
        list_at(value, 0)
    }

    /// Single-line rendering used by the flat row projection
    pub fn render(&self) -> String {
        match self {
            TextEntry::Text { text } => text.clone(),
            TextEntry::Item { name, text } => format!("{} {}", name, text),
            TextEntry::Block {
                type_, name, items, ..
            } => {
                let label = name.as_deref().unwrap_or(type_);
                let inner: Vec<String> = items.iter().map(TextEntry::render).collect();
                format!("{} ({})", label, inner.join(", "))
            }
        }
    }

    /// Depth of the deepest container (plain text and items are 0)
    pub fn depth(&self) -> usize {
        match self {
            TextEntry::Block { items, .. } => {
                1 + items.iter().map(TextEntry::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

fn list_at(value: &Value, depth: usize) -> Vec<TextEntry> {
    match value {
        Value::Array(items) => items.iter().map(|v| parse_at(v, depth)).collect(),
        Value::Null => Vec::new(),
        other => vec![parse_at(other, depth)],
    }
}

fn parse_at(value: &Value, depth: usize) -> TextEntry {
    let obj = match value {
        Value::String(s) => return TextEntry::text(s.as_str()),
        Value::Object(obj) => obj,
        other => return TextEntry::text(other.to_string()),
    };

    if depth >= MAX_ENTRY_DEPTH {
        return TextEntry::text(value.to_string());
    }

    let name = obj.get("name").and_then(Value::as_str).map(str::to_string);

    // {"name": ..., "entry": "..."} is a key/value item whether or not it is typed
    if let (Some(name), Some(entry)) = (&name, obj.get("entry").and_then(Value::as_str)) {
        return TextEntry::Item {
            name: name.clone(),
            text: entry.to_string(),
        };
    }

    match obj.get("type").and_then(Value::as_str) {
        Some(type_) => {
            let children = obj
                .get("items")
                .or_else(|| obj.get("entries"))
                .unwrap_or(&Value::Null);
            TextEntry::Block {
                type_: type_.to_string(),
                style: obj.get("style").and_then(Value::as_str).map(str::to_string),
                name,
                items: list_at(children, depth + 1),
            }
        }
        None => TextEntry::text(value.to_string()),
    }
}
