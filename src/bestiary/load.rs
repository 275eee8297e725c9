//! Batch loading of bestiary documents
//!
//! A bestiary file holds many monsters under a `"monster"` key. One bad
//! record never aborts the batch: failures are collected and logged.

use serde_json::Value;
use tracing::{info, warn};

use super::parser::{parse_statblock, ParseError};
use super::projection::Row;
use super::statblock::StatBlock;

/// A record that failed to parse
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    /// Position of the record in the document
    pub index: usize,
    /// The record's `name`, when it had one
    pub name: Option<String>,
    pub error: ParseError,
}

/// Result of loading a bestiary document
#[derive(Debug, Clone, Default)]
pub struct BestiaryLoad {
    pub statblocks: Vec<StatBlock>,
    pub failures: Vec<RecordFailure>,
}

impl BestiaryLoad {
    /// Find a statblock by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&StatBlock> {
        self.statblocks
            .iter()
            .find(|sb| sb.name.eq_ignore_ascii_case(name))
    }
}

/// Parse every monster in a `{"monster": [...]}` document (or a bare list)
pub fn load_bestiary(doc: &Value) -> Result<BestiaryLoad, ParseError> {
    let records = match doc {
        Value::Array(records) => records,
        Value::Object(obj) => match obj.get("monster") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(ParseError::MissingField {
                    monster: "<document>".to_string(),
                    field: "monster".to_string(),
                })
            }
        },
        _ => return Err(ParseError::NotAnObject),
    };

    let mut load = BestiaryLoad::default();
    for (index, record) in records.iter().enumerate() {
        match parse_statblock(record) {
            Ok(statblock) => load.statblocks.push(statblock),
            Err(error) => {
                let name = record.get("name").and_then(Value::as_str).map(String::from);
                warn!(index, name = name.as_deref().unwrap_or("?"), %error, "skipping monster record");
                load.failures.push(RecordFailure { index, name, error });
            }
        }
    }

    info!(
        parsed = load.statblocks.len(),
        failed = load.failures.len(),
        "bestiary loaded"
    );
    Ok(load)
}

/// Project statblocks into rows, skipping any that fail to flatten
pub fn rows(statblocks: &[StatBlock]) -> Vec<Row> {
    statblocks
        .iter()
        .filter_map(|sb| match sb.to_row() {
            Ok(row) => Some(row),
            Err(error) => {
                warn!(monster = %sb.name, %error, "skipping row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestiary::ChallengeRating;
    use serde_json::json;

    fn record(name: &str) -> Value {
        json!({
            "name": name,
            "source": "MM",
            "size": ["M"],
            "type": "humanoid",
            "alignment": ["N"],
            "ac": [10],
            "hp": {"average": 4, "formula": "1d8"},
            "speed": {"walk": 30},
            "str": 10, "dex": 10, "con": 10, "int": 10, "wis": 14, "cha": 11,
            "cr": 0
        })
    }

    #[test]
    fn test_bad_record_does_not_abort_batch() {
        let mut broken = record("Broken");
        broken.as_object_mut().unwrap().remove("hp");

        let doc = json!({"monster": [record("Commoner"), broken, "junk", record("Acolyte")]});
        let load = load_bestiary(&doc).unwrap();

        assert_eq!(load.statblocks.len(), 2);
        assert_eq!(load.failures.len(), 2);
        assert_eq!(load.failures[0].index, 1);
        assert_eq!(load.failures[0].name.as_deref(), Some("Broken"));
        assert_eq!(load.failures[0].error.monster(), Some("Broken"));
        assert_eq!(load.failures[1].name, None);
        assert_eq!(load.failures[1].error, ParseError::NotAnObject);
        assert!(load.find("acolyte").is_some());
    }

    #[test]
    fn test_bare_list_document() {
        let load = load_bestiary(&json!([record("Commoner")])).unwrap();
        assert_eq!(load.statblocks.len(), 1);
    }

    #[test]
    fn test_document_without_monsters() {
        assert!(load_bestiary(&json!({"spell": []})).is_err());
    }

    #[test]
    fn test_rows() {
        let load = load_bestiary(&json!([record("Commoner"), record("Guard")])).unwrap();
        let rows = rows(&load.statblocks);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["name"], "Guard");
        assert_eq!(rows[0]["cr"], "0");
    }

    #[test]
    fn test_rows_skip_unprojectable_statblock() {
        let load = load_bestiary(&json!([record("Commoner"), record("Titan")])).unwrap();
        let mut statblocks = load.statblocks;
        statblocks[1].cr = Some(ChallengeRating::new("1e999"));
        assert_eq!(statblocks[1].cr.as_ref().and_then(|cr| cr.value), Some(f64::INFINITY));
        assert!(statblocks[1].to_row().is_err());

        let rows = rows(&statblocks);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Commoner");
    }
}
