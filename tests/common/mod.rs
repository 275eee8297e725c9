//! Common test fixtures - bestiary documents and seeded randomness

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

/// Deterministic random source
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A goblin in the loose shape real bestiary data uses
pub fn goblin() -> Value {
    json!({
        "name": "Goblin",
        "source": "MM",
        "page": 166,
        "size": ["S"],
        "type": {"type": "humanoid", "tags": ["goblinoid"]},
        "alignment": ["N", "E"],
        "ac": [{"ac": 15, "from": ["{@item leather armor|phb}", "{@item shield|phb}"]}],
        "hp": {"average": 7, "formula": "2d6"},
        "speed": {"walk": 30},
        "str": 8, "dex": 14, "con": 10, "int": 10, "wis": 8, "cha": 8,
        "skill": {"stealth": "+6"},
        "senses": ["darkvision 60 ft."],
        "passive": 9,
        "languages": ["Common", "Goblin"],
        "cr": "1/4",
        "trait": [{"name": "Nimble Escape", "entries": ["The goblin can take the Disengage or Hide action as a bonus action."]}],
        "action": [
            {"name": "Scimitar", "entries": ["{@atk mw} {@hit 4} to hit, reach 5 ft."]},
            {"name": "Shortbow", "entries": ["{@atk rw} {@hit 4} to hit, range 80/320 ft."]}
        ]
    })
}

/// A dragon with a recharge breath and lair variant CR
pub fn dragon() -> Value {
    json!({
        "name": "Adult Black Dragon",
        "source": "MM",
        "size": "H",
        "type": "dragon",
        "alignment": "CE",
        "ac": [{"ac": 19, "from": ["natural armor"]}],
        "hp": {"average": 195, "formula": "17d12 + 85"},
        "speed": {"walk": 40, "fly": 80, "swim": 40},
        "str": 23, "dex": 14, "con": 21, "int": 14, "wis": 13, "cha": 17,
        "immune": ["acid"],
        "cr": {"cr": "14", "lair": "15"},
        "action": [
            {"name": "Multiattack", "entries": ["The dragon makes three attacks."]},
            {"name": "Acid Breath {@recharge 5}", "entries": [
                "The dragon exhales acid in a 60-foot line.",
                {"type": "list", "items": ["{@damage 54 (12d8)} acid damage on a failed save", "half on a success"]}
            ]}
        ],
        "legendary": [
            {"name": "Detect", "entries": ["The dragon makes a Wisdom (Perception) check."]},
            {"name": "Wing Attack (Costs 2 Actions)", "entries": ["The dragon beats its wings."]}
        ]
    })
}

/// A bestiary document holding both fixtures and two broken records
pub fn bestiary() -> Value {
    let mut no_speed = goblin();
    no_speed["name"] = json!("Legless Goblin");
    if let Some(obj) = no_speed.as_object_mut() {
        obj.remove("speed");
    }
    json!({"monster": [goblin(), no_speed, dragon(), 42]})
}
