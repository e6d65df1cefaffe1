//! Scenario documents in the persisted JSON shape, shared across tests.

/// Two scenes: `start` leads to the terminal `end` with no effect.
pub const START_END_JSON: &str = r#"{
  "character": { "health": 100 },
  "scenes": {
    "start": {
      "text": "Begin",
      "choices": [
        { "text": "Go", "next_scene": "end", "effect": {} }
      ]
    },
    "end": { "text": "Done", "choices": [] }
  }
}"#;

/// A small cave adventure exercising damage, rewards, death and an ending
/// reached through an empty `next_scene`.
pub const CAVE_JSON: &str = r#"{
  "character": { "health": 100, "strength": 10, "money": 50 },
  "scenes": {
    "entrance": {
      "text": "A cave mouth yawns before you.",
      "choices": [
        { "text": "Enter", "next_scene": "hall", "effect": {} },
        { "text": "Walk home", "next_scene": "", "effect": {} }
      ]
    },
    "hall": {
      "text": "A troll blocks the hall.",
      "choices": [
        { "text": "Fight", "next_scene": "treasure", "effect": { "health": -100 } },
        { "text": "Bribe", "next_scene": "treasure", "effect": { "money": -30 } },
        { "text": "Sneak", "next_scene": "treasure", "effect": { "health": -20 } }
      ]
    },
    "treasure": {
      "text": "Gold glitters in the dark.",
      "choices": [
        { "text": "Take it", "next_scene": "exit", "effect": { "money": 100 } }
      ]
    },
    "exit": { "text": "You step back into daylight, richer.", "choices": [] }
  }
}"#;

/// Structurally broken on purpose: one problem of every validation kind.
pub const BROKEN_JSON: &str = r#"{
  "character": { "health": 100 },
  "scenes": {
    "start": {
      "text": "Begin",
      "choices": [
        { "text": "Nowhere", "next_scene": "missing", "effect": {} },
        { "text": "Luck", "next_scene": "start", "effect": { "luck": 1 } },
        { "text": "Odd", "next_scene": "start", "effect": { "health": "ten" } }
      ]
    },
    "orphan": { "choices": [] }
  }
}"#;
