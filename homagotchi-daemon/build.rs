//! Build script for homagotchi-daemon
//!
//! Validates the built-in homagotchi.toml at compile time, so a broken
//! fallback household never ships.

use std::fs;
use std::path::Path;

/// Columns on the screen
const MAX_PERSONS: usize = 2;

fn main() {
    println!("cargo:rerun-if-changed=homagotchi.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let path = Path::new("homagotchi.toml");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => panic!("\n  ERROR: failed to read homagotchi.toml: {}\n", e),
    };

    let config: toml::Table = match content.parse() {
        Ok(table) => table,
        Err(e) => panic!("\n  ERROR: invalid TOML syntax in homagotchi.toml:\n{}\n", e),
    };

    let persons = match config.get("person").and_then(|p| p.as_array()) {
        Some(persons) => persons,
        None => panic!("\n  ERROR: homagotchi.toml has no [[person]] entries\n"),
    };

    if persons.is_empty() || persons.len() > MAX_PERSONS {
        panic!(
            "\n  ERROR: homagotchi.toml lists {} persons, expected 1 to {}\n",
            persons.len(),
            MAX_PERSONS
        );
    }

    for (i, person) in persons.iter().enumerate() {
        for key in ["name", "address"] {
            let value = person.get(key).and_then(|v| v.as_str()).unwrap_or("");
            if value.trim().is_empty() {
                panic!("\n  ERROR: person {} in homagotchi.toml has no {}\n", i + 1, key);
            }
        }
    }
}
