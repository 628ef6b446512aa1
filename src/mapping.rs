//! Character substitution table used to build name variants.

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// Kazakh-specific Cyrillic letters and the Russian letters they are usually
// typed as when a keyboard layout lacks them.
const KAZAKH_TO_RUSSIAN: &[(char, char)] = &[
    ('Қ', 'К'),
    ('қ', 'к'),
    ('Ұ', 'У'),
    ('ұ', 'у'),
    ('Ә', 'А'),
    ('ә', 'а'),
    ('Ң', 'Н'),
    ('ң', 'н'),
    ('Ғ', 'Г'),
    ('ғ', 'г'),
    ('І', 'Ы'),
    ('і', 'ы'),
    ('Ө', 'О'),
    ('ө', 'о'),
    ('Ү', 'У'),
    ('ү', 'у'),
];

/// A closed table of single-character replacements.
///
/// Only characters present as keys are ever substituted. The table does not
/// need to be injective (`Ұ` and `Ү` both map to `У`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMap {
    table: BTreeMap<char, char>,
}

impl SubstitutionMap {
    pub fn new(pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        Self {
            table: pairs.into_iter().collect(),
        }
    }

    /// The built-in Kazakh to Russian table.
    pub fn kazakh() -> Self {
        Self::new(KAZAKH_TO_RUSSIAN.iter().copied())
    }

    /// Loads a table from a JSON object such as `{"Ә": "А", "ә": "а"}`.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::MappingRead {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::MappingParse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_string_pairs(entries)
    }

    fn from_string_pairs(entries: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut table = BTreeMap::new();
        for (key, value) in entries {
            match (single_char(&key), single_char(&value)) {
                (Some(k), Some(v)) => {
                    table.insert(k, v);
                }
                _ => return Err(ConfigError::MappingEntry { key, value }),
            }
        }
        Ok(Self { table })
    }

    pub fn get(&self, ch: char) -> Option<char> {
        self.table.get(&ch).copied()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.table.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for SubstitutionMap {
    fn default() -> Self {
        Self::kazakh()
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
