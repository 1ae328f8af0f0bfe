//! Generated persona metadata and the used-adjective ledger.

use serde::{Deserialize, Serialize};

/// Structured persona metadata returned by the metadata generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPersona {
    /// Name of the specimen this persona belongs to
    pub character_name: String,
    /// `[Adjective] [Name]` style title
    pub title: String,
    /// Scene description fed to the image generator
    pub description: String,
}

impl GeneratedPersona {
    /// The theme adjective of the title (its first word), if any.
    pub fn adjective(&self) -> Option<&str> {
        title_adjective(&self.title, &self.character_name)
    }
}

/// Extracts the leading adjective from an `[Adjective] [Name]` title.
///
/// Returns `None` when the title is just the name or empty.
pub fn title_adjective<'a>(title: &'a str, character_name: &str) -> Option<&'a str> {
    let first = title.split_whitespace().next()?;
    let first = first.trim_matches(|c: char| !c.is_alphanumeric() && c != '-');
    if first.is_empty() || first.eq_ignore_ascii_case(character_name.trim()) {
        None
    } else {
        Some(first)
    }
}

/// Append-only, case-insensitively de-duplicated list of used title adjectives.
///
/// Consulted by the metadata generator so repeated regenerations avoid
/// repeating a theme. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedAdjectiveSet {
    entries: Vec<String>,
}

impl UsedAdjectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an adjective. Returns `false` if it was already present or blank.
    pub fn insert(&mut self, adjective: &str) -> bool {
        let adjective = adjective.trim();
        if adjective.is_empty() || self.contains(adjective) {
            return false;
        }
        self.entries.push(adjective.to_string());
        true
    }

    pub fn contains(&self, adjective: &str) -> bool {
        let adjective = adjective.trim();
        self.entries.iter().any(|e| e.eq_ignore_ascii_case(adjective))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }
}
