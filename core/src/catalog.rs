use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// A candidate word and the complexity factor used when scoring it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub word: String,
    pub complexity: u32,
}

/// Complexity assigned to words listed without one: the number of distinct letters.
pub fn default_complexity(word: &str) -> u32 {
    let mut seen = 0u32;
    for letter in word.bytes().filter(u8::is_ascii_uppercase) {
        seen |= 1 << (letter - b'A');
    }
    seen.count_ones()
}

fn normalize_word(word: &str) -> Option<String> {
    let word = word.trim();
    if word.is_empty()
        || word.len() > usize::from(Coord::MAX)
        || !word.bytes().all(|b| b.is_ascii_alphabetic())
    {
        return None;
    }
    Some(word.to_ascii_uppercase())
}

/// Word list the board generator samples from.
///
/// Words are stored upper-cased and in insertion order, so seeded generation is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCatalog {
    entries: Vec<CatalogEntry>,
}

impl WordCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a word. Returns `false` when the word is not purely alphabetic.
    pub fn insert(&mut self, word: &str, complexity: Option<u32>) -> bool {
        let Some(word) = normalize_word(word) else {
            return false;
        };
        let complexity = complexity.unwrap_or_else(|| default_complexity(&word));

        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.word == word) {
            entry.complexity = complexity;
        } else {
            self.entries.push(CatalogEntry { word, complexity });
        }
        true
    }

    /// Parses `WORD,complexity` lines. The complexity may be left out (`WORD` or `WORD,`).
    pub fn parse(text: &str) -> Result<Self> {
        let mut catalog = Self::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let invalid = GameError::InvalidCatalogEntry { line: index + 1 };

            let (word, complexity) = match line.split_once(',') {
                Some((word, complexity)) => (word, complexity.trim()),
                None => (line, ""),
            };
            let complexity = if complexity.is_empty() {
                None
            } else {
                Some(complexity.parse().map_err(|_| invalid.clone())?)
            };

            if !catalog.insert(word, complexity) {
                return Err(invalid);
            }
        }

        Ok(catalog)
    }

    /// Parses a JSON object mapping words to complexities, where `null` means "derive it".
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, Option<u32>> = serde_json::from_str(text)
            .map_err(|err| GameError::InvalidCatalogJson(err.to_string()))?;

        let mut catalog = Self::new();
        for (word, complexity) in raw {
            if !catalog.insert(&word, complexity) {
                return Err(GameError::InvalidCatalogJson(format!("invalid word {word:?}")));
            }
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn complexity(&self, word: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.word == word)
            .map(|entry| entry.complexity)
    }

    /// Entries short enough to fit a board with the given side length.
    pub fn fitting(&self, side: Coord) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.word.len() <= usize::from(side))
            .collect()
    }
}

impl<'a> FromIterator<(&'a str, u32)> for WordCatalog {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (word, complexity) in iter {
            if !catalog.insert(word, Some(complexity)) {
                log::warn!("Skipping invalid catalog word {word:?}");
            }
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_with_and_without_complexity() {
        let catalog = WordCatalog::parse("code,4\n\nDebug\nloop,\n").unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.complexity("CODE"), Some(4));
        assert_eq!(catalog.complexity("DEBUG"), Some(5));
        assert_eq!(catalog.complexity("LOOP"), Some(3));
    }

    #[test]
    fn rejects_bad_lines_with_line_number() {
        assert_eq!(
            WordCatalog::parse("CODE,4\nARRAY,many\n"),
            Err(GameError::InvalidCatalogEntry { line: 2 })
        );
        assert_eq!(
            WordCatalog::parse("CODE,4\n\nTWO WORDS,3"),
            Err(GameError::InvalidCatalogEntry { line: 3 })
        );
    }

    #[test]
    fn duplicate_words_replace_complexity() {
        let catalog = WordCatalog::parse("CODE,4\ncode,7").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.complexity("CODE"), Some(7));
    }

    #[test]
    fn parses_json_object() {
        let catalog = WordCatalog::from_json(r#"{"python": 6, "array": null}"#).unwrap();
        assert_eq!(catalog.complexity("PYTHON"), Some(6));
        assert_eq!(catalog.complexity("ARRAY"), Some(3));
        assert!(WordCatalog::from_json("[1, 2]").is_err());
    }

    #[test]
    fn fitting_filters_by_length() {
        let catalog: WordCatalog = [("CODE", 4), ("ALGORITHM", 9), ("LOOP", 3)]
            .into_iter()
            .collect();
        let words: Vec<_> = catalog
            .fitting(7)
            .into_iter()
            .map(|e| e.word.as_str())
            .collect();
        assert_eq!(words, vec!["CODE", "LOOP"]);
    }
}
