//! Candidate word loading and random selection.

use derive_more::{Display, Error};
use rand::seq::IndexedRandom;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::engine::WORD_LENGTH;

/// Word handed out when no candidates are loaded.
///
/// Selection falls back to this constant instead of erroring, so a game can
/// always be started even with a missing or empty word file.
pub const FALLBACK_WORD: &str = "GUESS";

/// Word list error.
#[derive(Debug, Clone, Display, Error)]
#[display("Word list error: {} at {}:{}", message, file, line)]
pub struct WordListError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl WordListError {
    /// Creates a new word list error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Candidate secret words, loaded once at startup and read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Loads candidates from a JSON file containing an array of strings.
    ///
    /// Entries are normalized to uppercase; anything that is not exactly
    /// [`WORD_LENGTH`] ASCII letters is discarded, as are duplicates.
    ///
    /// # Errors
    /// Returns [`WordListError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WordListError::new(format!("Failed to read word file: {}", e)))?;
        let entries: Vec<String> = serde_json::from_str(&content)
            .map_err(|e| WordListError::new(format!("Failed to parse word file: {}", e)))?;

        let list = Self::from_words(entries);
        info!(count = list.len(), "Word list loaded");
        Ok(list)
    }

    /// Builds a list from in-memory candidates, with the same normalization
    /// as [`WordList::from_file`].
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .filter_map(|word| normalize_word(word.as_ref()))
            .collect();
        words.sort();
        words.dedup();
        Self { words }
    }

    /// Number of candidate words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no candidates are loaded.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Draws a secret word uniformly at random.
    ///
    /// Falls back to [`FALLBACK_WORD`] when the list is empty.
    #[instrument(skip(self))]
    pub fn pick(&self) -> String {
        match self.words.choose(&mut rand::rng()) {
            Some(word) => word.clone(),
            None => {
                warn!("Word list is empty, using fallback word");
                FALLBACK_WORD.to_string()
            }
        }
    }
}

/// Uppercases a candidate word or guess, rejecting malformed input.
///
/// Accepts exactly [`WORD_LENGTH`] ASCII letters after trimming whitespace;
/// anything else (wrong length, digits, accents, punctuation) is `None`.
pub(crate) fn normalize_word(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() != WORD_LENGTH || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}
