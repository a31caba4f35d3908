/*!
 * Vocabulary entity models.
 *
 * In memory a record's translations are an ordered list of distinct
 * strings. On disk they live in a single column joined by
 * `TRANSLATION_SEPARATOR`; the conversion happens only at the store seam.
 */

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used for the persisted translations column and for flashcard backs
pub const TRANSLATION_SEPARATOR: &str = " | ";

/// Delimiter accepted in user-edited translation text
pub const TRANSLATION_INPUT_DELIMITER: char = '|';

/// Format of the persisted `added_at` column (local time)
pub const ADDED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Surrogate identifier of a stored word, assigned on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored word with its accumulated translations and export state
#[derive(Debug, Clone, PartialEq)]
pub struct WordRecord {
    /// Surrogate id, immutable
    pub id: RecordId,
    /// Normalized word, unique across the store
    pub word: String,
    /// Distinct translations in insertion order
    pub translations: Vec<String>,
    /// Time of first insertion, immutable; `None` for rows with a missing or unreadable timestamp
    pub added_at: Option<NaiveDateTime>,
    /// Whether the word was included in a flashcard export since its last edit
    pub exported: bool,
}

impl WordRecord {
    /// Translations joined the way flashcards and the database show them
    pub fn joined_translations(&self) -> String {
        join_translations(&self.translations)
    }

    /// Formatted creation time, empty when unknown
    pub fn added_at_display(&self) -> String {
        self.added_at
            .map(|at| at.format(ADDED_AT_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Outcome of a single upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was created
    Created(RecordId),
    /// The word existed and gained a new translation
    Merged(RecordId),
    /// The word existed and nothing changed
    Unchanged(RecordId),
    /// The word was empty after normalization
    Skipped,
}

impl UpsertOutcome {
    /// Id of the affected record, if any
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::Created(id) | Self::Merged(id) | Self::Unchanged(id) => Some(*id),
            Self::Skipped => None,
        }
    }
}

/// Store-wide counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VocabularyStats {
    /// Number of stored words
    pub total_words: i64,
    /// Number of words currently flagged as exported
    pub exported_words: i64,
}

impl fmt::Display for VocabularyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Words: {} | Flashcards: {}", self.total_words, self.exported_words)
    }
}

/// Decode the persisted translations column
pub fn parse_translations(stored: &str) -> Vec<String> {
    let mut translations = Vec::new();
    merge_translation_list(&mut translations, stored.split(TRANSLATION_SEPARATOR));
    translations
}

/// Encode translations for the persisted column
pub fn join_translations(translations: &[String]) -> String {
    translations.join(TRANSLATION_SEPARATOR)
}

/// Split user-edited translation text on the pipe delimiter
pub fn split_translation_input(raw: &str) -> Vec<String> {
    raw.split(TRANSLATION_INPUT_DELIMITER)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append every incoming translation that is non-empty and not yet present.
///
/// Comparison is exact after trimming. Existing order is preserved and
/// new entries go to the end. Returns whether anything was appended.
pub fn merge_translation_list<I, S>(existing: &mut Vec<String>, incoming: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut changed = false;
    for candidate in incoming {
        let candidate = candidate.as_ref().trim();
        if candidate.is_empty() || existing.iter().any(|t| t == candidate) {
            continue;
        }
        existing.push(candidate.to_string());
        changed = true;
    }
    changed
}
