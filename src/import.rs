/*!
 * Vocabulary import.
 *
 * Two sources are understood:
 * - JSON: a list of `{"word": ..., "translation": ...}` objects
 * - free text: every distinct word found by the tokenizer
 *
 * Upserts already applied stay applied if a later one fails.
 */

use log::{debug, info, warn};
use serde_json::Value;
use std::path::Path;

use crate::database::{UpsertOutcome, VocabularyStore};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::vocabulary::{tokenize_text, DEFAULT_MIN_WORD_LENGTH};

const IMPORT_JSON: &str = "import-json";
const IMPORT_TEXT: &str = "import-text";

/// Counters for one import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Entries handed to the store
    pub imported: usize,
    /// New records
    pub created: usize,
    /// Existing records that gained a translation
    pub merged: usize,
    /// Entries ignored (missing or empty word)
    pub skipped: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created(_) => self.created += 1,
            UpsertOutcome::Merged(_) => self.merged += 1,
            UpsertOutcome::Unchanged(_) => {}
            UpsertOutcome::Skipped => {
                self.skipped += 1;
                return;
            }
        }
        self.imported += 1;
    }
}

/// Import a JSON word list from a file
pub async fn import_json_file(store: &VocabularyStore, path: &Path) -> Result<ImportSummary, AppError> {
    let bytes = FileManager::read_bytes(path).map_err(|e| AppError::io(IMPORT_JSON, path, e))?;
    let payload: Value = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::validation(IMPORT_JSON, format!("{:?} is not valid JSON: {}", path, e)))?;

    let summary = import_json_value(store, &payload).await?;
    info!("Imported {} entries from {:?}", summary.imported, path);
    Ok(summary)
}

/// Import an already-parsed JSON word list.
///
/// The top level must be an array. Items that are not objects, lack a
/// string `word`, or whose word is blank are skipped. A non-string
/// `translation` is treated as absent.
pub async fn import_json_value(store: &VocabularyStore, payload: &Value) -> Result<ImportSummary, AppError> {
    let items = payload.as_array().ok_or_else(|| {
        AppError::validation(
            IMPORT_JSON,
            format!("JSON file must contain a list of objects, found {}", json_kind(payload)),
        )
    })?;

    let mut summary = ImportSummary::default();

    for (index, item) in items.iter().enumerate() {
        let Some(word) = item.get("word").and_then(Value::as_str) else {
            debug!("Skipping item {}: no string 'word' field", index);
            summary.skipped += 1;
            continue;
        };

        let translation = match item.get("translation") {
            None | Some(Value::Null) => "",
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                warn!("Ignoring non-string translation for '{}': {}", word, other);
                ""
            }
        };

        let outcome = store
            .upsert(word, translation)
            .await
            .map_err(|e| AppError::store(IMPORT_JSON, e.context(format!("item {} ('{}')", index, word))))?;
        summary.record(outcome);
    }

    Ok(summary)
}

/// Import every word of a text file (invalid UTF-8 is tolerated)
pub async fn import_text_file(store: &VocabularyStore, path: &Path) -> Result<ImportSummary, AppError> {
    let text = FileManager::read_to_string_lossy(path).map_err(|e| AppError::io(IMPORT_TEXT, path, e))?;

    let summary = import_text(store, &text).await?;
    info!("Found and added {} unique words from {:?}", summary.imported, path);
    Ok(summary)
}

/// Import every distinct word of `text` with no translation
pub async fn import_text(store: &VocabularyStore, text: &str) -> Result<ImportSummary, AppError> {
    let mut summary = ImportSummary::default();

    for word in tokenize_text(text, DEFAULT_MIN_WORD_LENGTH) {
        let outcome = store
            .upsert(&word, "")
            .await
            .map_err(|e| AppError::store(IMPORT_TEXT, e))?;
        summary.record(outcome);
    }

    Ok(summary)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
