/*!
 * Vocabulary store.
 *
 * `VocabularyStore` owns every query and mutation of word records.
 * Each public operation is one atomic read-modify-write under the
 * connection lock, so concurrent callers can never interleave half-writes.
 */

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{
    join_translations, merge_translation_list, parse_translations, split_translation_input,
    RecordId, UpsertOutcome, VocabularyStats, WordRecord, ADDED_AT_FORMAT,
};
use crate::vocabulary::normalize_word;

const SELECT_WORD_COLUMNS: &str = "SELECT id, word, translations, added_at, anki_created FROM words";

/// Persistent keyed collection of word records
#[derive(Clone)]
pub struct VocabularyStore {
    /// Database connection
    db: DatabaseConnection,
}

impl VocabularyStore {
    /// Create a store over an open connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a store with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a word, or merge a translation into the existing record.
    ///
    /// The word is normalized first; an empty result is a no-op. A new record
    /// starts with `translation` (if non-empty). An existing record gains
    /// `translation` only when it is non-empty and not yet present, which
    /// also clears its export flag. Repeating the same call changes nothing.
    pub async fn upsert(&self, word: &str, translation: &str) -> Result<UpsertOutcome> {
        let word = normalize_word(word);
        let translation = translation.trim().to_string();

        if word.is_empty() {
            debug!("Skipping upsert of empty word");
            return Ok(UpsertOutcome::Skipped);
        }

        self.db
            .transaction_async(move |tx| {
                Self::upsert_sync(tx, &word, &translation)
                    .with_context(|| format!("Failed to upsert word '{}'", word))
            })
            .await
    }

    fn upsert_sync(conn: &Connection, word: &str, translation: &str) -> Result<UpsertOutcome> {
        if let Some((id, stored)) = Self::find_translations_sync(conn, word)? {
            return Self::append_translation_sync(conn, id, &stored, translation);
        }

        let added_at = Local::now().naive_local().format(ADDED_AT_FORMAT).to_string();
        let inserted = conn.execute(
            "INSERT INTO words (word, translations, added_at, anki_created) VALUES (?1, ?2, ?3, 0)",
            params![word, translation, added_at],
        );

        match inserted {
            Ok(_) => {
                let id = RecordId(conn.last_insert_rowid());
                debug!("Created word '{}' ({})", word, id);
                Ok(UpsertOutcome::Created(id))
            }
            // Another process inserted the same word between our check and insert
            Err(e) if is_unique_violation(&e) => {
                debug!("Word '{}' appeared concurrently, merging instead", word);
                let (id, stored) = Self::find_translations_sync(conn, word)?
                    .ok_or_else(|| anyhow::anyhow!("Word '{}' vanished after uniqueness conflict", word))?;
                Self::append_translation_sync(conn, id, &stored, translation)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn append_translation_sync(
        conn: &Connection,
        id: RecordId,
        stored: &str,
        translation: &str,
    ) -> Result<UpsertOutcome> {
        let mut translations = parse_translations(stored);
        if !merge_translation_list(&mut translations, [translation]) {
            return Ok(UpsertOutcome::Unchanged(id));
        }

        conn.execute(
            "UPDATE words SET translations = ?1, anki_created = 0 WHERE id = ?2",
            params![join_translations(&translations), id.0],
        )?;
        Ok(UpsertOutcome::Merged(id))
    }

    /// Merge pipe-delimited translation text into the record with `id`.
    ///
    /// New pieces are appended in order; the export flag is cleared only when
    /// at least one piece was actually new. Returns whether the record changed.
    /// An unknown id is a no-op.
    pub async fn merge_translations(&self, id: RecordId, raw_translations: &str) -> Result<bool> {
        let incoming = split_translation_input(raw_translations);

        self.db
            .transaction_async(move |tx| {
                let stored: Option<Option<String>> = tx
                    .query_row("SELECT translations FROM words WHERE id = ?1", [id.0], |row| row.get(0))
                    .optional()?;

                let Some(stored) = stored else {
                    debug!("No word with id {}, nothing to merge", id);
                    return Ok(false);
                };

                let mut translations = parse_translations(stored.as_deref().unwrap_or(""));
                if !merge_translation_list(&mut translations, &incoming) {
                    return Ok(false);
                }

                tx.execute(
                    "UPDATE words SET translations = ?1, anki_created = 0 WHERE id = ?2",
                    params![join_translations(&translations), id.0],
                )?;
                Ok(true)
            })
            .await
            .with_context(|| format!("Failed to merge translations into word {}", id))
    }

    /// Flag the record for `word` as exported. Returns false if absent.
    ///
    /// Resolves `word` like [`find_by_word`](Self::find_by_word): the exact
    /// stored key wins over the normalized form, and only that one record
    /// is flagged.
    pub async fn mark_exported(&self, word: &str) -> Result<bool> {
        let (exact, normalized) = lookup_keys(word);

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE words SET anki_created = 1 WHERE id = \
                     (SELECT id FROM words WHERE word IN (?1, ?2) ORDER BY word = ?1 DESC LIMIT 1)",
                    params![exact, normalized],
                )?;
                Ok(updated > 0)
            })
            .await
            .context("Failed to mark word as exported")
    }

    /// Flag the records with the given ids as exported in one transaction.
    /// Unknown ids are ignored. Returns the number of records flagged.
    pub async fn mark_exported_ids(&self, ids: &[RecordId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = ids.iter().map(|id| id.0).collect();

        self.db
            .transaction_async(move |tx| {
                let placeholders = vec!["?"; ids.len()].join(",");
                let sql = format!("UPDATE words SET anki_created = 1 WHERE id IN ({})", placeholders);
                Ok(tx.execute(&sql, params_from_iter(ids.iter()))?)
            })
            .await
            .context("Failed to mark words as exported")
    }

    /// Clear the export flag of every record. Returns the number of records.
    pub async fn reset_all_export_flags(&self) -> Result<usize> {
        let updated = self
            .db
            .execute_async(|conn| Ok(conn.execute("UPDATE words SET anki_created = 0", [])?))
            .await
            .context("Failed to reset export flags")?;

        info!("Reset export flags on {} words", updated);
        Ok(updated)
    }

    /// Delete the records with the given ids. Unknown ids are ignored.
    /// Returns the number of records removed.
    pub async fn delete(&self, ids: &[RecordId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = ids.iter().map(|id| id.0).collect();

        self.db
            .execute_async(move |conn| {
                let placeholders = vec!["?"; ids.len()].join(",");
                let sql = format!("DELETE FROM words WHERE id IN ({})", placeholders);
                Ok(conn.execute(&sql, params_from_iter(ids.iter()))?)
            })
            .await
            .context("Failed to delete words")
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All records ordered by word, case-insensitively
    pub async fn list_all(&self) -> Result<Vec<WordRecord>> {
        self.db
            .execute_async(|conn| {
                let sql = format!("{} ORDER BY word COLLATE NOCASE, id", SELECT_WORD_COLUMNS);
                let mut stmt = conn.prepare(&sql)?;
                let records = stmt
                    .query_map([], parse_word_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await
            .context("Failed to list words")
    }

    /// Up to `limit` records not yet exported, in listing order
    pub async fn select_unexported(&self, limit: usize) -> Result<Vec<WordRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.db
            .execute_async(move |conn| {
                let sql = format!(
                    "{} WHERE anki_created = 0 ORDER BY word COLLATE NOCASE, id LIMIT ?1",
                    SELECT_WORD_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let records = stmt
                    .query_map([limit], parse_word_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await
            .context("Failed to select words for export")
    }

    /// Look up a record by word, exact stored key first, then normalized
    pub async fn find_by_word(&self, word: &str) -> Result<Option<WordRecord>> {
        let (exact, normalized) = lookup_keys(word);

        self.db
            .execute_async(move |conn| {
                let sql = format!(
                    "{} WHERE word IN (?1, ?2) ORDER BY word = ?1 DESC LIMIT 1",
                    SELECT_WORD_COLUMNS
                );
                Ok(conn.query_row(&sql, params![exact, normalized], parse_word_row).optional()?)
            })
            .await
            .context("Failed to look up word")
    }

    /// Look up a record by id
    pub async fn find_by_id(&self, id: RecordId) -> Result<Option<WordRecord>> {
        self.db
            .execute_async(move |conn| {
                let sql = format!("{} WHERE id = ?1", SELECT_WORD_COLUMNS);
                Ok(conn.query_row(&sql, [id.0], parse_word_row).optional()?)
            })
            .await
            .with_context(|| format!("Failed to look up word {}", id))
    }

    /// Resolve words to the ids of the records that exist for them
    pub async fn find_ids_by_words(&self, words: &[String]) -> Result<Vec<RecordId>> {
        let mut keys: Vec<String> = words
            .iter()
            .flat_map(|w| {
                let (exact, normalized) = lookup_keys(w);
                [exact, normalized]
            })
            .filter(|w| !w.is_empty())
            .collect();
        keys.sort();
        keys.dedup();

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        self.db
            .execute_async(move |conn| {
                let placeholders = vec!["?"; keys.len()].join(",");
                let sql = format!("SELECT id FROM words WHERE word IN ({}) ORDER BY id", placeholders);
                let mut stmt = conn.prepare(&sql)?;
                let ids = stmt
                    .query_map(params_from_iter(keys.iter()), |row| row.get(0).map(RecordId))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(ids)
            })
            .await
            .context("Failed to resolve word ids")
    }

    /// Total and exported word counts
    pub async fn stats(&self) -> Result<VocabularyStats> {
        self.db
            .execute_async(|conn| {
                let (total_words, exported_words): (i64, i64) = conn.query_row(
                    "SELECT COUNT(*), COALESCE(SUM(CASE WHEN anki_created = 1 THEN 1 ELSE 0 END), 0) FROM words",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                Ok(VocabularyStats { total_words, exported_words })
            })
            .await
            .context("Failed to compute vocabulary stats")
    }

    fn find_translations_sync(conn: &Connection, word: &str) -> Result<Option<(RecordId, String)>> {
        let row = conn
            .query_row(
                "SELECT id, translations FROM words WHERE word = ?1",
                [word],
                |row| {
                    let id: i64 = row.get(0)?;
                    let stored: Option<String> = row.get(1)?;
                    Ok((RecordId(id), stored.unwrap_or_default()))
                },
            )
            .optional()?;
        Ok(row)
    }
}

/// Map a `words` row (in `SELECT_WORD_COLUMNS` order) to a record
fn parse_word_row(row: &rusqlite::Row) -> rusqlite::Result<WordRecord> {
    let id = RecordId(row.get(0)?);
    // Tables created before the NOT NULL constraint may hold a null word
    let word: Option<String> = row.get(1)?;
    let translations: Option<String> = row.get(2)?;
    let added_at: Option<String> = row.get(3)?;
    let exported: Option<i64> = row.get(4)?;

    Ok(WordRecord {
        added_at: parse_added_at(id, added_at.as_deref()),
        id,
        word: word.unwrap_or_default(),
        translations: parse_translations(translations.as_deref().unwrap_or("")),
        exported: exported.unwrap_or(0) != 0,
    })
}

/// Rows written by older versions may lack a timestamp or use another format
fn parse_added_at(id: RecordId, stored: Option<&str>) -> Option<NaiveDateTime> {
    let stored = stored?.trim();
    if stored.is_empty() {
        return None;
    }

    match NaiveDateTime::parse_from_str(stored, ADDED_AT_FORMAT) {
        Ok(at) => Some(at),
        Err(e) => {
            warn!("Word {} has unreadable added_at {:?}: {}", id, stored, e);
            None
        }
    }
}

/// Trimmed and normalized forms of a caller-supplied word
fn lookup_keys(word: &str) -> (String, String) {
    (word.trim().to_string(), normalize_word(word))
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
