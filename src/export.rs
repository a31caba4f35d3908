/*!
 * Flashcard export.
 *
 * Unexported words become `Front,Back` CSV rows (word, translations joined
 * by " | "). The file is written to a temporary sibling and renamed into
 * place; the records written are flagged as exported, by id, only after
 * that succeeded.
 */

use log::{debug, info, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::database::{RecordId, VocabularyStore, WordRecord};
use crate::errors::AppError;
use crate::file_utils::FileManager;

const EXPORT: &str = "export";

/// One front/back pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    /// Word
    pub front: String,
    /// Joined translations
    pub back: String,
}

impl From<&WordRecord> for Flashcard {
    fn from(record: &WordRecord) -> Self {
        Self {
            front: record.word.clone(),
            back: record.joined_translations(),
        }
    }
}

/// What an export run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No unexported words; no file was written
    NothingToExport,
    /// `count` cards were written to `path` and flagged as exported
    Exported { count: usize, path: PathBuf },
}

/// Selects untouched words, writes them as flashcards and flags them
#[derive(Clone)]
pub struct FlashcardExporter {
    store: VocabularyStore,
}

impl FlashcardExporter {
    /// Create an exporter over a store
    pub fn new(store: VocabularyStore) -> Self {
        Self { store }
    }

    /// Up to `limit` cards for words whose export flag is clear, in listing order
    pub async fn select_for_export(&self, limit: usize) -> Result<Vec<Flashcard>, AppError> {
        let records = self.select_records(limit).await?;
        Ok(records.iter().map(Flashcard::from).collect())
    }

    async fn select_records(&self, limit: usize) -> Result<Vec<WordRecord>, AppError> {
        if limit == 0 {
            return Err(AppError::validation(EXPORT, "limit must be at least 1"));
        }

        self.store
            .select_unexported(limit)
            .await
            .map_err(|e| AppError::store(EXPORT, e))
    }

    /// Write `cards` as CSV with a `Front,Back` header
    pub fn write_flashcards<W: Write>(cards: &[Flashcard], writer: W) -> io::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["Front", "Back"]).map_err(csv_to_io)?;
        for card in cards {
            csv_writer
                .write_record([card.front.as_str(), card.back.as_str()])
                .map_err(csv_to_io)?;
        }
        csv_writer.flush()
    }

    /// Export up to `limit` unexported words to `path` and flag them.
    ///
    /// Exactly the records written to the file are flagged, by id.
    pub async fn export_to_path(&self, limit: usize, path: &Path) -> Result<ExportOutcome, AppError> {
        let records = self.select_records(limit).await?;
        if records.is_empty() {
            info!("No new words available for export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let cards: Vec<Flashcard> = records.iter().map(Flashcard::from).collect();
        let ids: Vec<RecordId> = records.iter().map(|r| r.id).collect();

        FileManager::write_atomic(path, |w| Self::write_flashcards(&cards, w))
            .map_err(|e| AppError::io(EXPORT, path, e))?;
        debug!("Wrote {} flashcards to {:?}", cards.len(), path);

        let flagged = self
            .store
            .mark_exported_ids(&ids)
            .await
            .map_err(|e| AppError::store(EXPORT, e))?;
        if flagged != ids.len() {
            warn!("Flagged {} of {} exported words; the rest were removed meanwhile", flagged, ids.len());
        }

        info!("Successfully exported {} cards to {:?}", cards.len(), path);
        Ok(ExportOutcome::Exported {
            count: cards.len(),
            path: path.to_path_buf(),
        })
    }
}

fn csv_to_io(error: csv::Error) -> io::Error {
    match error.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::new(io::ErrorKind::Other, format!("{:?}", other)),
    }
}
