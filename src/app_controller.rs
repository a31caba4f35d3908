use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::database::{DatabaseConnection, RecordId, VocabularyStats, VocabularyStore, WordRecord};
use crate::errors::AppError;
use crate::export::{ExportOutcome, FlashcardExporter};
use crate::import::{self, ImportSummary};
use crate::language_utils;
use crate::providers::mymemory::MyMemory;
use crate::providers::{TranslationGateway, TranslationRequest};
use crate::translation_worker::TranslationWorker;
use crate::vocabulary::normalize_word;

// @module: Application controller for vocabulary actions

/// Result of a "save edits" action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// New translations were added
    Updated,
    /// Every piece was already present
    Unchanged,
    /// No record for the word
    NotFound,
}

/// Per-word result of a translate action
#[derive(Debug)]
pub struct TranslationReport {
    /// Word that was translated
    pub word: String,
    /// The accepted translation, or why there is none
    pub result: Result<String, AppError>,
}

/// Main application controller.
///
/// Owns the vocabulary store and the translation provider. Every store
/// write, including those resulting from background translations, is issued
/// from here.
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Vocabulary store
    store: VocabularyStore,
    // @field: Translation provider
    gateway: Arc<dyn TranslationGateway>,
}

impl Controller {
    // @method: Open the configured database and provider
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let db_path = config
            .resolve_database_path()
            .map_err(|e| AppError::store("open", e))?;
        let db = DatabaseConnection::new(&db_path).map_err(|e| AppError::store("open", e))?;
        let gateway = MyMemory::new(config.translation.endpoint.clone(), config.translation.timeout_secs);

        Ok(Self::new(config, VocabularyStore::new(db), Arc::new(gateway)))
    }

    // @method: Assemble a controller from explicit parts
    pub fn new(config: Config, store: VocabularyStore, gateway: Arc<dyn TranslationGateway>) -> Self {
        Self { config, store, gateway }
    }

    /// Store used by this controller
    pub fn store(&self) -> &VocabularyStore {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Import a JSON word list
    pub async fn import_json(&self, path: &Path) -> Result<ImportSummary, AppError> {
        import::import_json_file(&self.store, path).await
    }

    /// Import all words of a text file
    pub async fn import_text(&self, path: &Path) -> Result<ImportSummary, AppError> {
        import::import_text_file(&self.store, path).await
    }

    /// All records in listing order
    pub async fn list(&self) -> Result<Vec<WordRecord>, AppError> {
        self.store.list_all().await.map_err(|e| AppError::store("list", e))
    }

    /// Word and flashcard counters
    pub async fn stats(&self) -> Result<VocabularyStats, AppError> {
        self.store.stats().await.map_err(|e| AppError::store("stats", e))
    }

    /// Translate each word in the background and store every translation that comes back.
    ///
    /// `source`/`target` fall back to the configured languages. Failures are
    /// reported per word and leave that word's record untouched.
    pub async fn translate_words(
        &self,
        words: &[String],
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<TranslationReport>, AppError> {
        let source = source.unwrap_or(&self.config.source_language);
        let target = target.unwrap_or(&self.config.target_language);
        let source = language_utils::to_provider_code(source)
            .map_err(|e| AppError::validation("translate", format!("{:#}", e)))?;
        let target = language_utils::to_provider_code(target)
            .map_err(|e| AppError::validation("translate", format!("{:#}", e)))?;

        let mut reports = Vec::new();
        let mut targets: HashMap<String, Option<RecordId>> = HashMap::new();
        let mut worker = TranslationWorker::new(Arc::clone(&self.gateway));

        for raw in words {
            let (word, id) = match self.resolve_word(raw).await? {
                Some(resolved) => resolved,
                None => {
                    reports.push(TranslationReport {
                        word: raw.clone(),
                        result: Err(AppError::validation("translate", format!("'{}' is not a word", raw))),
                    });
                    continue;
                }
            };
            targets.insert(word.clone(), id);
            worker.spawn(TranslationRequest::new(word, source.clone(), target.clone()));
        }

        // Results are applied here, never on the worker tasks
        while let Some(done) = worker.next_result().await {
            let word = done.request.word;
            let result = match done.outcome {
                Ok(translation) => {
                    let id = targets.get(&word).copied().flatten();
                    self.apply_translation(&word, id, &translation).await?;
                    info!("Translated '{}' successfully: {}", word, translation);
                    Ok(translation)
                }
                Err(source) => Err(AppError::Translation { word: word.clone(), source }),
            };
            reports.push(TranslationReport { word, result });
        }

        Ok(reports)
    }

    /// Stored key and id for a user-supplied word, or its normalized form if not stored yet
    async fn resolve_word(&self, raw: &str) -> Result<Option<(String, Option<RecordId>)>, AppError> {
        if let Some(record) = self
            .store
            .find_by_word(raw)
            .await
            .map_err(|e| AppError::store("translate", e))?
        {
            return Ok(Some((record.word, Some(record.id))));
        }

        let normalized = normalize_word(raw);
        Ok((!normalized.is_empty()).then_some((normalized, None)))
    }

    /// Store a fetched translation on the record it was requested for
    async fn apply_translation(&self, word: &str, id: Option<RecordId>, translation: &str) -> Result<(), AppError> {
        if let Some(id) = id {
            let found = self
                .store
                .find_by_id(id)
                .await
                .map_err(|e| AppError::store("translate", e))?;
            if found.is_some() {
                self.store
                    .merge_translations(id, translation)
                    .await
                    .map_err(|e| AppError::store("translate", e))?;
                return Ok(());
            }
            debug!("Word '{}' was removed during translation, storing it again", word);
        }

        self.store
            .upsert(word, translation)
            .await
            .map_err(|e| AppError::store("translate", e))?;
        Ok(())
    }

    /// Merge pipe-delimited translations into an existing word
    pub async fn save_edits(&self, word: &str, translations_text: &str) -> Result<EditOutcome, AppError> {
        let Some(record) = self
            .store
            .find_by_word(word)
            .await
            .map_err(|e| AppError::store("edit", e))?
        else {
            warn!("No stored word '{}' to edit", word.trim());
            return Ok(EditOutcome::NotFound);
        };

        let changed = self
            .store
            .merge_translations(record.id, translations_text.trim())
            .await
            .map_err(|e| AppError::store("edit", e))?;

        debug!("Edit of '{}' changed record: {}", record.word, changed);
        Ok(if changed { EditOutcome::Updated } else { EditOutcome::Unchanged })
    }

    /// Export flashcards; defaults come from the config
    pub async fn export(&self, limit: Option<usize>, output: Option<PathBuf>) -> Result<ExportOutcome, AppError> {
        let limit = limit.unwrap_or(self.config.export.default_limit);
        if limit == 0 || limit > self.config.export.max_limit {
            return Err(AppError::validation(
                "export",
                format!("limit must be between 1 and {} (got {})", self.config.export.max_limit, limit),
            ));
        }
        let output = output.unwrap_or_else(|| self.config.export.output_file.clone());

        FlashcardExporter::new(self.store.clone())
            .export_to_path(limit, &output)
            .await
    }

    /// Make every word eligible for export again
    pub async fn reset_export_flags(&self) -> Result<usize, AppError> {
        self.store
            .reset_all_export_flags()
            .await
            .map_err(|e| AppError::store("reset-flags", e))
    }

    /// Delete the given words; unknown words are ignored
    pub async fn delete_words(&self, words: &[String]) -> Result<usize, AppError> {
        let ids = self
            .store
            .find_ids_by_words(words)
            .await
            .map_err(|e| AppError::store("delete", e))?;

        let removed = self
            .store
            .delete(&ids)
            .await
            .map_err(|e| AppError::store("delete", e))?;

        info!("Deleted {} word(s)", removed);
        Ok(removed)
    }
}
