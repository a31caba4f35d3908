/*!
 * # Bilinguo - vocabulary notebook with flashcard export
 *
 * A Rust library for collecting foreign-language words, translating them and
 * turning them into flashcards.
 *
 * ## Features
 *
 * - Import word lists from JSON or pull every word out of a text file
 * - Persist words with their translations in a local SQLite database
 * - Translate words in the background through the MyMemory API
 * - Export untouched words as `Front,Back` CSV flashcards
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `vocabulary`: Word normalization and tokenization
 * - `database`: SQLite-backed vocabulary store
 * - `providers`: Translation gateway trait and its clients:
 *   - `providers::mymemory`: MyMemory HTTP client
 *   - `providers::mock`: In-process gateway for tests
 * - `translation_worker`: Background translation requests
 * - `import` / `export`: JSON and text import, CSV flashcard export
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod import;
pub mod language_utils;
pub mod providers;
pub mod translation_worker;
pub mod vocabulary;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, EditOutcome, TranslationReport};
pub use database::{RecordId, UpsertOutcome, VocabularyStats, VocabularyStore, WordRecord};
pub use errors::{AppError, ProviderError};
pub use export::{ExportOutcome, Flashcard, FlashcardExporter};
pub use import::ImportSummary;
pub use language_utils::{get_language_name, language_codes_match};
pub use providers::{TranslationGateway, TranslationRequest};
pub use vocabulary::{normalize_word, tokenize_text};
