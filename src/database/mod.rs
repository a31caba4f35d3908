/*!
 * Database module for persistent vocabulary storage.
 *
 * SQLite holds one `words` table; `VocabularyStore` is the only code that
 * reads or writes it.
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{RecordId, UpsertOutcome, VocabularyStats, WordRecord};
pub use repository::VocabularyStore;
