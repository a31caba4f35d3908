/*!
 * Tests for the vocabulary store against an on-disk database
 */

use bilinguo::database::{DatabaseConnection, UpsertOutcome, VocabularyStore};

use crate::common;

fn open_store(dir: &std::path::Path) -> VocabularyStore {
    let db = DatabaseConnection::new(dir.join("data").join("vocab.db")).expect("Failed to open database");
    VocabularyStore::new(db)
}

#[tokio::test]
async fn test_store_afterReopen_shouldKeepWordsAndFlags() {
    let dir = common::create_temp_dir().unwrap();
    {
        let store = open_store(dir.path());
        store.upsert("Cat", "gato").await.unwrap();
        store.upsert("dog", "").await.unwrap();
        assert!(store.mark_exported("cat").await.unwrap());
    }

    let store = open_store(dir.path());
    let records = store.list_all().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].word, "cat");
    assert_eq!(records[0].translations, vec!["gato"]);
    assert!(records[0].exported);
    assert!(!records[1].exported);
}

#[tokio::test]
async fn test_upsert_fromConcurrentTasks_shouldKeepOneRecordWithAllTranslations() {
    let dir = common::create_temp_dir().unwrap();
    let store = open_store(dir.path());
    let translations = ["gato", "felino", "minino", "michi"];

    let handles: Vec<_> = translations
        .iter()
        .map(|t| {
            let store = store.clone();
            let t = t.to_string();
            tokio::spawn(async move { store.upsert("cat", &t).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    let mut stored = records[0].translations.clone();
    stored.sort();
    let mut expected: Vec<String> = translations.iter().map(|t| t.to_string()).collect();
    expected.sort();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_upsert_afterExport_shouldClearFlagOnlyForNewTranslation() {
    let dir = common::create_temp_dir().unwrap();
    let store = open_store(dir.path());
    store.upsert("cat", "gato").await.unwrap();
    store.mark_exported("cat").await.unwrap();

    let outcome = store.upsert("CAT!", "gato").await.unwrap();
    assert!(matches!(outcome, UpsertOutcome::Unchanged(_)));
    assert_eq!(store.stats().await.unwrap().exported_words, 1);

    let outcome = store.upsert("cat", "felino").await.unwrap();
    assert!(matches!(outcome, UpsertOutcome::Merged(_)));
    assert_eq!(store.stats().await.unwrap().exported_words, 0);
}

#[tokio::test]
async fn test_store_withLegacyUnnormalizedRow_shouldStillAddressIt() {
    let dir = common::create_temp_dir().unwrap();
    let store = open_store(dir.path());
    store
        .connection()
        .execute(|conn| {
            conn.execute(
                "INSERT INTO words (word, translations, added_at, anki_created) \
                 VALUES ('Hello', 'hola', '2023-01-02 03:04:05', 0)",
                [],
            )?;
            Ok(())
        })
        .unwrap();

    assert!(store.mark_exported("Hello").await.unwrap());
    let record = store.find_by_word("Hello").await.unwrap().unwrap();
    assert!(record.exported);
    assert_eq!(record.added_at_display(), "2023-01-02 03:04:05");

    let ids = store.find_ids_by_words(&["Hello".to_string(), "ghost".to_string()]).await.unwrap();
    assert_eq!(store.delete(&ids).await.unwrap(), 1);
    assert_eq!(store.stats().await.unwrap().total_words, 0);
}

#[tokio::test]
async fn test_stats_shouldFormatCounters() {
    let dir = common::create_temp_dir().unwrap();
    let store = open_store(dir.path());
    for word in ["ant", "bee", "cat"] {
        store.upsert(word, "").await.unwrap();
    }
    store.mark_exported("bee").await.unwrap();

    let stats = store.stats().await.unwrap();

    assert_eq!(stats.to_string(), "Words: 3 | Flashcards: 1");
}
