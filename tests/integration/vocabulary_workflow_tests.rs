/*!
 * End-to-end tests: import, translate, edit and export through the controller
 */

use bilinguo::providers::mock::MockGateway;
use bilinguo::{AppError, EditOutcome, ExportOutcome};
use std::fs;

use crate::common;

#[tokio::test]
async fn test_workflow_importTranslateExport_shouldProduceFlashcards() {
    let dir = common::create_temp_dir().unwrap();
    let gateway = MockGateway::with_translations([("house", "casa"), ("tree", "árbol")]);
    let controller = common::create_test_controller(dir.path(), gateway);
    let text = common::create_test_file(dir.path(), "story.txt", "The house. A tree, the HOUSE!").unwrap();

    let summary = controller.import_text(&text).await.unwrap();
    assert_eq!(summary.created, 3);

    let words = vec!["house".to_string(), "tree".to_string()];
    let reports = controller.translate_words(&words, None, None).await.unwrap();
    assert!(reports.iter().all(|r| r.result.is_ok()));

    let outcome = controller.export(None, None).await.unwrap();
    let output = dir.path().join("anki_cards.csv");
    assert_eq!(outcome, ExportOutcome::Exported { count: 3, path: output.clone() });

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv, "Front,Back\nhouse,casa\nthe,\ntree,árbol\n");
    assert_eq!(controller.stats().await.unwrap().to_string(), "Words: 3 | Flashcards: 3");
}

#[tokio::test]
async fn test_workflow_withFailingGateway_shouldLeaveStoreUnchanged() {
    let dir = common::create_temp_dir().unwrap();
    let controller = common::create_test_controller(dir.path(), MockGateway::failing());
    controller.store().upsert("house", "casa").await.unwrap();
    let before = controller.list().await.unwrap();

    let reports = controller
        .translate_words(&["house".to_string(), "garden".to_string()], None, None)
        .await
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| matches!(r.result, Err(AppError::Translation { .. }))));
    let after = controller.list().await.unwrap();
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0].translations, before[0].translations);
}

#[tokio::test]
async fn test_workflow_withSlowGateway_shouldApplyEveryResult() {
    let dir = common::create_temp_dir().unwrap();
    let gateway = MockGateway::slow(20, &[("one", "uno"), ("two", "dos"), ("three", "tres")]);
    let controller = common::create_test_controller(dir.path(), gateway.clone());

    let words: Vec<String> = ["one", "two", "three"].iter().map(|w| w.to_string()).collect();
    let reports = controller.translate_words(&words, Some("en"), Some("es")).await.unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(gateway.request_count(), 3);
    let records = controller.list().await.unwrap();
    let pairs: Vec<(String, String)> = records.iter().map(|r| (r.word.clone(), r.joined_translations())).collect();
    assert_eq!(
        pairs,
        vec![
            ("one".to_string(), "uno".to_string()),
            ("three".to_string(), "tres".to_string()),
            ("two".to_string(), "dos".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_workflow_exportInBatches_shouldNotRepeatCards() {
    let dir = common::create_temp_dir().unwrap();
    let controller = common::create_test_controller(dir.path(), MockGateway::echo());
    for word in ["ant", "bee", "cat", "dog", "eel", "fox", "gnu", "hen"] {
        controller.store().upsert(word, "x").await.unwrap();
    }
    for word in ["fox", "gnu", "hen"] {
        controller.store().mark_exported(word).await.unwrap();
    }

    let first = dir.path().join("first.csv");
    let outcome = controller.export(Some(3), Some(first.clone())).await.unwrap();
    assert!(matches!(outcome, ExportOutcome::Exported { count: 3, .. }));
    assert_eq!(fs::read_to_string(&first).unwrap(), "Front,Back\nant,x\nbee,x\ncat,x\n");

    let second = dir.path().join("second.csv");
    let outcome = controller.export(Some(3), Some(second.clone())).await.unwrap();
    assert!(matches!(outcome, ExportOutcome::Exported { count: 2, .. }));
    assert_eq!(fs::read_to_string(&second).unwrap(), "Front,Back\ndog,x\neel,x\n");

    let third = dir.path().join("third.csv");
    let outcome = controller.export(Some(3), Some(third.clone())).await.unwrap();
    assert_eq!(outcome, ExportOutcome::NothingToExport);
    assert!(!third.exists());

    assert_eq!(controller.reset_export_flags().await.unwrap(), 8);
    assert_eq!(controller.stats().await.unwrap().exported_words, 0);
}

#[tokio::test]
async fn test_workflow_saveEdits_shouldMergeAndReopenExport() {
    let dir = common::create_temp_dir().unwrap();
    let controller = common::create_test_controller(dir.path(), MockGateway::echo());
    controller.store().upsert("house", "casa").await.unwrap();
    controller.store().mark_exported("house").await.unwrap();

    let outcome = controller.save_edits("House", " casa |hogar| | vivienda ").await.unwrap();
    assert_eq!(outcome, EditOutcome::Updated);
    let record = controller.store().find_by_word("house").await.unwrap().unwrap();
    assert_eq!(record.translations, vec!["casa", "hogar", "vivienda"]);
    assert!(!record.exported);

    let outcome = controller.save_edits("house", "hogar").await.unwrap();
    assert_eq!(outcome, EditOutcome::Unchanged);
}

#[tokio::test]
async fn test_workflow_importJsonThenDelete_shouldRemoveOnlyNamedWords() {
    let dir = common::create_temp_dir().unwrap();
    let controller = common::create_test_controller(dir.path(), MockGateway::echo());
    let json = common::create_test_file(
        dir.path(),
        "words.json",
        r#"[{"word": "Apple", "translation": "manzana"}, {"word": "pear"}, {"word": "plum", "translation": "ciruela"}]"#,
    )
    .unwrap();

    let summary = controller.import_json(&json).await.unwrap();
    assert_eq!(summary.imported, 3);

    let removed = controller
        .delete_words(&["apple".to_string(), "plum".to_string(), "kiwi".to_string()])
        .await
        .unwrap();

    assert_eq!(removed, 2);
    let words: Vec<String> = controller.list().await.unwrap().into_iter().map(|r| r.word).collect();
    assert_eq!(words, vec!["pear"]);
}

#[tokio::test]
async fn test_workflow_importJsonWithObjectTopLevel_shouldRejectFile() {
    let dir = common::create_temp_dir().unwrap();
    let controller = common::create_test_controller(dir.path(), MockGateway::echo());
    let json = common::create_test_file(dir.path(), "words.json", r#"{"word": "apple"}"#).unwrap();

    let result = controller.import_json(&json).await;

    assert!(matches!(result, Err(AppError::Validation { .. })));
    assert_eq!(controller.stats().await.unwrap().total_words, 0);
}
