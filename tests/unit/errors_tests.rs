/*!
 * Tests for error types
 */

use bilinguo::errors::{AppError, ProviderError};
use std::error::Error;

#[test]
fn test_providerError_display_shouldDescribeFailure() {
    let error = ProviderError::ApiError { status_code: 429, message: "quota".to_string() };
    assert_eq!(error.to_string(), "API responded with error: 429 - quota");

    let error = ProviderError::Timeout(10);
    assert_eq!(error.to_string(), "Request timed out after 10 seconds");

    let error = ProviderError::NoTranslation { word: "cat".to_string() };
    assert!(error.to_string().contains("'cat'"));
}

#[test]
fn test_appError_translation_shouldExposeProviderSource() {
    let error = AppError::Translation {
        word: "cat".to_string(),
        source: ProviderError::RequestFailed("connection refused".to_string()),
    };

    assert!(error.to_string().contains("cat"));
    let source = error.source().expect("translation error should have a source");
    assert!(source.to_string().contains("connection refused"));
}

#[test]
fn test_appError_constructors_shouldNameOperation() {
    let validation = AppError::validation("export", "limit must be at least 1");
    assert!(validation.to_string().starts_with("export:"));

    let io = AppError::io("import-text", "/missing.txt", "No such file or directory");
    assert!(io.to_string().contains("/missing.txt"));

    let store = AppError::store("list", anyhow::anyhow!("disk I/O error").context("reading words"));
    let text = store.to_string();
    assert!(text.contains("reading words"));
    assert!(text.contains("disk I/O error"));
}
