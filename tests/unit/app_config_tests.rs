/*!
 * Tests for application configuration functionality
 */

use bilinguo::app_config::{Config, LogLevel};
use std::path::PathBuf;

use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fa");
    assert_eq!(config.database_path, None);
    assert_eq!(config.translation.endpoint, "https://api.mymemory.translated.net/get");
    assert_eq!(config.translation.timeout_secs, 10);
    assert_eq!(config.export.default_limit, 50);
    assert_eq!(config.export.max_limit, 10_000);
    assert_eq!(config.export.output_file, PathBuf::from("anki_cards.csv"));
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.source_language = "".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    config.target_language = "eng".to_string();
    assert!(config.validate().is_err(), "same language in two code forms");
    config.target_language = "fa".to_string();

    config.translation.endpoint = "ftp://example.com/get".to_string();
    assert!(config.validate().is_err());
    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.endpoint = "http://localhost:8080/get".to_string();

    config.translation.timeout_secs = 0;
    assert!(config.validate().is_err());
    config.translation.timeout_secs = 5;

    config.export.default_limit = 20_000;
    assert!(config.validate().is_err());
    config.export.default_limit = 0;
    assert!(config.validate().is_err());
    config.export.default_limit = 25;

    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load_or_create(&path).unwrap(), config);
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{"target_language": "de", "export": {"default_limit": 10}, "log_level": "debug"}"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "de");
    assert_eq!(config.export.default_limit, 10);
    assert_eq!(config.export.max_limit, 10_000);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(log::LevelFilter::from(&config.log_level), log::LevelFilter::Debug);
}

#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_resolveDatabasePath_withExplicitPath_shouldUseIt() {
    let mut config = Config::default();
    config.database_path = Some(PathBuf::from("/tmp/words.db"));

    assert_eq!(config.resolve_database_path().unwrap(), PathBuf::from("/tmp/words.db"));
}
