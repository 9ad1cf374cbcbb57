/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::path::PathBuf;

use bararan::app_config::{ColumnDetection, Config, LogLevel};
use bararan::language_utils::Script;
use bararan::sources::SourceKind;
use bararan::vocabulary::CefrLevel;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.languages.headword, "hy");
    assert_eq!(config.languages.archive, "ru");
    assert_eq!(config.languages.layout, "en");
    assert_eq!(config.sources.min_entries_per_source, 1000);
    assert_eq!(config.cache.dir, PathBuf::from("cache"));
    assert!(config.cache.reuse_archive);
    assert!(config.cache.reuse_layout);
    assert_eq!(config.layout.row_tolerance, 10.0);
    assert_eq!(config.layout.column_detection, ColumnDetection::Fixed);
    assert_eq!(config.layout.pronunciation_column_x, 200.0);
    assert_eq!(config.layout.translation_column_x, 350.0);
    assert_eq!(config.merge.max_translations, 5);
    assert_eq!(config.merge.primary_source, SourceKind::Layout);
    assert_eq!(config.filter.min_headword_len, 2);
    assert_eq!(config.filter.max_headword_len, 20);
    assert_eq!(config.filter.min_translation_len, 3);
    assert_eq!(config.levels.max_words, 10_000);
    assert_eq!(config.levels.bands.len(), 4);
    assert!(config.levels.bands.iter().all(|band| band.cap == 2500));
    assert_eq!(config.output.path, PathBuf::from("vocabulary.json"));
    assert_eq!(config.output.min_total_words, 1000);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.show_progress);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.languages.headword = "xyz".to_string();
    assert!(config.validate().is_err());
    config.languages.headword = "hy".to_string();

    config.layout.row_tolerance = 0.0;
    assert!(config.validate().is_err());
    config.layout.row_tolerance = 10.0;

    config.layout.pronunciation_column_x = 400.0;
    assert!(config.validate().is_err());
    config.layout.pronunciation_column_x = 200.0;

    config.merge.max_translations = 0;
    assert!(config.validate().is_err());
    config.merge.max_translations = 5;

    config.filter.min_headword_len = 30;
    assert!(config.validate().is_err());
    config.filter.min_headword_len = 2;

    config.levels.bands[1].cap = 0;
    assert!(config.validate().is_err());
    config.levels.bands[1].cap = 2500;

    config.levels.bands.swap(0, 1);
    assert!(config.validate().is_err());
    config.levels.bands.swap(0, 1);

    config.levels.bands[1].level = CefrLevel::A1;
    assert!(config.validate().is_err());
    config.levels.bands[1].level = CefrLevel::A2;

    config.levels.bands.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_or_default_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (config, found) = Config::load_or_default(temp_dir.path().join("conf.json"))?;

    assert!(!found);
    assert_eq!(config.levels.max_words, 10_000);
    assert!(!temp_dir.path().join("conf.json").exists());
    Ok(())
}

#[test]
fn test_load_or_default_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "sources": { "archive_dir": "dicts/ArmRus" },
            "layout": { "column_detection": "learned", "row_tolerance": 12.5 },
            "levels": { "bands": [
                { "level": "A1", "cap": 10, "max_complexity": 0.5 },
                { "level": "C1", "cap": 20 }
            ] },
            "log_level": "debug",
            "show_progress": false
        }"#,
    )?;

    let (config, found) = Config::load_or_default(&path)?;

    assert!(found);
    assert_eq!(config.sources.archive_dir, PathBuf::from("dicts/ArmRus"));
    assert_eq!(config.sources.min_entries_per_source, 1000);
    assert_eq!(config.layout.column_detection, ColumnDetection::Learned);
    assert_eq!(config.layout.row_tolerance, 12.5);
    assert_eq!(config.layout.translation_column_x, 350.0);
    assert_eq!(config.levels.bands.len(), 2);
    assert_eq!(config.levels.bands[1].level, CefrLevel::C1);
    assert_eq!(config.levels.bands[1].max_complexity, None);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(!config.show_progress);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_load_or_default_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_default(&path).is_err());
    Ok(())
}

#[test]
fn test_apply_cache_flags_withEachFlag_shouldDisableMatchingSource() {
    let mut config = Config::default();
    config.apply_cache_flags(false, true, false);
    assert!(!config.cache.reuse_archive);
    assert!(config.cache.reuse_layout);

    let mut config = Config::default();
    config.apply_cache_flags(false, false, true);
    assert!(config.cache.reuse_archive);
    assert!(!config.cache.reuse_layout);

    let mut config = Config::default();
    config.apply_cache_flags(true, false, false);
    assert!(!config.cache.reuse_archive);
    assert!(!config.cache.reuse_layout);
}

#[test]
fn test_headword_script_withArmenian_shouldBeArmenian() -> Result<()> {
    let config = Config::default();
    assert_eq!(config.headword_script()?, Script::Armenian);
    Ok(())
}

#[test]
fn test_translation_scripts_withConfiguredLanguages_shouldFollowThem() -> Result<()> {
    let mut config = Config::default();
    assert_eq!(config.archive_script()?, Script::Cyrillic);
    assert_eq!(config.layout_script()?, Script::Latin);

    config.languages.archive = "ka".to_string();
    assert_eq!(config.archive_script()?, Script::Georgian);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_validate_withTranslationInHeadwordScript_shouldFail() {
    let mut config = Config::default();
    config.languages.layout = "hy".to_string();
    assert!(config.validate().is_err());
}
