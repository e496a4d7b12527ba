// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置读取、环境覆写与缺省值
// ==========================================


use sheet_importer::config::{config_keys, ConfigManager, ConfigScope, ImportConfigReader};
use sheet_importer::importer::{ErrorCategory, ImportError};
use test_helpers::{create_configured_db, create_test_db};

#[tokio::test]
async fn test_missing_pattern_is_configuration_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let err = config_manager.load_import_config().await.unwrap_err();
    assert!(matches!(err, ImportError::MissingConfiguration(_)));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn test_seed_defaults_is_idempotent() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config_manager.seed_defaults().unwrap(), 3);
    assert_eq!(config_manager.seed_defaults().unwrap(), 0);

    let config = config_manager.load_import_config().await.unwrap();
    assert_eq!(config.valid_filename_pattern, "^(.+)$");
    assert_eq!(config.expected_mime_type, "text/csv");
    assert!(config.reserved_sheet_names.is_empty());
    assert!(config.debug_workbook_id.is_none());
}

#[tokio::test]
async fn test_seed_defaults_keeps_existing_values() {
    let (_temp_file, db_path) = create_configured_db(r"^(\d+)\.csv$").unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager.seed_defaults().unwrap();

    let pattern = config_manager.get_valid_filename_pattern().await.unwrap();
    assert_eq!(pattern, r"^(\d+)\.csv$");
}

#[tokio::test]
async fn test_environment_overrides_global() {
    let (_temp_file, db_path) = create_configured_db("^(.+)$").unwrap();
    let admin = ConfigManager::new(&db_path).unwrap();
    admin
        .set_config_value(
            &ConfigScope::Environment {
                name: "test".to_string(),
            },
            config_keys::VALID_FILENAME_PATTERN,
            r"^test-(.+)$",
        )
        .unwrap();

    let global = ConfigManager::new(&db_path).unwrap();
    assert_eq!(global.get_valid_filename_pattern().await.unwrap(), "^(.+)$");

    let scoped = ConfigManager::new(&db_path).unwrap().with_environment("test");
    assert_eq!(scoped.environment(), Some("test"));
    assert_eq!(scoped.get_valid_filename_pattern().await.unwrap(), r"^test-(.+)$");

    // 环境作用域未设置的键回落到 global
    assert_eq!(scoped.get_expected_mime_type().await.unwrap(), "text/csv");

    let snapshot: serde_json::Value =
        serde_json::from_str(&scoped.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::VALID_FILENAME_PATTERN], r"^test-(.+)$");
}

#[tokio::test]
async fn test_reserved_sheet_names_parsing() {
    let (_temp_file, db_path) = create_configured_db("^(.+)$").unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();
    config_manager
        .set_config_value(
            &ConfigScope::Global,
            config_keys::RESERVED_SHEET_NAMES,
            " Sheet1, ,Summary ",
        )
        .unwrap();

    let names = config_manager.get_reserved_sheet_names().await.unwrap();
    assert_eq!(names, vec!["Sheet1", "Summary"]);
}

#[tokio::test]
async fn test_pattern_without_capture_group_rejected() {
    let (_temp_file, db_path) = create_configured_db(r"^.+\.csv$").unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let err = config_manager.load_import_config().await.unwrap_err();
    assert!(matches!(err, ImportError::InvalidFilenamePattern { .. }));
    assert!(err.is_configuration_error());
}
