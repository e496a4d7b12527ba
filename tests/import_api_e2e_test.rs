// ==========================================
// 导入 API 端到端测试
// ==========================================
// 模拟宿主在用户确认文件选择后调用后端的完整流程
// ==========================================


use sheet_importer::api::{ApiError, ImportApi};
use sheet_importer::config::{config_keys, ConfigManager, ConfigScope};
use sheet_importer::domain::ImportCategory;
use sheet_importer::importer::ErrorCategory;
use sheet_importer::repository::{SheetRepository, SqliteSheetRepository};
use test_helpers::{create_configured_db, create_test_db, csv_descriptor, descriptor, ids, TestDrive};

#[tokio::test]
async fn test_load_selected_files_full_flow() {
    sheet_importer::logging::init_test();
    let (_temp_file, db_path) = create_configured_db(r"^(\d{4})-.+\.csv$").unwrap();
    let drive = TestDrive::new();
    drive.add_file("g1", "student,grade\nAda,A\n");
    drive.add_file("g2", "student,grade\nBob,B\n");

    let api = ImportApi::new(db_path.clone(), drive.root());
    let response = api
        .load_selected_files(vec![
            csv_descriptor("g1", "2016-grades.csv"),
            csv_descriptor("g2", "notes.csv"),
            descriptor("g3", "2016-photo.png", "image/png"),
            csv_descriptor("g4", "2016-GRADES.csv"),
        ])
        .await;

    // g4 与 g1 重名（大小写不敏感）但内容不存在：批次在 g4 中止
    let response = response.unwrap();
    assert!(!response.is_complete());
    assert_eq!(ids(response.report.files(ImportCategory::Imported)), vec!["g1"]);
    assert_eq!(ids(response.report.files(ImportCategory::InvalidName)), vec!["g2"]);
    assert_eq!(ids(response.report.files(ImportCategory::InvalidType)), vec!["g3"]);

    let failure = response.failure.as_ref().unwrap();
    assert_eq!(failure.file_id, "g4");
    assert_eq!(failure.category, ErrorCategory::Import);
    assert!(response.html.contains("import-failure"));

    let sheets = api.list_user_sheets().await.unwrap();
    assert_eq!(sheets, vec!["2016-grades.csv"]);
    let rows = api.read_sheet("2016-GRADES.CSV").await.unwrap();
    assert_eq!(rows[1], vec!["Ada", "A"]);
}

#[tokio::test]
async fn test_load_selected_files_renames_duplicates() {
    let (_temp_file, db_path) = create_configured_db("^(.+)$").unwrap();
    let drive = TestDrive::new();
    drive.add_file("a1", "x\n");
    drive.add_file("a2", "y\n");

    let api = ImportApi::new(db_path, drive.root());
    let response = api
        .load_selected_files(vec![
            csv_descriptor("a1", "data.csv"),
            descriptor("bad", "bad.exe", "application/x-exe"),
            csv_descriptor("a2", "data.csv"),
        ])
        .await
        .unwrap();

    assert!(response.is_complete());
    assert_eq!(response.summary.imported, 1);
    assert_eq!(response.summary.renamed, 1);
    assert_eq!(response.summary.invalid_type, 1);
    assert_eq!(
        response.report.files(ImportCategory::Renamed)[0].target_sheet_name(),
        "data.csv (2)"
    );

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("failure").is_none());
    assert_eq!(json["summary"]["renamed"], 1);
    assert!(!response.run_id.is_empty());
}

#[tokio::test]
async fn test_configuration_error_aborts_before_import() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let drive = TestDrive::new();
    drive.add_file("f1", "x\n");

    let api = ImportApi::new(db_path.clone(), drive.root());
    let result = api
        .load_selected_files(vec![csv_descriptor("f1", "data.csv")])
        .await;

    assert!(matches!(result, Err(ApiError::ConfigurationError(_))));

    // 未创建任何工作表
    ConfigManager::new(&db_path).unwrap().seed_defaults().unwrap();
    assert!(api.list_user_sheets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_environment_and_reserved_sheets() {
    let (_temp_file, db_path) = create_configured_db(r"^(x)$").unwrap();
    let config = ConfigManager::new(&db_path).unwrap();
    let env = ConfigScope::Environment {
        name: "dev".to_string(),
    };
    config
        .set_config_value(&env, config_keys::VALID_FILENAME_PATTERN, "^(.+)$")
        .unwrap();
    config
        .set_config_value(&ConfigScope::Global, config_keys::RESERVED_SHEET_NAMES, "Sheet1")
        .unwrap();

    let drive = TestDrive::new();
    drive.add_file("f1", "1\n");
    drive.add_file("f2", "2\n");

    let api = ImportApi::new(db_path, drive.root()).with_environment("dev");
    let response = api
        .load_selected_files(vec![
            csv_descriptor("f1", "Sheet1"),
            csv_descriptor("f2", "Budget"),
        ])
        .await
        .unwrap();

    assert_eq!(ids(response.report.files(ImportCategory::Imported)), vec!["f1", "f2"]);
    assert_eq!(api.list_user_sheets().await.unwrap(), vec!["Budget"]);
}

#[tokio::test]
async fn test_debug_workbook_receives_sheets() {
    let (_temp_file, db_path) = create_configured_db("^(.+)$").unwrap();
    let (_debug_file, debug_db_path) = create_test_db().unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_config_value(&ConfigScope::Global, config_keys::DEBUG_WORKBOOK_ID, &debug_db_path)
        .unwrap();

    let drive = TestDrive::new();
    drive.add_file("f1", "1\n");

    let api = ImportApi::new(db_path, drive.root());
    api.load_selected_files(vec![csv_descriptor("f1", "Debug")])
        .await
        .unwrap();

    let debug_repo = SqliteSheetRepository::new(&debug_db_path).unwrap();
    assert_eq!(debug_repo.list_sheet_names().await.unwrap(), vec!["Debug"]);
}

#[tokio::test]
async fn test_missing_debug_workbook_is_configuration_error() {
    let (_temp_file, db_path) = create_configured_db("^(.+)$").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.db");
    ConfigManager::new(&db_path)
        .unwrap()
        .set_config_value(
            &ConfigScope::Global,
            config_keys::DEBUG_WORKBOOK_ID,
            &missing.to_string_lossy(),
        )
        .unwrap();

    let drive = TestDrive::new();
    drive.add_file("f1", "1\n");

    let api = ImportApi::new(db_path, drive.root());
    let result = api
        .load_selected_files(vec![csv_descriptor("f1", "Debug")])
        .await;

    assert!(matches!(result, Err(ApiError::ConfigurationError(ref msg)) if msg.contains("absent.db")));
    assert!(!missing.exists(), "不应自动创建调试工作簿");
    assert!(matches!(
        api.list_user_sheets().await,
        Err(ApiError::ConfigurationError(_))
    ));
}
