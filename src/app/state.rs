// ==========================================
// CSV 导入工作簿 - 应用状态
// ==========================================
// 职责: 管理宿主级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ImportApi;
use crate::config::ConfigManager;

/// 配置环境变量名
pub const ENV_DB_PATH: &str = "SHEET_IMPORTER_DB_PATH";
pub const ENV_DRIVE_ROOT: &str = "SHEET_IMPORTER_DRIVE_ROOT";
pub const ENV_CONFIG_ENVIRONMENT: &str = "SHEET_IMPORTER_ENV";

/// 应用状态
///
/// 宿主启动时创建一次，事件处理器共享其中的API实例
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 云盘根目录
    pub drive_root: PathBuf,

    /// 导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - drive_root: 云盘根目录
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 初始化数据库表结构
    /// 2. 写入缺省配置（不覆盖已有值）
    /// 3. 创建导入API（读取 SHEET_IMPORTER_ENV 作为配置环境）
    pub fn new(db_path: String, drive_root: PathBuf) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let config = ConfigManager::new(&db_path).map_err(|e| format!("无法打开配置库: {}", e))?;
        let seeded = config
            .seed_defaults()
            .map_err(|e| format!("写入缺省配置失败: {}", e))?;
        if seeded > 0 {
            tracing::info!(seeded, "已写入缺省配置");
        }

        let mut import_api = ImportApi::new(db_path.clone(), drive_root.clone());
        if let Some(env) = read_env(ENV_CONFIG_ENVIRONMENT) {
            tracing::info!(environment = %env, "使用配置环境");
            import_api = import_api.with_environment(env);
        }

        Ok(Self {
            db_path,
            drive_root,
            import_api: Arc::new(import_api),
        })
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 应用数据目录（不存在时创建）
fn app_data_dir() -> Option<PathBuf> {
    let data_dir = dirs::data_dir()?;

    // 开发环境使用独立目录，避免污染正式数据
    #[cfg(debug_assertions)]
    let path = data_dir.join("sheet-importer-dev");

    #[cfg(not(debug_assertions))]
    let path = data_dir.join("sheet-importer");

    std::fs::create_dir_all(&path).ok();
    Some(path)
}

/// 获取默认数据库路径
///
/// 优先级: SHEET_IMPORTER_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Some(path) = read_env(ENV_DB_PATH) {
        return path;
    }

    app_data_dir()
        .map(|dir| dir.join("sheet_importer.db"))
        .unwrap_or_else(|| PathBuf::from("./sheet_importer.db"))
        .to_string_lossy()
        .to_string()
}

/// 获取默认云盘根目录
///
/// 优先级: SHEET_IMPORTER_DRIVE_ROOT → 用户数据目录/drive → 当前目录
pub fn get_default_drive_root() -> PathBuf {
    if let Some(path) = read_env(ENV_DRIVE_ROOT) {
        return PathBuf::from(path);
    }

    app_data_dir()
        .map(|dir| dir.join("drive"))
        .unwrap_or_else(|| PathBuf::from("."))
}
