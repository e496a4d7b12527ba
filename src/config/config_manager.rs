// ==========================================
// CSV 导入工作簿 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 覆写: 环境作用域 (env/<name>) 优先于全局作用域 (global)
// ==========================================

use crate::config::import_config::{DEFAULT_FILENAME_PATTERN, DEFAULT_MIME_TYPE};
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    environment: Option<String>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: format!("打开配置库失败: {}", e),
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            environment: None,
        })
    }

    /// 从已有连接创建 ConfigManager（表结构需已存在）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            environment: None,
        }
    }

    /// 指定环境作用域；该作用域下的键覆盖全局值
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        let environment = environment.into();
        self.environment = if environment.trim().is_empty() {
            None
        } else {
            Some(environment.trim().to_string())
        };
        self
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    fn lock(&self, key: &str) -> ImportResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: format!("锁获取失败: {}", e),
        })
    }

    /// 从 config_kv 表读取单个作用域的配置值
    fn get_scoped_value(&self, scope: &ConfigScope, key: &str) -> ImportResult<Option<String>> {
        let conn = self.lock(key)?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![scope.scope_id(), key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 读取配置值（环境作用域优先，其次 global）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        if let Some(env) = &self.environment {
            let scope = ConfigScope::Environment { name: env.clone() };
            if let Some(value) = self.get_scoped_value(&scope, key)? {
                tracing::debug!(key, environment = %env, "使用环境覆写配置");
                return Ok(Some(value));
            }
        }
        self.get_scoped_value(&ConfigScope::Global, key)
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, scope: &ConfigScope, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.lock(key)?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![scope.scope_id(), key, value],
        )
        .map_err(|e| ImportError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// 写入默认配置（不覆盖已有值）
    ///
    /// # 返回
    /// - Ok(usize): 新写入的配置项数量
    pub fn seed_defaults(&self) -> ImportResult<usize> {
        let defaults = [
            (config_keys::VALID_FILENAME_PATTERN, DEFAULT_FILENAME_PATTERN),
            (config_keys::EXPECTED_MIME_TYPE, DEFAULT_MIME_TYPE),
            (config_keys::RESERVED_SHEET_NAMES, ""),
        ];

        let conn = self.lock("*")?;
        let mut count = 0;
        for (key, value) in defaults {
            count += conn
                .execute(
                    "INSERT OR IGNORE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                    params![key, value],
                )
                .map_err(|e| ImportError::ConfigValueError {
                    key: key.to_string(),
                    value: value.to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(count)
    }

    /// 获取当前生效配置的快照（JSON格式，环境覆写已合并）
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let conn = self.lock("*")?;
        let read_err = |e: rusqlite::Error| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: e.to_string(),
        };

        let mut stmt = conn
            .prepare("SELECT scope_id, key, value FROM config_kv ORDER BY key")
            .map_err(read_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(read_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;

        let env_scope = self
            .environment
            .as_ref()
            .map(|name| ConfigScope::Environment { name: name.clone() }.scope_id());

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for (scope_id, key, value) in &rows {
            if scope_id == "global" {
                config_map.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        for (scope_id, key, value) in rows {
            if Some(&scope_id) == env_scope.as_ref() {
                config_map.insert(key, value);
            }
        }

        Ok(json!(config_map).to_string())
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_valid_filename_pattern(&self) -> ImportResult<String> {
        match self.get_config_value(config_keys::VALID_FILENAME_PATTERN)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ImportError::MissingConfiguration(
                config_keys::VALID_FILENAME_PATTERN.to_string(),
            )),
        }
    }

    async fn get_expected_mime_type(&self) -> ImportResult<String> {
        let value = self.get_config_or_default(config_keys::EXPECTED_MIME_TYPE, DEFAULT_MIME_TYPE)?;
        let value = value.trim();
        if value.is_empty() {
            Ok(DEFAULT_MIME_TYPE.to_string())
        } else {
            Ok(value.to_string())
        }
    }

    async fn get_reserved_sheet_names(&self) -> ImportResult<Vec<String>> {
        let value = self.get_config_or_default(config_keys::RESERVED_SHEET_NAMES, "")?;

        Ok(value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    async fn get_debug_workbook_id(&self) -> ImportResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::DEBUG_WORKBOOK_ID)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

// ==========================================
// ConfigScope - 配置作用域
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigScope {
    Global,                        // 全局
    Environment { name: String },  // 运行环境（dev/test/prod 等）
}

impl ConfigScope {
    pub fn scope_id(&self) -> String {
        match self {
            ConfigScope::Global => "global".to_string(),
            ConfigScope::Environment { name } => format!("env/{}", name),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 文件校验
    pub const VALID_FILENAME_PATTERN: &str = "valid_filename_pattern";
    pub const EXPECTED_MIME_TYPE: &str = "expected_mime_type";

    // 工作簿
    pub const RESERVED_SHEET_NAMES: &str = "reserved_sheet_names";
    pub const DEBUG_WORKBOOK_ID: &str = "debug_workbook_id";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_connection;

    fn in_memory_manager() -> ConfigManager {
        let conn = open_in_memory_connection().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_missing_pattern_is_configuration_error() {
        let manager = in_memory_manager();
        let err = manager.load_import_config().await.unwrap_err();

        assert!(matches!(err, ImportError::MissingConfiguration(_)));
        assert!(err.is_configuration_error());
    }

    #[tokio::test]
    async fn test_seed_defaults_then_load() {
        let manager = in_memory_manager();
        assert_eq!(manager.seed_defaults().unwrap(), 3);
        // 再次写入不覆盖
        assert_eq!(manager.seed_defaults().unwrap(), 0);

        let config = manager.load_import_config().await.unwrap();
        assert_eq!(config.valid_filename_pattern, DEFAULT_FILENAME_PATTERN);
        assert_eq!(config.expected_mime_type, "text/csv");
        assert!(config.reserved_sheet_names.is_empty());
        assert_eq!(config.debug_workbook_id, None);
    }

    #[tokio::test]
    async fn test_environment_overrides_global() {
        let manager = in_memory_manager().with_environment("test");
        manager.seed_defaults().unwrap();
        manager
            .set_config_value(
                &ConfigScope::Environment { name: "test".to_string() },
                config_keys::DEBUG_WORKBOOK_ID,
                "1JgQre88",
            )
            .unwrap();
        manager
            .set_config_value(
                &ConfigScope::Environment { name: "prod".to_string() },
                config_keys::EXPECTED_MIME_TYPE,
                "application/vnd.ms-excel",
            )
            .unwrap();

        let config = manager.load_import_config().await.unwrap();
        assert_eq!(config.debug_workbook_id.as_deref(), Some("1JgQre88"));
        // 其他环境的覆写不生效
        assert_eq!(config.expected_mime_type, "text/csv");
    }

    #[tokio::test]
    async fn test_reserved_sheet_names_parsing() {
        let manager = in_memory_manager();
        manager.seed_defaults().unwrap();
        manager
            .set_config_value(
                &ConfigScope::Global,
                config_keys::RESERVED_SHEET_NAMES,
                "Class Schedule, Mastery Data,,Constants ",
            )
            .unwrap();

        let names = manager.get_reserved_sheet_names().await.unwrap();
        assert_eq!(names, vec!["Class Schedule", "Mastery Data", "Constants"]);
    }

    #[tokio::test]
    async fn test_invalid_pattern_fails_load() {
        let manager = in_memory_manager();
        manager
            .set_config_value(&ConfigScope::Global, config_keys::VALID_FILENAME_PATTERN, "(")
            .unwrap();

        let err = manager.load_import_config().await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidFilenamePattern { .. }));
    }

    #[test]
    fn test_config_snapshot_merges_environment() {
        let manager = in_memory_manager().with_environment("dev");
        manager.seed_defaults().unwrap();
        manager
            .set_config_value(
                &ConfigScope::Environment { name: "dev".to_string() },
                config_keys::VALID_FILENAME_PATTERN,
                r"^(.+)\.csv$",
            )
            .unwrap();

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot[config_keys::VALID_FILENAME_PATTERN], r"^(.+)\.csv$");
        assert_eq!(snapshot[config_keys::EXPECTED_MIME_TYPE], "text/csv");
    }
}
