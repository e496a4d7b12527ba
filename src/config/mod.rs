// ==========================================
// CSV 导入工作簿 - 配置层
// ==========================================
// 职责: 系统配置管理,支持环境作用域覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, ConfigScope};
pub use import_config::ImportConfig;
pub use import_config_trait::ImportConfigReader;
