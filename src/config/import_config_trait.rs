// ==========================================
// CSV 导入工作簿 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入流程所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取文件名校验正则
    ///
    /// # 返回
    /// - Ok(String): 正则源文本
    /// - Err(MissingConfiguration): 未配置（无默认值）
    async fn get_valid_filename_pattern(&self) -> ImportResult<String>;

    /// 获取允许的 MIME 类型
    ///
    /// # 默认值
    /// - text/csv
    async fn get_expected_mime_type(&self) -> ImportResult<String>;

    /// 获取保留工作表名列表
    ///
    /// # 默认值
    /// - []
    async fn get_reserved_sheet_names(&self) -> ImportResult<Vec<String>>;

    /// 获取调试工作簿 ID
    ///
    /// # 默认值
    /// - None
    async fn get_debug_workbook_id(&self) -> ImportResult<Option<String>>;

    /// 一次性解析本次运行的完整配置并校验
    ///
    /// # 返回
    /// - Err: 任一必填项缺失或规则非法（ConfigurationError，在处理任何文件前中止）
    async fn load_import_config(&self) -> ImportResult<ImportConfig> {
        let config = ImportConfig {
            valid_filename_pattern: self.get_valid_filename_pattern().await?,
            expected_mime_type: self.get_expected_mime_type().await?,
            reserved_sheet_names: self.get_reserved_sheet_names().await?,
            debug_workbook_id: self.get_debug_workbook_id().await?,
        };
        config.validate()?;
        Ok(config)
    }
}
