// ==========================================
// CSV 导入工作簿 - 导入API
// ==========================================
// 职责: 宿主事件入口（用户在文件选择器中确认后调用）
// 流程: 读取配置 → 分类 → 逐个导入 → 生成报告 → 渲染 HTML
// 每次调用独立创建组件，不在调用之间共享批次状态
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::report_view::render_report_html;
use crate::config::{ConfigManager, ImportConfig, ImportConfigReader};
use crate::domain::{FileDescriptor, ImportReport, ImportSummary};
use crate::importer::{
    build_report, ErrorCategory, FileClassifier, ImportFailure, LocalDriveSource, SheetImporter,
    SheetImporterImpl,
};
use crate::repository::{SheetRepository, SqliteSheetRepository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 本次运行ID
    pub run_id: String,
    /// 按分类分组的导入报告
    pub report: ImportReport,
    /// 各分组计数
    pub summary: ImportSummary,
    /// 渲染后的报告（供宿主直接展示）
    pub html: String,
    /// 批次中止信息（批次完整执行时为空）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ImportFailureInfo>,
    /// 导入完成时间
    pub imported_at: DateTime<Utc>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

impl ImportApiResponse {
    /// 批次是否完整执行
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// 批次中止信息（可序列化视图）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailureInfo {
    /// 失败文件ID
    pub file_id: String,
    /// 失败原因
    pub message: String,
    /// 错误分类
    pub category: ErrorCategory,
    /// 未导入的文件（含失败文件本身）
    pub unprocessed: Vec<FileDescriptor>,
}

impl From<&ImportFailure> for ImportFailureInfo {
    fn from(failure: &ImportFailure) -> Self {
        Self {
            file_id: failure.file_id.clone(),
            message: failure.error.to_string(),
            category: failure.error.category(),
            unprocessed: failure.unprocessed.clone(),
        }
    }
}

/// 导入API
pub struct ImportApi {
    // 配置库 + 默认工作簿
    db_path: String,

    // 云盘根目录
    drive_root: PathBuf,

    // 配置环境作用域
    environment: Option<String>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: impl Into<String>, drive_root: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            drive_root: drive_root.into(),
            environment: None,
        }
    }

    /// 指定配置环境（env/<name> 作用域覆盖全局配置）
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn config_manager(&self) -> ApiResult<ConfigManager> {
        let manager = ConfigManager::new(&self.db_path)?;
        Ok(match &self.environment {
            Some(env) => manager.with_environment(env.as_str()),
            None => manager,
        })
    }

    /// 读取本次运行配置
    ///
    /// # 返回
    /// - Err(ApiError::ConfigurationError): 缺少或无效的文件名规则
    pub async fn load_import_config(&self) -> ApiResult<ImportConfig> {
        let config = self.config_manager()?.load_import_config().await?;
        Ok(config)
    }

    /// 打开导入目标工作簿（配置了调试工作簿时使用调试工作簿）
    ///
    /// # 返回
    /// - Err(ApiError::ConfigurationError): 调试工作簿不存在（不会自动创建）
    fn open_workbook(&self, config: &ImportConfig) -> ApiResult<SqliteSheetRepository> {
        let path = match config.debug_workbook_id.as_deref() {
            Some(debug_id) if config.uses_debug_workbook() => {
                let debug_id = debug_id.trim();
                if !Path::new(debug_id).is_file() {
                    return Err(ApiError::ConfigurationError(format!(
                        "调试工作簿不存在: {}",
                        debug_id
                    )));
                }
                warn!(debug_workbook_id = debug_id, "使用调试工作簿");
                debug_id
            }
            _ => self.db_path.as_str(),
        };

        Ok(SqliteSheetRepository::new(path)?)
    }

    /// 导入用户选择的文件
    ///
    /// # 参数
    /// - files: 文件选择器返回的描述符（保持选择顺序）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 报告；批次中途失败时 failure 非空，已导入的结果仍保留
    /// - Err(ApiError::ConfigurationError): 配置错误，未处理任何文件
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn load_selected_files(
        &self,
        files: Vec<FileDescriptor>,
    ) -> ApiResult<ImportApiResponse> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        // 1. 配置（分类前解析一次）
        let config = self.load_import_config().await?;
        let classifier = FileClassifier::from_config(&config)?;
        let repo = Arc::new(self.open_workbook(&config)?);

        // 2. 分类
        let classified = classifier.classify(files);

        // 3. 导入
        let source = Arc::new(LocalDriveSource::new(self.drive_root.clone()));
        let importer = SheetImporterImpl::new(repo, source);
        let outcome = importer.import_batch(classified).await;

        // 4. 报告
        let report = build_report(&outcome.batch);
        let failure = outcome.failure.as_ref().map(ImportFailureInfo::from);
        let html = render_report_html(&report, failure.as_ref());
        let summary = report.summary();

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        info!(
            run_id = %run_id,
            imported = summary.imported,
            renamed = summary.renamed,
            invalid_name = summary.invalid_name,
            invalid_type = summary.invalid_type,
            failed = failure.is_some(),
            elapsed_ms,
            "导入运行完成"
        );

        Ok(ImportApiResponse {
            run_id,
            report,
            summary,
            html,
            failure,
            imported_at: Utc::now(),
            elapsed_ms,
        })
    }

    /// 列出用户创建的工作表（排除保留工作表，按名称排序）
    pub async fn list_user_sheets(&self) -> ApiResult<Vec<String>> {
        let config = self.load_import_config().await?;
        let repo = self.open_workbook(&config)?;
        let names = repo
            .user_created_sheet_names(&config.reserved_sheet_names)
            .await?;
        Ok(names)
    }

    /// 读取工作表内容
    pub async fn read_sheet(&self, name: &str) -> ApiResult<Vec<Vec<String>>> {
        let config = self.load_import_config().await?;
        let repo = self.open_workbook(&config)?;
        let sheet = repo
            .get_sheet_by_name(name)
            .await?
            .ok_or_else(|| ApiError::InvalidInput(format!("工作表不存在: {}", name)))?;
        Ok(repo.read_rows(&sheet).await?)
    }
}
