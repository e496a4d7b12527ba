// ==========================================
// CSV 导入工作簿 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 配置错误 / 导入错误 / 不变量违反
// ==========================================

use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 配置错误（处理任何文件前中止）=====
    #[error("缺少配置项: {0}")]
    MissingConfiguration(String),

    #[error("文件名规则无效 ({pattern}): {message}")]
    InvalidFilenamePattern { pattern: String, message: String },

    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 文件内容错误 =====
    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 单文件导入错误（携带文件 ID，中止剩余批次）=====
    #[error("文件内容获取失败 (file_id={file_id}): {message}")]
    FetchFailed { file_id: String, message: String },

    #[error("文件内容解析失败 (file_id={file_id}): {message}")]
    ParseFailed { file_id: String, message: String },

    #[error("工作表写入失败 (file_id={file_id}, sheet={sheet_name}): {message}")]
    SheetWriteFailed {
        file_id: String,
        sheet_name: String,
        message: String,
    },

    // ===== 不变量违反 =====
    #[error("重名解析超出安全上限: base_name={base_name}, ceiling={ceiling}")]
    InvariantViolation { base_name: String, ceiling: usize },

    // ===== 数据库错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Configuration,
    Import,
    InvariantViolation,
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::MissingConfiguration(_)
            | ImportError::InvalidFilenamePattern { .. }
            | ImportError::ConfigReadError { .. }
            | ImportError::ConfigValueError { .. } => ErrorCategory::Configuration,
            ImportError::InvariantViolation { .. } => ErrorCategory::InvariantViolation,
            _ => ErrorCategory::Import,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// 关联的文件 ID（仅单文件导入错误）
    pub fn file_id(&self) -> Option<&str> {
        match self {
            ImportError::FetchFailed { file_id, .. }
            | ImportError::ParseFailed { file_id, .. }
            | ImportError::SheetWriteFailed { file_id, .. } => Some(file_id),
            _ => None,
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
