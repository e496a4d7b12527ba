// ==========================================
// CSV 导入工作簿 - 导入配置值对象
// ==========================================
// 职责: 单次运行的不可变配置（分类前解析一次，显式传入各组件）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 默认有效 MIME 类型
pub const DEFAULT_MIME_TYPE: &str = "text/csv";

/// 默认文件名规则：任意非空文件名
pub const DEFAULT_FILENAME_PATTERN: &str = "^(.+)$";

// ==========================================
// ImportConfig - 导入配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 文件名校验正则（必须含捕获组 1）
    pub valid_filename_pattern: String,

    /// 允许导入的 MIME 类型
    pub expected_mime_type: String,

    /// 工作簿自带的保留工作表（不计入用户创建的工作表）
    pub reserved_sheet_names: Vec<String>,

    /// 调试用工作簿 ID（非空时宿主应打开该工作簿而非当前工作簿）
    pub debug_workbook_id: Option<String>,
}

impl ImportConfig {
    pub fn new(valid_filename_pattern: impl Into<String>) -> Self {
        Self {
            valid_filename_pattern: valid_filename_pattern.into(),
            expected_mime_type: DEFAULT_MIME_TYPE.to_string(),
            reserved_sheet_names: Vec::new(),
            debug_workbook_id: None,
        }
    }

    /// 编译文件名规则
    ///
    /// # 返回
    /// - Ok(Regex): 编译成功且含捕获组
    /// - Err(InvalidFilenamePattern): 正则非法 / 为空 / 无捕获组
    pub fn compile_filename_rule(&self) -> ImportResult<Regex> {
        let pattern = self.valid_filename_pattern.as_str();
        if pattern.trim().is_empty() {
            return Err(ImportError::InvalidFilenamePattern {
                pattern: pattern.to_string(),
                message: "规则为空".to_string(),
            });
        }

        let regex = Regex::new(pattern).map_err(|e| ImportError::InvalidFilenamePattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        // captures_len 包含隐式的整体匹配组 0
        if regex.captures_len() < 2 {
            return Err(ImportError::InvalidFilenamePattern {
                pattern: pattern.to_string(),
                message: "规则必须包含至少一个捕获组".to_string(),
            });
        }

        Ok(regex)
    }

    /// 校验配置整体有效性
    pub fn validate(&self) -> ImportResult<()> {
        self.compile_filename_rule()?;
        if self.expected_mime_type.trim().is_empty() {
            return Err(ImportError::ConfigValueError {
                key: "expected_mime_type".to_string(),
                value: self.expected_mime_type.clone(),
                message: "MIME 类型不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 是否使用调试工作簿
    pub fn uses_debug_workbook(&self) -> bool {
        self.debug_workbook_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FILENAME_PATTERN)
    }
}
