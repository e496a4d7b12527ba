// ==========================================
// CSV 导入工作簿 - 文件分类器
// ==========================================
// 职责: 按 MIME 类型与文件名规则将一批文件划分为 valid / invalidType / invalidName
// 规则:
// - 阶段 1: mime_type == expected_mime_type，否则 invalidType
// - 阶段 2: 仅对类型有效的文件做文件名匹配，需命中捕获组 1，否则 invalidName
// 无副作用，结果只取决于输入与配置
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{ClassificationResult, FileDescriptor};
use crate::importer::error::ImportResult;
use regex::Regex;

pub struct FileClassifier {
    expected_mime_type: String,
    name_rule: Regex,
}

impl FileClassifier {
    /// 由 MIME 类型与已编译规则创建
    pub fn new(expected_mime_type: impl Into<String>, name_rule: Regex) -> Self {
        Self {
            expected_mime_type: expected_mime_type.into(),
            name_rule,
        }
    }

    /// 由运行配置创建
    ///
    /// # 返回
    /// - Err(InvalidFilenamePattern): 规则非法（配置错误，任何文件都不处理）
    pub fn from_config(config: &ImportConfig) -> ImportResult<Self> {
        let name_rule = config.compile_filename_rule()?;
        Ok(Self::new(config.expected_mime_type.clone(), name_rule))
    }

    /// 划分文件（保持输入顺序）
    pub fn classify(&self, files: Vec<FileDescriptor>) -> ClassificationResult {
        let (type_valid, invalid_type): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|file| self.has_valid_type(file));

        let (valid, invalid_name): (Vec<_>, Vec<_>) = type_valid
            .into_iter()
            .partition(|file| self.has_valid_name(file));

        tracing::debug!(
            valid = valid.len(),
            invalid_type = invalid_type.len(),
            invalid_name = invalid_name.len(),
            "文件分类完成"
        );

        ClassificationResult {
            valid,
            invalid_type,
            invalid_name,
        }
    }

    fn has_valid_type(&self, file: &FileDescriptor) -> bool {
        !file.mime_type.is_empty() && file.mime_type == self.expected_mime_type
    }

    fn has_valid_name(&self, file: &FileDescriptor) -> bool {
        if file.name.is_empty() {
            return false;
        }
        self.name_rule
            .captures(&file.name)
            .and_then(|caps| caps.get(1))
            .is_some()
    }
}
