// ==========================================
// CSV 导入工作簿 - 批次数据结构
// ==========================================
// 职责: 分类结果与导入过程中逐步构建的批次状态
// ==========================================

use crate::domain::file::FileDescriptor;
use serde::{Deserialize, Serialize};

// ==========================================
// ClassificationResult - 分类结果
// ==========================================
// 不变量: 每个输入描述符恰好出现在三个序列之一，且保持输入顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub valid: Vec<FileDescriptor>,
    pub invalid_type: Vec<FileDescriptor>,
    pub invalid_name: Vec<FileDescriptor>,
}

impl ClassificationResult {
    /// 分类覆盖的文件总数
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid_type.len() + self.invalid_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// ==========================================
// ValidatedBatch - 已校验批次
// ==========================================
// valid: 已成功导入的文件（按处理顺序追加）
// renamed: valid 的子集，sheet_name 与 name 不同
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedBatch {
    pub valid: Vec<FileDescriptor>,
    pub invalid_name: Vec<FileDescriptor>,
    pub invalid_type: Vec<FileDescriptor>,
    pub renamed: Vec<FileDescriptor>,
}

impl ValidatedBatch {
    /// 以分类结果的无效文件初始化，valid/renamed 留空等待导入阶段填充
    pub fn from_rejected(classified: &ClassificationResult) -> Self {
        Self {
            valid: Vec::new(),
            invalid_name: classified.invalid_name.clone(),
            invalid_type: classified.invalid_type.clone(),
            renamed: Vec::new(),
        }
    }

    /// 记录一个已导入文件；改名文件同时进入 renamed
    pub fn record_imported(&mut self, file: FileDescriptor) {
        if file.is_renamed() {
            self.renamed.push(file.clone());
        }
        self.valid.push(file);
    }

    /// 按原名导入的文件（valid 去掉 renamed）
    pub fn imported_as_named(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.valid.iter().filter(|f| !f.is_renamed())
    }
}
