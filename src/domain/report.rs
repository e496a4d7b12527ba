// ==========================================
// CSV 导入工作簿 - 导入报告
// ==========================================
// 职责: 按分类分组的导入结果（一次批次生成一次，不可变）
// ==========================================

use crate::domain::file::FileDescriptor;
use crate::domain::types::ImportCategory;
use serde::{Deserialize, Serialize};

// ==========================================
// ReportGroup - 报告分组
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGroup {
    pub category: ImportCategory,
    pub files: Vec<FileDescriptor>,
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
// 四个分组始终存在（可能为空），顺序为 ImportCategory::ORDER
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    groups: Vec<ReportGroup>,
}

impl ImportReport {
    /// 由四个分组构造报告
    pub(crate) fn from_groups(
        imported: Vec<FileDescriptor>,
        renamed: Vec<FileDescriptor>,
        invalid_name: Vec<FileDescriptor>,
        invalid_type: Vec<FileDescriptor>,
    ) -> Self {
        let groups = ImportCategory::ORDER
            .iter()
            .zip([imported, renamed, invalid_name, invalid_type])
            .map(|(category, files)| ReportGroup {
                category: *category,
                files,
            })
            .collect();

        Self { groups }
    }

    /// 全部分组（含空分组）
    pub fn groups(&self) -> &[ReportGroup] {
        &self.groups
    }

    /// 非空分组（用于展示）
    pub fn non_empty_groups(&self) -> impl Iterator<Item = &ReportGroup> {
        self.groups.iter().filter(|g| !g.files.is_empty())
    }

    /// 指定分类的文件
    pub fn files(&self, category: ImportCategory) -> &[FileDescriptor] {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.files.as_slice())
            .unwrap_or(&[])
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            imported: self.files(ImportCategory::Imported).len(),
            renamed: self.files(ImportCategory::Renamed).len(),
            invalid_name: self.files(ImportCategory::InvalidName).len(),
            invalid_type: self.files(ImportCategory::InvalidType).len(),
        }
    }
}

// ==========================================
// ImportSummary - 汇总统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub renamed: usize,
    pub invalid_name: usize,
    pub invalid_type: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.imported + self.renamed + self.invalid_name + self.invalid_type
    }

    pub fn rejected(&self) -> usize {
        self.invalid_name + self.invalid_type
    }
}
