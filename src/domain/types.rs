// ==========================================
// CSV 导入工作簿 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 导入结果分类 (Import Category)
// ==========================================
// 报告中分组顺序固定: Imported → Renamed → InvalidName → InvalidType
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportCategory {
    Imported,    // 按原名导入
    Renamed,     // 重名后改名导入
    InvalidName, // 文件名不符合规则
    InvalidType, // MIME 类型不符
}

impl ImportCategory {
    /// 报告中的固定分组顺序
    pub const ORDER: [ImportCategory; 4] = [
        ImportCategory::Imported,
        ImportCategory::Renamed,
        ImportCategory::InvalidName,
        ImportCategory::InvalidType,
    ];

    /// i18n 消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            ImportCategory::Imported => "report.imported",
            ImportCategory::Renamed => "report.renamed",
            ImportCategory::InvalidName => "report.invalid_name",
            ImportCategory::InvalidType => "report.invalid_type",
        }
    }

    /// 展示用 CSS 类
    pub fn css_class(&self) -> &'static str {
        match self {
            ImportCategory::Imported => "msg msg-success",
            ImportCategory::Renamed => "msg msg-warning",
            ImportCategory::InvalidName | ImportCategory::InvalidType => "msg msg-error",
        }
    }
}

impl fmt::Display for ImportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportCategory::Imported => write!(f, "IMPORTED"),
            ImportCategory::Renamed => write!(f, "RENAMED"),
            ImportCategory::InvalidName => write!(f, "INVALID_NAME"),
            ImportCategory::InvalidType => write!(f, "INVALID_TYPE"),
        }
    }
}
