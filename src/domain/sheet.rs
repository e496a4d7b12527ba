// ==========================================
// CSV 导入工作簿 - 工作表句柄
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// SheetHandle - 目标工作簿中的工作表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetHandle {
    pub sheet_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
