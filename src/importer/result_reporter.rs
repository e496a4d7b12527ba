// ==========================================
// CSV 导入工作簿 - 结果汇总
// ==========================================
// 职责: 已校验批次 → 按分类分组的导入报告（纯函数）
// 分组顺序固定: 导入成功 / 重命名 / 文件名无效 / 类型无效
// ==========================================

use crate::domain::{ImportReport, ValidatedBatch};

/// 生成导入报告
///
/// Imported 分组只包含按原名导入的文件，改名文件单独列入 Renamed
pub fn build_report(batch: &ValidatedBatch) -> ImportReport {
    ImportReport::from_groups(
        batch.imported_as_named().cloned().collect(),
        batch.renamed.clone(),
        batch.invalid_name.clone(),
        batch.invalid_type.clone(),
    )
}
