// ==========================================
// CSV 导入工作簿 - 重名解析器
// ==========================================
// 职责: 为候选工作表名生成工作簿内唯一的名称
// 规则:
// - 命名空间比较大小写不敏感
// - 名称不存在 → 原样返回
// - 名称存在 → 依次尝试 "{base} (2)", "{base} (3)", ...
// - 每次尝试都重新查询工作簿（批次内可能刚创建了新工作表）
// - 尝试次数超过 工作表数量 + 1 视为命名空间不一致，返回 InvariantViolation
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::repository::SheetRepository;

/// 重名后缀起始值
const FIRST_SUFFIX: usize = 2;

pub struct NameCollisionResolver;

impl NameCollisionResolver {
    /// 名称是否与现有工作表冲突
    pub async fn has_collision<R>(&self, namespace: &R, name: &str) -> ImportResult<bool>
    where
        R: SheetRepository + ?Sized,
    {
        Ok(namespace.sheet_exists(name, true).await?)
    }

    /// 生成唯一工作表名
    pub async fn resolve_unique_name<R>(&self, namespace: &R, base_name: &str) -> ImportResult<String>
    where
        R: SheetRepository + ?Sized,
    {
        if !self.has_collision(namespace, base_name).await? {
            return Ok(base_name.to_string());
        }

        let ceiling = namespace.sheet_count().await? + 1;
        let mut attempts = 0;
        let mut suffix = FIRST_SUFFIX;

        loop {
            attempts += 1;
            if attempts > ceiling {
                tracing::error!(base_name, ceiling, "重名解析超出安全上限");
                return Err(ImportError::InvariantViolation {
                    base_name: base_name.to_string(),
                    ceiling,
                });
            }

            let candidate = format!("{} ({})", base_name, suffix);
            if !self.has_collision(namespace, &candidate).await? {
                tracing::debug!(base_name, candidate = %candidate, attempts, "生成唯一工作表名");
                return Ok(candidate);
            }
            suffix += 1;
        }
    }
}
