// ==========================================
// CSV 导入工作簿 - 工作簿 Repository Trait
// ==========================================
// 职责: 定义目标工作簿（工作表命名空间 + 单元格）的数据访问接口
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::SheetHandle;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// SheetRepository Trait
// ==========================================
// 用途: 导入执行器与重名解析器访问目标工作簿
// 实现者: SqliteSheetRepository
//
// 工作表名大小写不敏感：同一工作簿中不允许出现仅大小写不同的两个名称
#[async_trait]
pub trait SheetRepository: Send + Sync {
    /// 新建工作表
    ///
    /// # 返回
    /// - Ok(SheetHandle): 新工作表
    /// - Err(UniqueConstraintViolation): 名称已存在（大小写不敏感）
    async fn create_sheet(&self, name: &str) -> RepositoryResult<SheetHandle>;

    /// 从 start_row（1 起）开始逐行写入，列从 1 开始
    ///
    /// # 返回
    /// - Ok(usize): 写入的行数
    /// - Err: 数据库错误（整个写入回滚）
    async fn write_rows(
        &self,
        sheet: &SheetHandle,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> RepositoryResult<usize>;

    /// 按工作表顺序列出全部名称
    async fn list_sheet_names(&self) -> RepositoryResult<Vec<String>>;

    /// 判断名称是否存在
    ///
    /// # 参数
    /// - case_insensitive: 为 true 时按 Unicode 小写比较（含非 ASCII 字母）
    async fn sheet_exists(&self, name: &str, case_insensitive: bool) -> RepositoryResult<bool>;

    /// 按名称查找工作表（大小写不敏感）
    async fn get_sheet_by_name(&self, name: &str) -> RepositoryResult<Option<SheetHandle>>;

    /// 按 ID 查找工作表
    async fn get_sheet_by_id(&self, sheet_id: i64) -> RepositoryResult<Option<SheetHandle>>;

    /// 删除工作表及其全部单元格
    async fn delete_sheet(&self, sheet: &SheetHandle) -> RepositoryResult<()>;

    /// 读取工作表内容（行号连续，缺失行为空行）
    async fn read_rows(&self, sheet: &SheetHandle) -> RepositoryResult<Vec<Vec<String>>>;

    /// 当前工作表数量
    async fn sheet_count(&self) -> RepositoryResult<usize> {
        Ok(self.list_sheet_names().await?.len())
    }

    /// 用户创建的工作表名（排除保留名称），按名称排序
    async fn user_created_sheet_names(
        &self,
        reserved: &[String],
    ) -> RepositoryResult<Vec<String>> {
        let mut names: Vec<String> = self
            .list_sheet_names()
            .await?
            .into_iter()
            .filter(|name| !reserved.contains(name))
            .collect();
        names.sort();
        Ok(names)
    }
}
