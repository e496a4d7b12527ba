// ==========================================
// CSV 导入工作簿 - 工作簿 Repository 实现
// ==========================================
// 职责: 以 SQLite 持久化工作表与单元格（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{open_in_memory_connection, open_sqlite_connection};
use crate::domain::SheetHandle;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sheet_repo::SheetRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SqliteSheetRepository
// ==========================================
pub struct SqliteSheetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSheetRepository {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在则创建并建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存工作簿
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = open_in_memory_connection()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共享同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_sheet(row: &rusqlite::Row<'_>) -> rusqlite::Result<SheetHandle> {
        Ok(SheetHandle {
            sheet_id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get::<_, DateTime<Utc>>(2)?,
        })
    }

    /// 在事务中写入单元格
    fn write_rows_tx(
        tx: &Transaction,
        sheet_id: i64,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT OR REPLACE INTO sheet_cell (sheet_id, row_no, col_no, value)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;

        for (offset, row) in rows.iter().enumerate() {
            let row_no = (start_row + offset) as i64;
            for (col_idx, value) in row.iter().enumerate() {
                stmt.execute(params![sheet_id, row_no, (col_idx + 1) as i64, value])?;
            }
        }

        Ok(rows.len())
    }
}

#[async_trait]
impl SheetRepository for SqliteSheetRepository {
    async fn create_sheet(&self, name: &str) -> RepositoryResult<SheetHandle> {
        let conn = self.lock()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO sheet (name, created_at) VALUES (?1, ?2)",
            params![name, created_at],
        )?;

        Ok(SheetHandle {
            sheet_id: conn.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        })
    }

    async fn write_rows(
        &self,
        sheet: &SheetHandle,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> RepositoryResult<usize> {
        if start_row == 0 {
            return Err(RepositoryError::FieldValueError {
                field: "start_row".to_string(),
                message: "行号从 1 开始".to_string(),
            });
        }

        let conn = self.lock()?;
        let exists: Option<i64> = conn
            .query_row(
                "SELECT sheet_id FROM sheet WHERE sheet_id = ?1",
                params![sheet.sheet_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "Sheet".to_string(),
                id: sheet.sheet_id.to_string(),
            });
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::write_rows_tx(&tx, sheet.sheet_id, start_row, rows)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn list_sheet_names(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM sheet ORDER BY sheet_id")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    async fn sheet_exists(&self, name: &str, case_insensitive: bool) -> RepositoryResult<bool> {
        let names = self.list_sheet_names().await?;

        // SQLite 的 NOCASE 只折叠 ASCII，这里统一在 Rust 侧比较
        let found = if case_insensitive {
            let lowercase_name = name.to_lowercase();
            names.iter().any(|n| n.to_lowercase() == lowercase_name)
        } else {
            names.iter().any(|n| n == name)
        };

        Ok(found)
    }

    async fn get_sheet_by_name(&self, name: &str) -> RepositoryResult<Option<SheetHandle>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT sheet_id, name, created_at FROM sheet ORDER BY sheet_id")?;
        let sheets = stmt
            .query_map([], Self::map_sheet)?
            .collect::<Result<Vec<_>, _>>()?;

        let lowercase_name = name.to_lowercase();
        Ok(sheets
            .into_iter()
            .find(|s| s.name.to_lowercase() == lowercase_name))
    }

    async fn get_sheet_by_id(&self, sheet_id: i64) -> RepositoryResult<Option<SheetHandle>> {
        let conn = self.lock()?;
        let sheet = conn
            .query_row(
                "SELECT sheet_id, name, created_at FROM sheet WHERE sheet_id = ?1",
                params![sheet_id],
                Self::map_sheet,
            )
            .optional()?;
        Ok(sheet)
    }

    async fn delete_sheet(&self, sheet: &SheetHandle) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM sheet WHERE sheet_id = ?1", params![sheet.sheet_id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Sheet".to_string(),
                id: sheet.sheet_id.to_string(),
            });
        }
        Ok(())
    }

    async fn read_rows(&self, sheet: &SheetHandle) -> RepositoryResult<Vec<Vec<String>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT row_no, col_no, value FROM sheet_cell WHERE sheet_id = ?1 ORDER BY row_no, col_no",
        )?;
        let cells = stmt
            .query_map(params![sheet.sheet_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_no, col_no, value) in cells {
            let row_idx = (row_no - 1) as usize;
            let col_idx = (col_no - 1) as usize;
            if rows.len() <= row_idx {
                rows.resize_with(row_idx + 1, Vec::new);
            }
            let row = &mut rows[row_idx];
            if row.len() <= col_idx {
                row.resize(col_idx + 1, String::new());
            }
            row[col_idx] = value;
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_list_sheets() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        repo.create_sheet("Class Schedule").await.unwrap();
        repo.create_sheet("Mastery Data").await.unwrap();

        let names = repo.list_sheet_names().await.unwrap();
        assert_eq!(names, vec!["Class Schedule", "Mastery Data"]);
        assert_eq!(repo.sheet_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_name_case_insensitive() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        repo.create_sheet("Sheet1").await.unwrap();

        let result = repo.create_sheet("SHEET1").await;
        assert!(matches!(
            result,
            Err(RepositoryError::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_sheet_exists_case_modes() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        repo.create_sheet("Sheet1").await.unwrap();

        assert!(repo.sheet_exists("sheet1", true).await.unwrap());
        assert!(!repo.sheet_exists("sheet1", false).await.unwrap());
        assert!(repo.sheet_exists("Sheet1", false).await.unwrap());
        assert!(!repo.sheet_exists("Sheet2", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_sheet_exists_folds_non_ascii() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        repo.create_sheet("Ärger").await.unwrap();

        assert!(repo.sheet_exists("ärger", true).await.unwrap());
        assert!(repo.sheet_exists("ÄRGER", true).await.unwrap());
        assert!(!repo.sheet_exists("ärger", false).await.unwrap());
        assert_eq!(
            repo.get_sheet_by_name("ärger").await.unwrap().unwrap().name,
            "Ärger"
        );

        // NOCASE 只折叠 ASCII：存储层不拦截，重名由解析器在建表前处理
        repo.create_sheet("ärger").await.unwrap();
        assert_eq!(repo.sheet_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_write_and_read_rows_preserve_order() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        let sheet = repo.create_sheet("data.csv").await.unwrap();

        let data = rows(&[&["name", "score"], &["ann", "90"], &["bob", "", "extra"]]);
        let written = repo.write_rows(&sheet, 1, &data).await.unwrap();

        assert_eq!(written, 3);
        assert_eq!(repo.read_rows(&sheet).await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_write_rows_rejects_row_zero() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        let sheet = repo.create_sheet("data.csv").await.unwrap();

        let result = repo.write_rows(&sheet, 0, &rows(&[&["a"]])).await;
        assert!(matches!(result, Err(RepositoryError::FieldValueError { .. })));
    }

    #[tokio::test]
    async fn test_delete_sheet_removes_cells() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        let sheet = repo.create_sheet("tmp").await.unwrap();
        repo.write_rows(&sheet, 1, &rows(&[&["x"]])).await.unwrap();

        repo.delete_sheet(&sheet).await.unwrap();

        assert!(repo.get_sheet_by_id(sheet.sheet_id).await.unwrap().is_none());
        assert!(repo.read_rows(&sheet).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete_sheet(&sheet).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_sheet_by_name_ignores_case() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        let created = repo.create_sheet("Report").await.unwrap();

        let found = repo.get_sheet_by_name("report").await.unwrap().unwrap();
        assert_eq!(found.sheet_id, created.sheet_id);
        assert_eq!(found.name, "Report");
    }

    #[tokio::test]
    async fn test_user_created_sheet_names_sorted() {
        let repo = SqliteSheetRepository::in_memory().unwrap();
        for name in ["Constants", "zeta.csv", "alpha.csv"] {
            repo.create_sheet(name).await.unwrap();
        }

        let names = repo
            .user_created_sheet_names(&["Constants".to_string()])
            .await
            .unwrap();
        assert_eq!(names, vec!["alpha.csv", "zeta.csv"]);
    }
}
