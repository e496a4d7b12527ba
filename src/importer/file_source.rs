// ==========================================
// CSV 导入工作簿 - 本地云盘文件源
// ==========================================
// 职责: 按文件 ID 从同步到本地的云盘目录读取内容
// 约束: ID 只能是根目录下的相对路径，不允许越出根目录
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_importer_trait::FileSource;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

pub struct LocalDriveSource {
    root: PathBuf,
}

impl LocalDriveSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 将文件 ID 解析为根目录下的路径
    fn resolve(&self, file_id: &str) -> ImportResult<PathBuf> {
        let relative = Path::new(file_id);
        let is_safe = !file_id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_safe {
            return Err(ImportError::FetchFailed {
                file_id: file_id.to_string(),
                message: "非法文件 ID".to_string(),
            });
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileSource for LocalDriveSource {
    async fn fetch_content(&self, file_id: &str) -> ImportResult<Vec<u8>> {
        let path = self.resolve(file_id)?;

        tokio::fs::read(&path)
            .await
            .map_err(|e| ImportError::FetchFailed {
                file_id: file_id.to_string(),
                message: format!("{}: {}", path.display(), e),
            })
    }
}
