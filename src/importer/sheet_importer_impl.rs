// ==========================================
// CSV 导入工作簿 - 导入执行器实现
// ==========================================
// 职责: 逐个导入已分类的有效文件，生成已校验批次
// 流程: 重名解析 → 获取内容 → 解析 → 新建工作表 → 写入
// 约束:
// - 严格按输入顺序串行执行（后一个文件的重名解析依赖前一个的结果）
// - 首个失败即中止，已导入的工作表保留
// ==========================================

use crate::domain::{ClassificationResult, FileDescriptor, SheetHandle, ValidatedBatch};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::CsvParser;
use crate::importer::name_resolver::NameCollisionResolver;
use crate::importer::sheet_importer_trait::{
    BatchImportOutcome, FileSource, ImportFailure, SheetImporter, TabularParser,
};
use crate::repository::SheetRepository;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 数据写入起始行（1 起始）
const FIRST_DATA_ROW: usize = 1;

// ==========================================
// SheetImporterImpl - 导入执行器
// ==========================================
pub struct SheetImporterImpl<R, S>
where
    R: SheetRepository + ?Sized,
    S: FileSource + ?Sized,
{
    // 工作簿（命名空间 + 写入目标）
    sheet_repo: Arc<R>,

    // 文件内容来源
    source: Arc<S>,

    // 内容解析器
    parser: Box<dyn TabularParser>,

    resolver: NameCollisionResolver,
}

impl<R, S> SheetImporterImpl<R, S>
where
    R: SheetRepository + ?Sized,
    S: FileSource + ?Sized,
{
    /// 创建执行器（默认 CSV 解析器）
    pub fn new(sheet_repo: Arc<R>, source: Arc<S>) -> Self {
        Self::with_parser(sheet_repo, source, Box::new(CsvParser::new()))
    }

    pub fn with_parser(sheet_repo: Arc<R>, source: Arc<S>, parser: Box<dyn TabularParser>) -> Self {
        Self {
            sheet_repo,
            source,
            parser,
            resolver: NameCollisionResolver,
        }
    }

    /// 为文件确定最终工作表名；仅在需要改名时写回 sheet_name
    async fn assign_sheet_name(&self, mut file: FileDescriptor) -> ImportResult<FileDescriptor> {
        let sheet_name = self
            .resolver
            .resolve_unique_name(self.sheet_repo.as_ref(), &file.name)
            .await?;
        if sheet_name != file.name {
            file.sheet_name = Some(sheet_name);
        }
        Ok(file)
    }

    async fn fetch_rows(&self, file: &FileDescriptor) -> ImportResult<Vec<Vec<String>>> {
        let bytes = self.source.fetch_content(&file.id).await.map_err(|e| match e {
            e @ ImportError::FetchFailed { .. } => e,
            other => ImportError::FetchFailed {
                file_id: file.id.clone(),
                message: other.to_string(),
            },
        })?;
        debug!(file_id = %file.id, bytes = bytes.len(), "文件内容获取完成");

        self.parser
            .parse(&bytes)
            .map_err(|e| ImportError::ParseFailed {
                file_id: file.id.clone(),
                message: e.to_string(),
            })
    }

    /// 写入失败时删除已创建的工作表，避免留下半成品
    async fn discard_sheet(&self, sheet: &SheetHandle) {
        if let Err(e) = self.sheet_repo.delete_sheet(sheet).await {
            warn!(sheet = %sheet.name, error = %e, "清理未写完的工作表失败");
        }
    }
}

#[async_trait]
impl<R, S> SheetImporter for SheetImporterImpl<R, S>
where
    R: SheetRepository + ?Sized,
    S: FileSource + ?Sized,
{
    #[instrument(skip(self, classified), fields(valid = classified.valid.len()))]
    async fn import_batch(&self, classified: ClassificationResult) -> BatchImportOutcome {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(
            batch_id = %batch_id,
            valid = classified.valid.len(),
            invalid_type = classified.invalid_type.len(),
            invalid_name = classified.invalid_name.len(),
            "开始批次导入"
        );

        let mut batch = ValidatedBatch::from_rejected(&classified);
        let mut pending = classified.valid.into_iter();

        while let Some(file) = pending.next() {
            let file_id = file.id.clone();

            let result = match self.assign_sheet_name(file.clone()).await {
                Ok(named) => self.import_file(&named).await.map(|_| named),
                Err(e) => Err(e),
            };

            match result {
                Ok(imported) => {
                    if imported.is_renamed() {
                        info!(
                            file_id = %imported.id,
                            sheet = imported.target_sheet_name(),
                            "文件已重命名导入"
                        );
                    }
                    batch.record_imported(imported);
                }
                Err(e) => {
                    error!(batch_id = %batch_id, file_id = %file_id, error = %e, "文件导入失败，中止批次");
                    let mut unprocessed = vec![file];
                    unprocessed.extend(pending);
                    return BatchImportOutcome {
                        batch,
                        failure: Some(ImportFailure {
                            file_id,
                            error: e,
                            unprocessed,
                        }),
                    };
                }
            }
        }

        info!(
            batch_id = %batch_id,
            imported = batch.valid.len(),
            renamed = batch.renamed.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "批次导入完成"
        );

        BatchImportOutcome {
            batch,
            failure: None,
        }
    }

    #[instrument(skip(self, file), fields(file_id = %file.id, sheet = file.target_sheet_name()))]
    async fn import_file(&self, file: &FileDescriptor) -> ImportResult<SheetHandle> {
        let rows = self.fetch_rows(file).await?;
        let sheet_name = file.target_sheet_name();

        let sheet = self
            .sheet_repo
            .create_sheet(sheet_name)
            .await
            .map_err(|e| ImportError::SheetWriteFailed {
                file_id: file.id.clone(),
                sheet_name: sheet_name.to_string(),
                message: e.to_string(),
            })?;

        if !rows.is_empty() {
            if let Err(e) = self.sheet_repo.write_rows(&sheet, FIRST_DATA_ROW, &rows).await {
                self.discard_sheet(&sheet).await;
                return Err(ImportError::SheetWriteFailed {
                    file_id: file.id.clone(),
                    sheet_name: sheet_name.to_string(),
                    message: e.to_string(),
                });
            }
        }

        debug!(rows = rows.len(), "工作表写入完成");
        Ok(sheet)
    }
}
