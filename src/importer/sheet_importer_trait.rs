// ==========================================
// CSV 导入工作簿 - 导入接口 Trait
// ==========================================
// 职责: 定义导入流程各组件接口（不包含实现）
// ==========================================

use crate::domain::{ClassificationResult, FileDescriptor, SheetHandle, ValidatedBatch};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;

// ==========================================
// SheetImporter Trait
// ==========================================
// 用途: 导入执行器主接口
// 实现者: SheetImporterImpl
#[async_trait]
pub trait SheetImporter: Send + Sync {
    /// 按输入顺序逐个导入 valid 文件
    ///
    /// # 导入流程（每个文件）
    /// 1. 检查重名（大小写不敏感），必要时生成唯一名称
    /// 2. 获取文件内容
    /// 3. 解析为行
    /// 4. 新建工作表并自第 1 行写入
    ///
    /// # 返回
    /// - BatchImportOutcome: 已处理文件构成的批次 + 可选的中止原因
    ///   首个失败即中止（不重试），之前的结果保留
    async fn import_batch(&self, classified: ClassificationResult) -> BatchImportOutcome;

    /// 导入单个文件到 file.target_sheet_name()
    async fn import_file(&self, file: &FileDescriptor) -> ImportResult<SheetHandle>;
}

// ==========================================
// FileSource Trait
// ==========================================
// 用途: 云盘/本地文件内容获取
// 实现者: LocalDriveSource
#[async_trait]
pub trait FileSource: Send + Sync {
    /// 获取文件原始字节
    ///
    /// # 返回
    /// - Err(FetchFailed): 文件不存在或读取失败
    async fn fetch_content(&self, file_id: &str) -> ImportResult<Vec<u8>>;
}

// ==========================================
// TabularParser Trait
// ==========================================
// 用途: 文件内容 → 行（字符串单元格，保持顺序）
// 实现者: CsvParser
pub trait TabularParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>>;
}

// ==========================================
// BatchImportOutcome - 批次导入结果
// ==========================================
#[derive(Debug)]
pub struct BatchImportOutcome {
    /// 已成功导入的文件 + 透传的无效文件
    pub batch: ValidatedBatch,

    /// 中止原因（None 表示整个批次完成）
    pub failure: Option<ImportFailure>,
}

impl BatchImportOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

// ==========================================
// ImportFailure - 批次中止信息
// ==========================================
#[derive(Debug)]
pub struct ImportFailure {
    /// 失败文件 ID
    pub file_id: String,

    /// 失败原因
    pub error: ImportError,

    /// 未尝试导入的文件（含失败文件本身）
    pub unprocessed: Vec<FileDescriptor>,
}
