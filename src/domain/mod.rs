// ==========================================
// CSV 导入工作簿 - 领域模型层
// ==========================================
// 职责: 定义文件描述符、批次、报告等领域类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod batch;
pub mod file;
pub mod report;
pub mod sheet;
pub mod types;

// 重导出核心类型
pub use batch::{ClassificationResult, ValidatedBatch};
pub use file::FileDescriptor;
pub use report::{ImportReport, ImportSummary, ReportGroup};
pub use sheet::SheetHandle;
pub use types::ImportCategory;
