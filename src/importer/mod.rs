// ==========================================
// CSV 导入工作簿 - 导入层
// ==========================================
// 职责: 文件分类 → 重名解析 → 逐个导入 → 结果汇总
// 支持: CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_classifier;
pub mod file_parser;
pub mod file_source;
pub mod name_resolver;
pub mod result_reporter;
pub mod sheet_importer_impl;
pub mod sheet_importer_trait;

// 重导出核心类型
pub use error::{ErrorCategory, ImportError, ImportResult};
pub use file_classifier::FileClassifier;
pub use file_parser::CsvParser;
pub use file_source::LocalDriveSource;
pub use name_resolver::NameCollisionResolver;
pub use result_reporter::build_report;
pub use sheet_importer_impl::SheetImporterImpl;

// 重导出 Trait 接口
pub use sheet_importer_trait::{
    BatchImportOutcome, FileSource, ImportFailure, SheetImporter, TabularParser,
};
