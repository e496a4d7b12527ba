// ==========================================
// CSV 导入工作簿 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 将用户选择的 CSV 文件逐个导入为工作簿中的工作表，
//           并按导入/重命名/无效分组汇报结果
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 文件描述符、批次与报告
pub mod domain;

// 数据仓储层 - 工作簿存储
pub mod repository;

// 导入层 - 分类、重名解析、导入执行、结果汇总
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 宿主入口
pub mod api;

// 应用层 - 宿主集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ClassificationResult, FileDescriptor, ImportCategory, ImportReport, ImportSummary,
    SheetHandle, ValidatedBatch,
};

// 导入组件
pub use importer::{
    build_report, FileClassifier, NameCollisionResolver, SheetImporter, SheetImporterImpl,
};

// API
pub use api::{render_report_html, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CSV 导入工作簿";
