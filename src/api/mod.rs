// ==========================================
// CSV 导入工作簿 - API层
// ==========================================
// 职责: 面向宿主的导入入口与报告渲染
// ==========================================

pub mod error;
pub mod import_api;
pub mod report_view;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse, ImportFailureInfo};
pub use report_view::{escape_html, render_report_html};
