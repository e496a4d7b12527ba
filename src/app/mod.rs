// ==========================================
// CSV 导入工作簿 - 应用层
// ==========================================
// 职责: 宿主集成,连接事件入口与导入API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, get_default_drive_root, AppState};
