// ==========================================
// 设备维护管理系统 - 应用层
// ==========================================
// 职责: 装配共享状态，运行后台刷新任务
// ==========================================

pub mod refresh_worker;
pub mod state;

// 重导出
pub use refresh_worker::spawn_refresh_worker;
pub use state::{get_default_db_path, AppState};
