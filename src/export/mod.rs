// ==========================================
// 设备维护管理系统 - 导出适配层
// ==========================================
// 职责: 对已加载数据做纯格式化（表格 CSV / 分页工单文档）
// ==========================================

pub mod document;
pub mod error;
pub mod labels;
pub mod spreadsheet;

pub use document::{document_file_name, WorkOrderDocument, DEFAULT_PAGE_HEIGHT};
pub use error::{ExportError, ExportResult};
pub use spreadsheet::{export_file_name, work_orders_csv_string, write_work_orders_csv_file};
