// ==========================================
// 设备维护管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行与后台刷新任务调用
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod equipment_api;
pub mod error;
pub mod inventory_api;
pub mod maintainer_api;
pub mod request_api;
pub mod work_order_api;

// 重导出核心类型
pub use config_api::{ConfigApi, ConfigItem};
pub use dashboard_api::DashboardApi;
pub use equipment_api::{EquipmentApi, EquipmentRequest};
pub use error::{ApiError, ApiResult};
pub use inventory_api::{InventoryApi, PartRequest, PartView};
pub use maintainer_api::{MaintainerApi, MaintainerRequest};
pub use request_api::{
    ApprovalOutcome, CreatePurchaseRequest, KanbanColumn, RequestApi, SubmitMaintenanceRequest,
};
pub use work_order_api::{
    CreateWorkOrderRequest, PartUsageRequest, UpdateWorkOrderRequest, WorkOrderApi,
};
