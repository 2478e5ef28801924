// ==========================================
// 设备维护管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod dashboard;
pub mod equipment;
pub mod maintainer;
pub mod part;
pub mod request;
pub mod types;
pub mod work_order;

// 重导出核心类型
pub use dashboard::{
    Alert, AlertIcon, AlertKind, CostPoint, DashboardSnapshot, DashboardStats, RecentWorkOrder,
    ReliabilityPoint,
};
pub use equipment::{CardLayout, Equipment};
pub use maintainer::Maintainer;
pub use part::{Part, StockStatus};
pub use request::{MaintenanceRequest, PurchaseRequest};
pub use types::{
    Criticality, MaintenanceRequestStatus, MaintenanceType, Priority, PurchaseRequestStatus,
    WorkOrderStatus,
};
pub use work_order::{EquipmentRef, WorkOrder, WorkOrderDetail, WorkOrderPartUsage};
