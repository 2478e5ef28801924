// ==========================================
// 设备维护管理系统 - 引擎层
// ==========================================
// 职责: 纯计算规则（聚合、告警、汇总、布局、层级），不拼 SQL
// 红线: Engine 不读时钟、不做 I/O；评估时刻由调用方传入
// ==========================================

pub mod alerts;
pub mod events;
pub mod hierarchy;
pub mod kpi;
pub mod layout;
pub mod summary;

// 重导出核心引擎
pub use alerts::AlertEngine;
pub use events::{
    ChangeEvent, ChangeEventPublisher, ChangeKind, ChannelEventPublisher, DeferredChannelPublisher,
    NoOpEventPublisher, OptionalEventPublisher, WatchedTable,
};
pub use hierarchy::{build_equipment_tree, would_create_cycle, EquipmentNode};
pub use kpi::{round_half_up, KpiEngine, MONTH_LABELS};
pub use layout::{CardGeometry, ResizeDirection};
pub use summary::DashboardEngine;
