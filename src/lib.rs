// ==========================================
// 设备维护管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 设备维护驾驶舱（工单/库存/设备台账/申请审批）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 指标计算、告警、布局与层级
pub mod engine;

// 导出层 - 表格与工单打印件
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与后台刷新
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    Criticality, MaintenanceRequestStatus, MaintenanceType, Priority, PurchaseRequestStatus,
    WorkOrderStatus,
};

// 领域实体
pub use domain::dashboard::{Alert, AlertKind, DashboardSnapshot, DashboardStats};

// 引擎
pub use engine::{AlertEngine, DashboardEngine, KpiEngine};

// API
pub use api::{DashboardApi, InventoryApi, RequestApi, WorkOrderApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备维护管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
