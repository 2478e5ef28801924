// ==========================================
// 设备维护管理系统 - 驾驶舱数据结构
// ==========================================
// 职责: 驾驶舱输入快照与输出指标（纯数据，无行为）
// 输出直接交给图表/展示层
// ==========================================

use crate::domain::equipment::Equipment;
use crate::domain::part::Part;
use crate::domain::types::{MaintenanceType, Priority, WorkOrderStatus};
use crate::domain::work_order::WorkOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DashboardSnapshot - 驾驶舱输入快照
// ==========================================
// 每次计算都基于完整快照重算，不保留跨次状态
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub work_orders: Vec<WorkOrder>, // 按创建时间倒序
    pub low_stock_parts: Vec<Part>,  // 已过滤为低库存
    pub equipments: Vec<Equipment>,
}

// ==========================================
// 月度可靠性指标（MTBF/MTTR 近似）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityPoint {
    pub month: String,
    pub reliability_hours: i64, // 近似 MTBF（小时，取整）
    pub mean_repair_hours: f64, // 近似 MTTR（小时，保留 1 位小数）
}

// ==========================================
// 月度成本（按维护类型）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPoint {
    pub month: String,
    pub preventive_cost: f64,
    pub corrective_cost: f64,
}

// ==========================================
// 告警
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Info,
    Success,
}

/// 展示层识别的图标键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertIcon {
    AlertTriangle,
    Activity,
    CheckCircle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub icon: AlertIcon,
}

// ==========================================
// 最近工单摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentWorkOrder {
    pub id: String,
    pub code: String,
    pub equipment: String,
    #[serde(rename = "type")]
    pub maintenance_type: MaintenanceType,
    pub status: WorkOrderStatus,
    pub priority: Priority,
}

// ==========================================
// DashboardStats - 驾驶舱完整输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    // ===== 计数 =====
    pub total_work_orders: usize,
    pub in_progress_count: usize,
    pub scheduled_count: usize,
    pub completed_today: usize,

    // ===== 可用率（%，2 位小数）=====
    pub availability: f64,

    // ===== 序列与告警 =====
    pub reliability_series: Vec<ReliabilityPoint>,
    pub cost_series: Vec<CostPoint>,
    pub recent_work_orders: Vec<RecentWorkOrder>,
    pub alerts: Vec<Alert>,

    pub generated_at: DateTime<Utc>,
}
