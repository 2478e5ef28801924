// ==========================================
// 设备维护管理系统 - 工单领域模型
// ==========================================
// 对齐: work_orders / work_order_maintainers / work_order_parts 表
// ==========================================

use crate::domain::maintainer::Maintainer;
use crate::domain::types::{MaintenanceType, Priority, WorkOrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// WorkOrder - 维护工单
// ==========================================
// 不变量（由 API 层在写入时保证，引擎只读时宽容处理）:
// completed_at >= started_at >= scheduled_date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    // ===== 主键与编号 =====
    pub id: String,   // UUID
    pub code: String, // 工单号（OS-{毫秒时间戳}）

    // ===== 关联 =====
    pub equipment_id: String,

    // ===== 分类 =====
    #[serde(rename = "type")]
    pub maintenance_type: MaintenanceType,
    pub status: WorkOrderStatus,
    pub priority: Priority,

    // ===== 时间信息 =====
    pub scheduled_date: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    // ===== 业务字段 =====
    pub machine_down: bool, // 设备停机
    pub description: Option<String>,

    // ===== 审计字段 =====
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkOrder {
    /// 维修时长（小时），缺少开始或完成时间时返回 None
    ///
    /// 时间倒置时返回负值，由调用方决定如何处理
    pub fn repair_hours(&self) -> Option<f64> {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => {
                Some((completed - started).num_milliseconds() as f64 / 3_600_000.0)
            }
            _ => None,
        }
    }
}

// ==========================================
// WorkOrderPartUsage - 工单用料
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderPartUsage {
    pub part_id: String,
    pub code: String,
    pub name: String,
    pub quantity_used: i32,
}

// ==========================================
// EquipmentRef - 工单关联设备摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRef {
    pub id: String,
    pub code: String,
    pub name: String,
}

// ==========================================
// WorkOrderDetail - 工单详情（导出/打印用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderDetail {
    pub work_order: WorkOrder,
    pub equipment: Option<EquipmentRef>,
    pub maintainers: Vec<Maintainer>,
    pub parts: Vec<WorkOrderPartUsage>,
}
