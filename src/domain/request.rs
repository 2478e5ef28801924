// ==========================================
// 设备维护管理系统 - 申请领域模型
// ==========================================
// 维护申请: maintenance_requests 表（审批后生成纠正性工单）
// 采购申请: purchase_requests 表（看板流转）
// ==========================================

use crate::domain::types::{MaintenanceRequestStatus, Priority, PurchaseRequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// MaintenanceRequest - 维护申请
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: String,
    pub equipment_id: String,
    pub description: String,
    pub priority: Priority,
    pub status: MaintenanceRequestStatus,

    // ===== 申请 =====
    pub requested_by: Option<String>,
    pub requested_at: DateTime<Utc>,

    // ===== 审核 =====
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub work_order_id: Option<String>, // 审批通过后生成的工单

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// PurchaseRequest - 采购申请
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: String,
    pub request_number: String, // 申请编号（唯一，如 SC-2024-001）
    pub description: String,
    pub equipment_id: Option<String>,
    pub status: PurchaseRequestStatus,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
