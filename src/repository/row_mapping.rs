// ==========================================
// 设备维护管理系统 - 行映射辅助
// ==========================================
// 枚举列按数据库取值解析，无法识别的取值视为列转换失败
// ==========================================

use crate::domain::types::{
    MaintenanceRequestStatus, MaintenanceType, Priority, PurchaseRequestStatus, WorkOrderStatus,
};
use rusqlite::types::Type;
use rusqlite::Row;

fn invalid_value(idx: usize, kind: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("无法识别的{}: {}", kind, value).into(),
    )
}

pub(crate) fn maintenance_type_at(row: &Row, idx: usize) -> rusqlite::Result<MaintenanceType> {
    let raw: String = row.get(idx)?;
    MaintenanceType::from_db_str(&raw).ok_or_else(|| invalid_value(idx, "维护类型", &raw))
}

pub(crate) fn work_order_status_at(row: &Row, idx: usize) -> rusqlite::Result<WorkOrderStatus> {
    let raw: String = row.get(idx)?;
    WorkOrderStatus::from_db_str(&raw).ok_or_else(|| invalid_value(idx, "工单状态", &raw))
}

pub(crate) fn priority_at(row: &Row, idx: usize) -> rusqlite::Result<Priority> {
    let raw: String = row.get(idx)?;
    Priority::from_db_str(&raw).ok_or_else(|| invalid_value(idx, "优先级", &raw))
}

pub(crate) fn request_status_at(row: &Row, idx: usize) -> rusqlite::Result<MaintenanceRequestStatus> {
    let raw: String = row.get(idx)?;
    MaintenanceRequestStatus::from_db_str(&raw).ok_or_else(|| invalid_value(idx, "申请状态", &raw))
}

pub(crate) fn purchase_status_at(row: &Row, idx: usize) -> rusqlite::Result<PurchaseRequestStatus> {
    let raw: String = row.get(idx)?;
    PurchaseRequestStatus::from_db_str(&raw).ok_or_else(|| invalid_value(idx, "采购状态", &raw))
}
