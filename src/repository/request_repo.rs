// ==========================================
// 设备维护管理系统 - 维护申请与采购申请仓储
// ==========================================
// 表: maintenance_requests / purchase_requests
// ==========================================

use crate::domain::request::{MaintenanceRequest, PurchaseRequest};
use crate::domain::types::{MaintenanceRequestStatus, PurchaseRequestStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{priority_at, purchase_status_at, request_status_at};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const MAINTENANCE_REQUEST_COLUMNS: &str = r#"
    id, equipment_id, description, priority, status,
    requested_by, requested_at, reviewed_by, reviewed_at,
    rejection_reason, work_order_id, created_at, updated_at
"#;

const PURCHASE_REQUEST_COLUMNS: &str =
    "id, request_number, description, equipment_id, status, created_by, created_at, updated_at";

fn map_maintenance_request_row(row: &Row) -> SqliteResult<MaintenanceRequest> {
    Ok(MaintenanceRequest {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        description: row.get(2)?,
        priority: priority_at(row, 3)?,
        status: request_status_at(row, 4)?,
        requested_by: row.get(5)?,
        requested_at: row.get(6)?,
        reviewed_by: row.get(7)?,
        reviewed_at: row.get(8)?,
        rejection_reason: row.get(9)?,
        work_order_id: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn map_purchase_request_row(row: &Row) -> SqliteResult<PurchaseRequest> {
    Ok(PurchaseRequest {
        id: row.get(0)?,
        request_number: row.get(1)?,
        description: row.get(2)?,
        equipment_id: row.get(3)?,
        status: purchase_status_at(row, 4)?,
        created_by: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// ==========================================
// MaintenanceRequestRepository - 维护申请仓储
// ==========================================
pub struct MaintenanceRequestRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceRequestRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, request: &MaintenanceRequest) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO maintenance_requests (
                id, equipment_id, description, priority, status,
                requested_by, requested_at, reviewed_by, reviewed_at,
                rejection_reason, work_order_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                request.id,
                request.equipment_id,
                request.description,
                request.priority.as_db_str(),
                request.status.as_db_str(),
                request.requested_by,
                request.requested_at,
                request.reviewed_by,
                request.reviewed_at,
                request.rejection_reason,
                request.work_order_id,
                request.created_at,
                request.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 写入审核结果
    ///
    /// 仅当当前状态为待审核时生效，返回是否写入
    pub fn record_review(
        &self,
        id: &str,
        status: MaintenanceRequestStatus,
        reviewed_by: Option<&str>,
        reviewed_at: DateTime<Utc>,
        rejection_reason: Option<&str>,
        work_order_id: Option<&str>,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE maintenance_requests SET
                status = ?2, reviewed_by = ?3, reviewed_at = ?4,
                rejection_reason = ?5, work_order_id = ?6, updated_at = ?4
            WHERE id = ?1 AND status = ?7
            "#,
            params![
                id,
                status.as_db_str(),
                reviewed_by,
                reviewed_at,
                rejection_reason,
                work_order_id,
                MaintenanceRequestStatus::Pending.as_db_str(),
            ],
        )?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<MaintenanceRequest>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_requests WHERE id = ?1",
            MAINTENANCE_REQUEST_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id], map_maintenance_request_row)
            .optional()?)
    }

    /// 按状态列出（按申请时间倒序）
    pub fn list_by_status(
        &self,
        status: MaintenanceRequestStatus,
    ) -> RepositoryResult<Vec<MaintenanceRequest>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_requests WHERE status = ?1 ORDER BY requested_at DESC",
            MAINTENANCE_REQUEST_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let requests = stmt
            .query_map(params![status.as_db_str()], map_maintenance_request_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(requests)
    }
}

// ==========================================
// PurchaseRequestRepository - 采购申请仓储
// ==========================================
pub struct PurchaseRequestRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PurchaseRequestRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, request: &PurchaseRequest) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO purchase_requests (
                id, request_number, description, equipment_id, status, created_by, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                request.id,
                request.request_number,
                request.description,
                request.equipment_id,
                request.status.as_db_str(),
                request.created_by,
                request.created_at,
                request.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update_status(
        &self,
        id: &str,
        status: PurchaseRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE purchase_requests SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status.as_db_str(), updated_at],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("PurchaseRequest", id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<PurchaseRequest>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM purchase_requests WHERE id = ?1",
            PURCHASE_REQUEST_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id], map_purchase_request_row)
            .optional()?)
    }

    pub fn exists_by_number(&self, request_number: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT 1 FROM purchase_requests WHERE request_number = ?1")?;
        Ok(stmt.exists(params![request_number])?)
    }

    /// 按状态列出（按创建时间倒序）
    pub fn list_by_status(&self, status: PurchaseRequestStatus) -> RepositoryResult<Vec<PurchaseRequest>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM purchase_requests WHERE status = ?1 ORDER BY created_at DESC",
            PURCHASE_REQUEST_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let requests = stmt
            .query_map(params![status.as_db_str()], map_purchase_request_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(requests)
    }
}
