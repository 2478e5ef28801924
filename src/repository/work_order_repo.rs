// ==========================================
// 设备维护管理系统 - 工单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（状态迁移校验在 API 层）
// 表: work_orders / work_order_maintainers / work_order_parts
// ==========================================

use crate::domain::maintainer::Maintainer;
use crate::domain::types::WorkOrderStatus;
use crate::domain::work_order::{EquipmentRef, WorkOrder, WorkOrderDetail, WorkOrderPartUsage};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::maintainer_repo::map_maintainer_row;
use crate::repository::row_mapping::{maintenance_type_at, priority_at, work_order_status_at};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const WORK_ORDER_COLUMNS: &str = r#"
    id, code, equipment_id, type, status, priority,
    scheduled_date, started_at, completed_at,
    machine_down, description, created_by, created_at, updated_at
"#;

fn map_work_order_row(row: &Row) -> SqliteResult<WorkOrder> {
    Ok(WorkOrder {
        id: row.get(0)?,
        code: row.get(1)?,
        equipment_id: row.get(2)?,
        maintenance_type: maintenance_type_at(row, 3)?,
        status: work_order_status_at(row, 4)?,
        priority: priority_at(row, 5)?,
        scheduled_date: row.get(6)?,
        started_at: row.get(7)?,
        completed_at: row.get(8)?,
        machine_down: row.get(9)?,
        description: row.get(10)?,
        created_by: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// 工单附件（维护人员 + 备件用量）写入参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartUsageInput {
    pub part_id: String,
    pub quantity_used: i32,
}

// ==========================================
// WorkOrderRepository - 工单仓储
// ==========================================
pub struct WorkOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkOrderRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建工单，并在同一事务内写入维护人员与备件用量
    pub fn insert(
        &self,
        work_order: &WorkOrder,
        maintainer_ids: &[String],
        parts: &[PartUsageInput],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO work_orders (
                id, code, equipment_id, type, status, priority,
                scheduled_date, started_at, completed_at,
                machine_down, description, created_by, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                work_order.id,
                work_order.code,
                work_order.equipment_id,
                work_order.maintenance_type.as_db_str(),
                work_order.status.as_db_str(),
                work_order.priority.as_db_str(),
                work_order.scheduled_date,
                work_order.started_at,
                work_order.completed_at,
                work_order.machine_down,
                work_order.description,
                work_order.created_by,
                work_order.created_at,
                work_order.updated_at,
            ],
        )?;

        replace_maintainers_tx(&tx, &work_order.id, maintainer_ids)?;
        replace_parts_tx(&tx, &work_order.id, parts)?;

        tx.commit()?;
        Ok(())
    }

    /// 更新可编辑字段（不含状态与时间戳）
    ///
    /// 附件参数为 None 时保留原有关联
    pub fn update(
        &self,
        work_order: &WorkOrder,
        maintainer_ids: Option<&[String]>,
        parts: Option<&[PartUsageInput]>,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let affected = tx.execute(
            r#"
            UPDATE work_orders SET
                equipment_id = ?2, type = ?3, priority = ?4,
                scheduled_date = ?5, machine_down = ?6, description = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
            params![
                work_order.id,
                work_order.equipment_id,
                work_order.maintenance_type.as_db_str(),
                work_order.priority.as_db_str(),
                work_order.scheduled_date,
                work_order.machine_down,
                work_order.description,
                work_order.updated_at,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("WorkOrder", &work_order.id));
        }

        if let Some(ids) = maintainer_ids {
            replace_maintainers_tx(&tx, &work_order.id, ids)?;
        }
        if let Some(parts) = parts {
            replace_parts_tx(&tx, &work_order.id, parts)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 写入状态及开始/完成时间
    pub fn update_status(
        &self,
        id: &str,
        status: WorkOrderStatus,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE work_orders
            SET status = ?2, started_at = ?3, completed_at = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
            params![id, status.as_db_str(), started_at, completed_at, updated_at],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("WorkOrder", id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<WorkOrder>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM work_orders WHERE id = ?1", WORK_ORDER_COLUMNS);
        let work_order = conn
            .query_row(&sql, params![id], map_work_order_row)
            .optional()?;
        Ok(work_order)
    }

    /// 全部工单（按创建时间倒序）
    pub fn list_all(&self) -> RepositoryResult<Vec<WorkOrder>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM work_orders ORDER BY created_at DESC, code DESC",
            WORK_ORDER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let orders = stmt
            .query_map([], map_work_order_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(orders)
    }

    /// 按状态筛选（按计划时间升序）
    pub fn list_by_status(&self, status: WorkOrderStatus) -> RepositoryResult<Vec<WorkOrder>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM work_orders WHERE status = ?1 ORDER BY scheduled_date ASC",
            WORK_ORDER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let orders = stmt
            .query_map(params![status.as_db_str()], map_work_order_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(orders)
    }

    /// 工单详情: 工单 + 设备 + 维护人员 + 备件用量
    pub fn find_detail(&self, id: &str) -> RepositoryResult<Option<WorkOrderDetail>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM work_orders WHERE id = ?1", WORK_ORDER_COLUMNS);
        let Some(work_order) = conn
            .query_row(&sql, params![id], map_work_order_row)
            .optional()?
        else {
            return Ok(None);
        };

        let detail = load_detail(&conn, work_order)?;
        Ok(Some(detail))
    }

    /// 全部工单详情（导出用，按创建时间倒序）
    pub fn list_details(&self) -> RepositoryResult<Vec<WorkOrderDetail>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM work_orders ORDER BY created_at DESC, code DESC",
            WORK_ORDER_COLUMNS
        );
        let orders = {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], map_work_order_row)?
                .collect::<SqliteResult<Vec<_>>>()?;
            rows
        };

        orders
            .into_iter()
            .map(|wo| load_detail(&conn, wo))
            .collect()
    }

    pub fn code_exists(&self, code: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT 1 FROM work_orders WHERE code = ?1")?;
        Ok(stmt.exists(params![code])?)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM work_orders WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("WorkOrder", id));
        }
        Ok(())
    }
}

// ==========================================
// 关联表操作
// ==========================================

fn replace_maintainers_tx(
    tx: &rusqlite::Transaction,
    work_order_id: &str,
    maintainer_ids: &[String],
) -> RepositoryResult<()> {
    tx.execute(
        "DELETE FROM work_order_maintainers WHERE work_order_id = ?1",
        params![work_order_id],
    )?;

    let mut stmt = tx.prepare(
        "INSERT OR IGNORE INTO work_order_maintainers (id, work_order_id, maintainer_id) VALUES (?1, ?2, ?3)",
    )?;
    for maintainer_id in maintainer_ids {
        stmt.execute(params![
            uuid::Uuid::new_v4().to_string(),
            work_order_id,
            maintainer_id
        ])?;
    }
    Ok(())
}

fn replace_parts_tx(
    tx: &rusqlite::Transaction,
    work_order_id: &str,
    parts: &[PartUsageInput],
) -> RepositoryResult<()> {
    tx.execute(
        "DELETE FROM work_order_parts WHERE work_order_id = ?1",
        params![work_order_id],
    )?;

    let mut stmt = tx.prepare(
        r#"
        INSERT INTO work_order_parts (id, work_order_id, part_id, quantity_used)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(work_order_id, part_id) DO UPDATE SET quantity_used = excluded.quantity_used
        "#,
    )?;
    for usage in parts {
        stmt.execute(params![
            uuid::Uuid::new_v4().to_string(),
            work_order_id,
            usage.part_id,
            usage.quantity_used
        ])?;
    }
    Ok(())
}

fn load_detail(conn: &Connection, work_order: WorkOrder) -> RepositoryResult<WorkOrderDetail> {
    let equipment = conn
        .query_row(
            "SELECT id, code, name FROM equipments WHERE id = ?1",
            params![work_order.equipment_id],
            |row| {
                Ok(EquipmentRef {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    name: row.get(2)?,
                })
            },
        )
        .optional()?;

    let maintainers: Vec<Maintainer> = {
        let mut stmt = conn.prepare(
            r#"
            SELECT m.id, m.name, m.role, m.contact, m.certifications, m.active, m.created_at, m.updated_at
            FROM work_order_maintainers wm
            JOIN maintainers m ON m.id = wm.maintainer_id
            WHERE wm.work_order_id = ?1
            ORDER BY m.name ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![work_order.id], map_maintainer_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        rows
    };

    let parts: Vec<WorkOrderPartUsage> = {
        let mut stmt = conn.prepare(
            r#"
            SELECT p.id, p.code, p.name, wp.quantity_used
            FROM work_order_parts wp
            JOIN parts p ON p.id = wp.part_id
            WHERE wp.work_order_id = ?1
            ORDER BY p.name ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![work_order.id], |row| {
                Ok(WorkOrderPartUsage {
                    part_id: row.get(0)?,
                    code: row.get(1)?,
                    name: row.get(2)?,
                    quantity_used: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        rows
    };

    Ok(WorkOrderDetail {
        work_order,
        equipment,
        maintainers,
        parts,
    })
}
