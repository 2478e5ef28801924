// ==========================================
// 设备维护管理系统 - 备件库存仓储
// ==========================================
// 红线: Repository 不含业务逻辑（负库存校验在 API 层）
// ==========================================

use crate::domain::part::Part;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const PART_COLUMNS: &str = r#"
    id, code, name, description, equipment_id, supplier,
    stock_quantity, minimum_stock, created_at, updated_at
"#;

fn map_part_row(row: &Row) -> SqliteResult<Part> {
    Ok(Part {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        equipment_id: row.get(4)?,
        supplier: row.get(5)?,
        stock_quantity: row.get(6)?,
        minimum_stock: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

// ==========================================
// PartRepository - 备件仓储
// ==========================================
pub struct PartRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PartRepository {
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

    pub fn insert(&self, part: &Part) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO parts (
                id, code, name, description, equipment_id, supplier,
                stock_quantity, minimum_stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                part.id,
                part.code,
                part.name,
                part.description,
                part.equipment_id,
                part.supplier,
                part.stock_quantity,
                part.minimum_stock,
                part.created_at,
                part.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, part: &Part) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE parts SET
                code = ?2, name = ?3, description = ?4, equipment_id = ?5, supplier = ?6,
                stock_quantity = ?7, minimum_stock = ?8, updated_at = ?9
            WHERE id = ?1
            "#,
            params![
                part.id,
                part.code,
                part.name,
                part.description,
                part.equipment_id,
                part.supplier,
                part.stock_quantity,
                part.minimum_stock,
                part.updated_at,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Part", &part.id));
        }
        Ok(())
    }

    /// 写入库存绝对值
    pub fn set_stock(&self, id: &str, quantity: i32, updated_at: DateTime<Utc>) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE parts SET stock_quantity = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, quantity, updated_at],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Part", id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Part>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM parts WHERE id = ?1", PART_COLUMNS);
        Ok(conn.query_row(&sql, params![id], map_part_row).optional()?)
    }

    /// 全部备件（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Part>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM parts ORDER BY name ASC", PART_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let parts = stmt
            .query_map([], map_part_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(parts)
    }

    /// 低库存备件（库存 <= 最低库存，按名称排序）
    pub fn list_low_stock(&self) -> RepositoryResult<Vec<Part>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM parts WHERE stock_quantity <= minimum_stock ORDER BY name ASC",
            PART_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let parts = stmt
            .query_map([], map_part_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(parts)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM parts WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Part", id));
        }
        Ok(())
    }
}
