// ==========================================
// 设备维护管理系统 - 设备台账仓储
// ==========================================
// 卡片布局列可空，默认值在引擎层填充
// ==========================================

use crate::domain::equipment::{CardLayout, Equipment};
use crate::domain::types::Criticality;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const EQUIPMENT_COLUMNS: &str = r#"
    id, code, name, description, location, manufacturer, acquisition_date,
    parent_id, position_x, position_y, card_width, card_height,
    criticality, custom_color, created_at, updated_at
"#;

fn map_equipment_row(row: &Row) -> SqliteResult<Equipment> {
    Ok(Equipment {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        manufacturer: row.get(5)?,
        acquisition_date: row.get(6)?,
        parent_id: row.get(7)?,
        layout: CardLayout {
            position_x: row.get(8)?,
            position_y: row.get(9)?,
            card_width: row.get(10)?,
            card_height: row.get(11)?,
        },
        criticality: Criticality::from_db_str(&row.get::<_, String>(12)?),
        custom_color: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

// ==========================================
// EquipmentRepository - 设备仓储
// ==========================================
pub struct EquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentRepository {
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

    pub fn insert(&self, equipment: &Equipment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO equipments (
                id, code, name, description, location, manufacturer, acquisition_date,
                parent_id, position_x, position_y, card_width, card_height,
                criticality, custom_color, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                equipment.id,
                equipment.code,
                equipment.name,
                equipment.description,
                equipment.location,
                equipment.manufacturer,
                equipment.acquisition_date,
                equipment.parent_id,
                equipment.layout.position_x,
                equipment.layout.position_y,
                equipment.layout.card_width,
                equipment.layout.card_height,
                equipment.criticality.as_db_str(),
                equipment.custom_color,
                equipment.created_at,
                equipment.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 更新台账字段（不含布局与上级，二者有单独入口）
    pub fn update(&self, equipment: &Equipment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE equipments SET
                code = ?2, name = ?3, description = ?4, location = ?5,
                manufacturer = ?6, acquisition_date = ?7,
                criticality = ?8, custom_color = ?9, updated_at = ?10
            WHERE id = ?1
            "#,
            params![
                equipment.id,
                equipment.code,
                equipment.name,
                equipment.description,
                equipment.location,
                equipment.manufacturer,
                equipment.acquisition_date,
                equipment.criticality.as_db_str(),
                equipment.custom_color,
                equipment.updated_at,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Equipment", &equipment.id));
        }
        Ok(())
    }

    pub fn update_layout(
        &self,
        id: &str,
        layout: &CardLayout,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE equipments SET
                position_x = ?2, position_y = ?3, card_width = ?4, card_height = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                id,
                layout.position_x,
                layout.position_y,
                layout.card_width,
                layout.card_height,
                updated_at,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Equipment", id));
        }
        Ok(())
    }

    pub fn set_parent(
        &self,
        id: &str,
        parent_id: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE equipments SET parent_id = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, parent_id, updated_at],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Equipment", id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Equipment>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM equipments WHERE id = ?1", EQUIPMENT_COLUMNS);
        Ok(conn.query_row(&sql, params![id], map_equipment_row).optional()?)
    }

    /// 全部设备（按编码排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Equipment>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM equipments ORDER BY code ASC", EQUIPMENT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let equipments = stmt
            .query_map([], map_equipment_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(equipments)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM equipments WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Equipment", id));
        }
        Ok(())
    }
}
