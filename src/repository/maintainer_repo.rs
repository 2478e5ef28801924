// ==========================================
// 设备维护管理系统 - 维护人员仓储
// ==========================================
// certifications 列以 JSON 数组文本存储
// ==========================================

use crate::domain::maintainer::Maintainer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const MAINTAINER_COLUMNS: &str =
    "id, name, role, contact, certifications, active, created_at, updated_at";

pub(crate) fn map_maintainer_row(row: &Row) -> SqliteResult<Maintainer> {
    let certifications_json: String = row.get(4)?;
    let certifications: Vec<String> = serde_json::from_str(&certifications_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Maintainer {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        contact: row.get(3)?,
        certifications,
        active: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn certifications_to_json(certifications: &[String]) -> RepositoryResult<String> {
    serde_json::to_string(certifications).map_err(|e| RepositoryError::FieldValueError {
        field: "certifications".to_string(),
        message: e.to_string(),
    })
}

pub struct MaintainerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintainerRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, maintainer: &Maintainer) -> RepositoryResult<()> {
        let certifications = certifications_to_json(&maintainer.certifications)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO maintainers (id, name, role, contact, certifications, active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                maintainer.id,
                maintainer.name,
                maintainer.role,
                maintainer.contact,
                certifications,
                maintainer.active,
                maintainer.created_at,
                maintainer.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, maintainer: &Maintainer) -> RepositoryResult<()> {
        let certifications = certifications_to_json(&maintainer.certifications)?;
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE maintainers
            SET name = ?2, role = ?3, contact = ?4, certifications = ?5, active = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                maintainer.id,
                maintainer.name,
                maintainer.role,
                maintainer.contact,
                certifications,
                maintainer.active,
                maintainer.updated_at,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Maintainer", &maintainer.id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Maintainer>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM maintainers WHERE id = ?1", MAINTAINER_COLUMNS);
        Ok(conn.query_row(&sql, params![id], map_maintainer_row).optional()?)
    }

    /// 按姓名排序；`active_only` 为 true 时只返回在岗人员
    pub fn list(&self, active_only: bool) -> RepositoryResult<Vec<Maintainer>> {
        let conn = self.get_conn()?;
        let sql = if active_only {
            format!(
                "SELECT {} FROM maintainers WHERE active = 1 ORDER BY name ASC",
                MAINTAINER_COLUMNS
            )
        } else {
            format!("SELECT {} FROM maintainers ORDER BY name ASC", MAINTAINER_COLUMNS)
        };
        let mut stmt = conn.prepare(&sql)?;
        let maintainers = stmt
            .query_map([], map_maintainer_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(maintainers)
    }

    pub fn exists(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT 1 FROM maintainers WHERE id = ?1")?;
        Ok(stmt.exists(params![id])?)
    }
}
