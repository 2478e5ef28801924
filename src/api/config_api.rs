// ==========================================
// 设备维护管理系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新、快照管理
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::api::error::{require_non_empty, ApiError, ApiResult};
use crate::config::{ConfigManager, DashboardConfig};

/// 配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub scope_id: String,
    pub key: String,
    pub value: String,
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    conn: Arc<Mutex<Connection>>,
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(conn: Arc<Mutex<Connection>>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            conn,
            config_manager,
        }
    }

    fn get_conn(&self) -> ApiResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ApiError::DatabaseConnectionError(format!("锁获取失败: {}", e)))
    }

    /// 查询所有配置（按作用域、键排序）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn
            .prepare("SELECT scope_id, key, value FROM config_kv ORDER BY scope_id, key")
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let configs = stmt
            .query_map([], |row| {
                Ok(ConfigItem {
                    scope_id: row.get(0)?,
                    key: row.get(1)?,
                    value: row.get(2)?,
                })
            })
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(configs)
    }

    /// 查询单个配置
    pub fn get_config(&self, scope_id: &str, key: &str) -> ApiResult<Option<ConfigItem>> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT scope_id, key, value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![scope_id, key],
            |row| {
                Ok(ConfigItem {
                    scope_id: row.get(0)?,
                    key: row.get(1)?,
                    value: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    /// 更新 global 配置
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let key = require_non_empty("key", key)?;
        self.config_manager
            .set_config_value(&key, value)
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 导出 global 配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 从快照恢复，返回写入条数
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        let restored = self
            .config_manager
            .restore_config_from_snapshot(snapshot_json)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        tracing::info!(restored, "配置快照已恢复");
        Ok(restored)
    }

    /// 当前生效的驾驶舱参数（缺省项取默认值）
    pub fn get_dashboard_config(&self) -> ApiResult<DashboardConfig> {
        self.config_manager
            .get_dashboard_config()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}
