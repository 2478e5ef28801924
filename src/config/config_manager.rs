// ==========================================
// 设备维护管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::dashboard_config::{
    DashboardConfig, DEFAULT_CORRECTIVE_UNIT_COST, DEFAULT_MAX_ALERTS, DEFAULT_PERIOD_HOURS,
    DEFAULT_PREVENTIVE_UNIT_COST, DEFAULT_RECENT_COMPLETION_WINDOW_HOURS,
    DEFAULT_RECENT_WORK_ORDERS_LIMIT, DEFAULT_RELIABILITY_HOURS, DEFAULT_REPAIR_HOURS,
};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 读取配置并解析，缺失或格式错误时使用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy,
    {
        let value = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %value,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 返回
    /// - Ok(String): 配置快照的JSON字符串
    /// - Err: 获取失败
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            let affected = tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
            count += affected;
        }

        tx.commit()?;
        Ok(count)
    }

    // ===== 驾驶舱配置 =====

    /// 读取驾驶舱计算参数（同步版本，供 API 层直接调用）
    pub fn get_dashboard_config(&self) -> Result<DashboardConfig, Box<dyn Error>> {
        let locale = self
            .get_config_value(config_keys::ALERT_LOCALE)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| crate::i18n::DEFAULT_LOCALE.to_string());

        Ok(DashboardConfig {
            preventive_unit_cost: self
                .get_parsed_or_default(config_keys::PREVENTIVE_UNIT_COST, DEFAULT_PREVENTIVE_UNIT_COST)?,
            corrective_unit_cost: self
                .get_parsed_or_default(config_keys::CORRECTIVE_UNIT_COST, DEFAULT_CORRECTIVE_UNIT_COST)?,
            default_repair_hours: self
                .get_parsed_or_default(config_keys::DEFAULT_REPAIR_HOURS, DEFAULT_REPAIR_HOURS)?,
            default_reliability_hours: self.get_parsed_or_default(
                config_keys::DEFAULT_RELIABILITY_HOURS,
                DEFAULT_RELIABILITY_HOURS,
            )?,
            period_hours: self.get_parsed_or_default(config_keys::PERIOD_HOURS, DEFAULT_PERIOD_HOURS)?,
            recent_completion_window_hours: self.get_parsed_or_default(
                config_keys::RECENT_COMPLETION_WINDOW_HOURS,
                DEFAULT_RECENT_COMPLETION_WINDOW_HOURS,
            )?,
            max_alerts: self.get_parsed_or_default(config_keys::MAX_ALERTS, DEFAULT_MAX_ALERTS)?,
            alert_locale: locale,
            recent_work_orders_limit: self.get_parsed_or_default(
                config_keys::RECENT_WORK_ORDERS_LIMIT,
                DEFAULT_RECENT_WORK_ORDERS_LIMIT,
            )?,
        })
    }
}

// ==========================================
// DashboardConfigReader Trait - 异步读取驾驶舱配置
// ==========================================
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    async fn get_preventive_unit_cost(&self) -> Result<f64, Box<dyn Error>>;
    async fn get_corrective_unit_cost(&self) -> Result<f64, Box<dyn Error>>;
    async fn get_default_repair_hours(&self) -> Result<f64, Box<dyn Error>>;
    async fn get_max_alerts(&self) -> Result<usize, Box<dyn Error>>;

    /// 一次性读取完整参数
    async fn load_dashboard_config(&self) -> Result<DashboardConfig, Box<dyn Error>>;
}

#[async_trait]
impl DashboardConfigReader for ConfigManager {
    async fn get_preventive_unit_cost(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::PREVENTIVE_UNIT_COST, DEFAULT_PREVENTIVE_UNIT_COST)
    }

    async fn get_corrective_unit_cost(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::CORRECTIVE_UNIT_COST, DEFAULT_CORRECTIVE_UNIT_COST)
    }

    async fn get_default_repair_hours(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::DEFAULT_REPAIR_HOURS, DEFAULT_REPAIR_HOURS)
    }

    async fn get_max_alerts(&self) -> Result<usize, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::MAX_ALERTS, DEFAULT_MAX_ALERTS)
    }

    async fn load_dashboard_config(&self) -> Result<DashboardConfig, Box<dyn Error>> {
        self.get_dashboard_config()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 成本单价
    pub const PREVENTIVE_UNIT_COST: &str = "preventive_unit_cost";
    pub const CORRECTIVE_UNIT_COST: &str = "corrective_unit_cost";

    // 可靠性缺省值
    pub const DEFAULT_REPAIR_HOURS: &str = "default_repair_hours";
    pub const DEFAULT_RELIABILITY_HOURS: &str = "default_reliability_hours";
    pub const PERIOD_HOURS: &str = "period_hours";

    // 告警
    pub const RECENT_COMPLETION_WINDOW_HOURS: &str = "recent_completion_window_hours";
    pub const MAX_ALERTS: &str = "max_alerts";
    pub const ALERT_LOCALE: &str = "alert_locale";

    // 展示
    pub const RECENT_WORK_ORDERS_LIMIT: &str = "recent_work_orders_limit";
}
