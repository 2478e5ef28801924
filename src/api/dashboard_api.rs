// ==========================================
// 设备维护管理系统 - 驾驶舱 API
// ==========================================
// 职责: 读取快照 → 调用 DashboardEngine → 缓存最近一次结果
// 刷新策略: 每次全量重算，结果整体替换（后写覆盖）
// ==========================================

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, DashboardConfig};
use crate::domain::dashboard::{DashboardSnapshot, DashboardStats};
use crate::domain::part::Part;
use crate::engine::DashboardEngine;
use crate::repository::{EquipmentRepository, PartRepository, WorkOrderRepository};

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    work_order_repo: Arc<WorkOrderRepository>,
    part_repo: Arc<PartRepository>,
    equipment_repo: Arc<EquipmentRepository>,
    config_manager: Arc<ConfigManager>,
    latest: RwLock<Option<DashboardStats>>,
}

impl DashboardApi {
    pub fn new(
        work_order_repo: Arc<WorkOrderRepository>,
        part_repo: Arc<PartRepository>,
        equipment_repo: Arc<EquipmentRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            work_order_repo,
            part_repo,
            equipment_repo,
            config_manager,
            latest: RwLock::new(None),
        }
    }

    /// 读取当前完整快照
    pub fn load_snapshot(&self) -> ApiResult<DashboardSnapshot> {
        Ok(DashboardSnapshot {
            work_orders: self.work_order_repo.list_all()?,
            low_stock_parts: self.part_repo.list_low_stock()?,
            equipments: self.equipment_repo.list_all()?,
        })
    }

    fn load_config(&self) -> ApiResult<DashboardConfig> {
        self.config_manager
            .get_dashboard_config()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 计算驾驶舱（不写缓存）
    ///
    /// # 参数
    /// - now: 评估时刻（由调用方读取时钟）
    pub fn get_dashboard_stats(&self, now: DateTime<Utc>) -> ApiResult<DashboardStats> {
        let snapshot = self.load_snapshot()?;
        let engine = DashboardEngine::new(self.load_config()?);
        let stats = engine.compute(&snapshot, now);

        tracing::debug!(
            work_orders = stats.total_work_orders,
            alerts = stats.alerts.len(),
            "驾驶舱计算完成"
        );
        Ok(stats)
    }

    /// 全量重算并替换缓存
    pub fn refresh(&self, now: DateTime<Utc>) -> ApiResult<DashboardStats> {
        let stats = self.get_dashboard_stats(now)?;

        let mut latest = self
            .latest
            .write()
            .map_err(|e| ApiError::InternalError(format!("缓存锁获取失败: {}", e)))?;
        *latest = Some(stats.clone());

        tracing::info!(
            generated_at = %stats.generated_at,
            availability = stats.availability,
            "驾驶舱已刷新"
        );
        Ok(stats)
    }

    /// 最近一次刷新结果
    pub fn latest(&self) -> Option<DashboardStats> {
        self.latest.read().ok().and_then(|guard| guard.clone())
    }

    /// 低库存备件（按名称排序）
    pub fn get_low_stock_parts(&self) -> ApiResult<Vec<Part>> {
        Ok(self.part_repo.list_low_stock()?)
    }
}
