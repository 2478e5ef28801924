// ==========================================
// 设备维护管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接、仓储与 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::{
    ConfigApi, DashboardApi, EquipmentApi, InventoryApi, MaintainerApi, RequestApi, WorkOrderApi,
};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{ChangeEvent, DeferredChannelPublisher, OptionalEventPublisher};
use crate::repository::{
    EquipmentRepository, MaintainerRepository, MaintenanceRequestRepository, PartRepository,
    PurchaseRequestRepository, WorkOrderRepository,
};

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub dashboard_api: Arc<DashboardApi>,
    pub work_order_api: Arc<WorkOrderApi>,
    pub inventory_api: Arc<InventoryApi>,
    pub equipment_api: Arc<EquipmentApi>,
    pub maintainer_api: Arc<MaintainerApi>,
    pub request_api: Arc<RequestApi>,
    pub config_api: Arc<ConfigApi>,

    /// 变更事件通道（刷新任务取走接收端后才开始排队）
    change_publisher: Arc<DeferredChannelPublisher>,
}

impl AppState {
    /// 打开数据库、建表并装配所有 API
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 可用于测试）
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let work_order_repo = Arc::new(WorkOrderRepository::from_connection(conn.clone()));
        let part_repo = Arc::new(PartRepository::from_connection(conn.clone()));
        let equipment_repo = Arc::new(EquipmentRepository::from_connection(conn.clone()));
        let maintainer_repo = Arc::new(MaintainerRepository::from_connection(conn.clone()));
        let maintenance_request_repo =
            Arc::new(MaintenanceRequestRepository::from_connection(conn.clone()));
        let purchase_request_repo =
            Arc::new(PurchaseRequestRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 事件发布器（写操作 → 驾驶舱刷新）
        // ==========================================
        let change_publisher = Arc::new(DeferredChannelPublisher::new());
        let publisher = OptionalEventPublisher::with_publisher(change_publisher.clone());

        // ==========================================
        // 初始化API层
        // ==========================================
        let dashboard_api = Arc::new(DashboardApi::new(
            work_order_repo.clone(),
            part_repo.clone(),
            equipment_repo.clone(),
            config_manager.clone(),
        ));
        let work_order_api = Arc::new(WorkOrderApi::new(
            work_order_repo.clone(),
            equipment_repo.clone(),
            maintainer_repo.clone(),
            part_repo.clone(),
            publisher.clone(),
        ));
        let inventory_api = Arc::new(InventoryApi::new(
            part_repo,
            equipment_repo.clone(),
            publisher.clone(),
        ));
        let equipment_api = Arc::new(EquipmentApi::new(equipment_repo.clone(), publisher.clone()));
        let maintainer_api = Arc::new(MaintainerApi::new(maintainer_repo, publisher.clone()));
        let request_api = Arc::new(RequestApi::new(
            maintenance_request_repo,
            purchase_request_repo,
            work_order_repo,
            equipment_repo,
            publisher,
        ));
        let config_api = Arc::new(ConfigApi::new(conn, config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            dashboard_api,
            work_order_api,
            inventory_api,
            equipment_api,
            maintainer_api,
            request_api,
            config_api,
            change_publisher,
        })
    }

    /// 取走变更事件接收端（只能取一次）
    pub fn take_change_receiver(&self) -> Option<UnboundedReceiver<ChangeEvent>> {
        self.change_publisher.subscribe()
    }
}

/// 获取默认数据库路径
///
/// 优先读取环境变量 MAINTENANCE_DASHBOARD_DB_PATH，
/// 否则使用用户数据目录下的 maintenance-dashboard/maintenance.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("MAINTENANCE_DASHBOARD_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./maintenance.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("maintenance-dashboard");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("无法创建数据目录 {}: {}", dir.display(), e);
        } else {
            path = dir.join("maintenance.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_events_are_not_queued_before_subscribe() {
        let state = AppState::new(":memory:".to_string()).unwrap();
        let equipment = state
            .equipment_api
            .create_equipment(
                crate::api::EquipmentRequest {
                    code: "EQ-001".to_string(),
                    name: "Prensa".to_string(),
                    description: None,
                    location: None,
                    manufacturer: None,
                    acquisition_date: None,
                    criticality: Default::default(),
                    custom_color: None,
                },
                None,
                chrono::Utc::now(),
            )
            .unwrap();

        let mut receiver = state.take_change_receiver().unwrap();
        assert!(receiver.try_recv().is_err());

        state
            .equipment_api
            .delete_equipment(&equipment.id)
            .unwrap();
        assert!(receiver.try_recv().unwrap().triggers_dashboard_refresh());
    }

    #[test]
    fn test_app_state_in_memory() {
        let state = AppState::new(":memory:".to_string()).unwrap();
        assert!(state.take_change_receiver().is_some());
        assert!(state.take_change_receiver().is_none());
        assert!(state.work_order_api.list_work_orders().unwrap().is_empty());
    }
}
