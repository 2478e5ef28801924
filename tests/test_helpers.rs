// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库 + AppState 装配、测试数据构造
// ==========================================

#![allow(dead_code)]

use std::error::Error;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::NamedTempFile;

use maintenance_dashboard::api::{
    CreateWorkOrderRequest, EquipmentRequest, MaintainerRequest, PartRequest,
};
use maintenance_dashboard::app::AppState;
use maintenance_dashboard::domain::{
    Equipment, Maintainer, MaintenanceType, Part, Priority, WorkOrder, WorkOrderStatus,
};

/// 测试环境（临时数据库文件随环境一起释放）
pub struct TestEnv {
    _temp_file: NamedTempFile,
    pub db_path: String,
    pub state: AppState,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or("临时文件路径非 UTF-8")?
            .to_string();
        let state = AppState::new(db_path.clone())?;

        Ok(Self {
            _temp_file: temp_file,
            db_path,
            state,
        })
    }

    /// 新建设备
    pub fn seed_equipment(&self, code: &str, name: &str) -> Equipment {
        self.state
            .equipment_api
            .create_equipment(equipment_request(code, name), None, ts(2024, 1, 1, 8, 0))
            .expect("创建设备失败")
    }

    /// 新建备件
    pub fn seed_part(&self, code: &str, name: &str, stock: i32, minimum: i32) -> Part {
        self.state
            .inventory_api
            .create_part(part_request(code, name, stock, minimum), ts(2024, 1, 1, 8, 0))
            .expect("创建备件失败")
    }

    /// 新建维护人员
    pub fn seed_maintainer(&self, name: &str) -> Maintainer {
        self.state
            .maintainer_api
            .create_maintainer(
                MaintainerRequest {
                    name: name.to_string(),
                    role: Some("Mecânico".to_string()),
                    contact: None,
                    certifications: vec!["NR-10".to_string()],
                },
                ts(2024, 1, 1, 8, 0),
            )
            .expect("创建维护人员失败")
    }

    /// 新建工单（指定创建时间）
    pub fn seed_work_order(
        &self,
        equipment_id: &str,
        maintenance_type: MaintenanceType,
        scheduled_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> WorkOrder {
        self.state
            .work_order_api
            .create_work_order(
                work_order_request(equipment_id, maintenance_type, scheduled_date),
                created_at,
            )
            .expect("创建工单失败")
    }
}

// ==========================================
// 请求构造
// ==========================================

pub fn equipment_request(code: &str, name: &str) -> EquipmentRequest {
    EquipmentRequest {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        location: Some("Linha 1".to_string()),
        manufacturer: None,
        acquisition_date: None,
        criticality: Default::default(),
        custom_color: None,
    }
}

pub fn part_request(code: &str, name: &str, stock: i32, minimum: i32) -> PartRequest {
    PartRequest {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        equipment_id: None,
        supplier: None,
        stock_quantity: stock,
        minimum_stock: minimum,
    }
}

pub fn work_order_request(
    equipment_id: &str,
    maintenance_type: MaintenanceType,
    scheduled_date: DateTime<Utc>,
) -> CreateWorkOrderRequest {
    CreateWorkOrderRequest {
        code: None,
        equipment_id: equipment_id.to_string(),
        maintenance_type,
        priority: Priority::Medium,
        scheduled_date,
        machine_down: false,
        description: Some("Troca de rolamento".to_string()),
        created_by: Some("admin".to_string()),
        maintainer_ids: Vec::new(),
        parts: Vec::new(),
    }
}

// ==========================================
// 纯数据构造（引擎测试用）
// ==========================================

pub fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("无效时间")
}

/// 构造工单，计划/创建时间相同
pub fn work_order(
    id: &str,
    maintenance_type: MaintenanceType,
    status: WorkOrderStatus,
    created_at: DateTime<Utc>,
) -> WorkOrder {
    WorkOrder {
        id: id.to_string(),
        code: format!("OS-{}", id),
        equipment_id: "eq-1".to_string(),
        maintenance_type,
        status,
        priority: Priority::Medium,
        scheduled_date: created_at,
        started_at: None,
        completed_at: None,
        machine_down: false,
        description: None,
        created_by: None,
        created_at,
        updated_at: created_at,
    }
}

pub fn part(name: &str, stock: i32, minimum: i32) -> Part {
    let now = ts(2024, 1, 1, 0, 0);
    Part {
        id: format!("part-{}", name),
        code: format!("P-{}", name),
        name: name.to_string(),
        description: None,
        equipment_id: None,
        supplier: None,
        stock_quantity: stock,
        minimum_stock: minimum,
        created_at: now,
        updated_at: now,
    }
}
