// ==========================================
// 设备维护管理系统 - 工单 API
// ==========================================
// 职责: 工单创建/编辑/状态流转/详情/导出
// 状态机: programada → em_andamento → finalizada
//         programada | em_andamento → cancelada
// 写操作成功后发布 work_orders 变更事件
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{
    optional_text, require_non_empty, require_work_order_code, ApiError, ApiResult,
};
use crate::domain::types::{MaintenanceType, Priority, WorkOrderStatus};
use crate::domain::work_order::{WorkOrder, WorkOrderDetail};
use crate::engine::{ChangeEvent, OptionalEventPublisher, WatchedTable};
use crate::export::{self, WorkOrderDocument};
use crate::repository::{
    EquipmentRepository, MaintainerRepository, PartRepository, PartUsageInput, WorkOrderRepository,
};

/// 新建工单请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkOrderRequest {
    /// 为空时按 OS-{毫秒时间戳} 生成
    pub code: Option<String>,
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub maintenance_type: MaintenanceType,
    #[serde(default)]
    pub priority: Priority,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub machine_down: bool,
    pub description: Option<String>,
    pub created_by: Option<String>,
    #[serde(default)]
    pub maintainer_ids: Vec<String>,
    #[serde(default)]
    pub parts: Vec<PartUsageRequest>,
}

/// 编辑工单请求（附件为 None 时保留原关联）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkOrderRequest {
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub maintenance_type: MaintenanceType,
    pub priority: Priority,
    pub scheduled_date: DateTime<Utc>,
    pub machine_down: bool,
    pub description: Option<String>,
    pub maintainer_ids: Option<Vec<String>>,
    pub parts: Option<Vec<PartUsageRequest>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartUsageRequest {
    pub part_id: String,
    pub quantity_used: i32,
}

// ==========================================
// WorkOrderApi - 工单 API
// ==========================================
pub struct WorkOrderApi {
    work_order_repo: Arc<WorkOrderRepository>,
    equipment_repo: Arc<EquipmentRepository>,
    maintainer_repo: Arc<MaintainerRepository>,
    part_repo: Arc<PartRepository>,
    publisher: OptionalEventPublisher,
}

impl WorkOrderApi {
    pub fn new(
        work_order_repo: Arc<WorkOrderRepository>,
        equipment_repo: Arc<EquipmentRepository>,
        maintainer_repo: Arc<MaintainerRepository>,
        part_repo: Arc<PartRepository>,
        publisher: OptionalEventPublisher,
    ) -> Self {
        Self {
            work_order_repo,
            equipment_repo,
            maintainer_repo,
            part_repo,
            publisher,
        }
    }

    // ==========================================
    // 创建与编辑
    // ==========================================

    /// 新建工单（状态为已计划）
    pub fn create_work_order(
        &self,
        request: CreateWorkOrderRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<WorkOrder> {
        self.ensure_equipment_exists(&request.equipment_id)?;
        self.ensure_maintainers_exist(&request.maintainer_ids)?;
        let parts = self.validate_parts(&request.parts)?;

        let code = match optional_text(request.code) {
            Some(code) => require_work_order_code(&code)?,
            None => self.generate_code(now)?,
        };

        let work_order = WorkOrder {
            id: Uuid::new_v4().to_string(),
            code,
            equipment_id: request.equipment_id,
            maintenance_type: request.maintenance_type,
            status: WorkOrderStatus::Scheduled,
            priority: request.priority,
            scheduled_date: request.scheduled_date,
            started_at: None,
            completed_at: None,
            machine_down: request.machine_down,
            description: optional_text(request.description),
            created_by: optional_text(request.created_by),
            created_at: now,
            updated_at: now,
        };

        self.work_order_repo
            .insert(&work_order, &request.maintainer_ids, &parts)?;

        tracing::info!(
            work_order_id = %work_order.id,
            code = %work_order.code,
            equipment_id = %work_order.equipment_id,
            "工单已创建"
        );
        self.publisher
            .publish(ChangeEvent::insert(WatchedTable::WorkOrders));
        Ok(work_order)
    }

    /// 编辑工单可编辑字段
    pub fn update_work_order(
        &self,
        id: &str,
        request: UpdateWorkOrderRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<WorkOrder> {
        let mut work_order = self.require_work_order(id)?;
        self.ensure_equipment_exists(&request.equipment_id)?;
        if let Some(ids) = &request.maintainer_ids {
            self.ensure_maintainers_exist(ids)?;
        }
        let parts = match &request.parts {
            Some(parts) => Some(self.validate_parts(parts)?),
            None => None,
        };

        work_order.equipment_id = request.equipment_id;
        work_order.maintenance_type = request.maintenance_type;
        work_order.priority = request.priority;
        work_order.scheduled_date = request.scheduled_date;
        work_order.machine_down = request.machine_down;
        work_order.description = optional_text(request.description);
        work_order.updated_at = now;

        self.work_order_repo.update(
            &work_order,
            request.maintainer_ids.as_deref(),
            parts.as_deref(),
        )?;

        tracing::info!(work_order_id = %id, "工单已更新");
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::WorkOrders));
        Ok(work_order)
    }

    // ==========================================
    // 状态流转
    // ==========================================

    /// 开始执行: programada → em_andamento，记录开始时间
    pub fn start_work_order(&self, id: &str, now: DateTime<Utc>) -> ApiResult<WorkOrder> {
        self.transition(id, WorkOrderStatus::InProgress, now)
    }

    /// 完成: em_andamento → finalizada，记录完成时间
    pub fn complete_work_order(&self, id: &str, now: DateTime<Utc>) -> ApiResult<WorkOrder> {
        self.transition(id, WorkOrderStatus::Completed, now)
    }

    /// 取消: programada | em_andamento → cancelada
    pub fn cancel_work_order(&self, id: &str, now: DateTime<Utc>) -> ApiResult<WorkOrder> {
        self.transition(id, WorkOrderStatus::Cancelled, now)
    }

    fn transition(
        &self,
        id: &str,
        target: WorkOrderStatus,
        now: DateTime<Utc>,
    ) -> ApiResult<WorkOrder> {
        let mut work_order = self.require_work_order(id)?;

        if !work_order.status.can_transition_to(target) {
            return Err(ApiError::InvalidStateTransition {
                from: work_order.status.as_db_str().to_string(),
                to: target.as_db_str().to_string(),
            });
        }

        match target {
            WorkOrderStatus::InProgress => work_order.started_at = Some(now),
            WorkOrderStatus::Completed => work_order.completed_at = Some(now),
            _ => {}
        }
        let from = work_order.status;
        work_order.status = target;
        work_order.updated_at = now;

        self.work_order_repo.update_status(
            id,
            work_order.status,
            work_order.started_at,
            work_order.completed_at,
            now,
        )?;

        tracing::info!(
            work_order_id = %id,
            from = %from,
            to = %target,
            "工单状态已变更"
        );
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::WorkOrders));
        Ok(work_order)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 全部工单（按创建时间倒序）
    pub fn list_work_orders(&self) -> ApiResult<Vec<WorkOrder>> {
        Ok(self.work_order_repo.list_all()?)
    }

    pub fn list_by_status(&self, status: WorkOrderStatus) -> ApiResult<Vec<WorkOrder>> {
        Ok(self.work_order_repo.list_by_status(status)?)
    }

    pub fn get_work_order(&self, id: &str) -> ApiResult<WorkOrder> {
        self.require_work_order(id)
    }

    /// 工单详情: 工单 + 设备 + 维护人员 + 备件用量
    pub fn get_work_order_detail(&self, id: &str) -> ApiResult<WorkOrderDetail> {
        self.work_order_repo
            .find_detail(id)?
            .ok_or_else(|| ApiError::NotFound(format!("WorkOrder(id={})不存在", id)))
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 全部工单导出为 CSV 文本
    pub fn export_work_orders_csv(&self, locale: &str) -> ApiResult<String> {
        let details = self.work_order_repo.list_details()?;
        Ok(export::work_orders_csv_string(&details, locale)?)
    }

    /// 全部工单导出到目录，文件名含导出日期
    pub fn export_work_orders_csv_to_dir(
        &self,
        dir: &Path,
        locale: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<PathBuf> {
        let details = self.work_order_repo.list_details()?;
        let path = dir.join(export::export_file_name(locale, now.date_naive()));
        export::write_work_orders_csv_file(&path, &details, locale)?;
        Ok(path)
    }

    /// 组装工单文档
    pub fn build_document(&self, id: &str, locale: &str) -> ApiResult<WorkOrderDocument> {
        let detail = self.get_work_order_detail(id)?;
        Ok(WorkOrderDocument::build(&detail, locale))
    }

    /// 生成工单文档文件（OS_{code}.txt）
    pub fn write_document(&self, id: &str, locale: &str, dir: &Path) -> ApiResult<PathBuf> {
        let document = self.build_document(id, locale)?;
        Ok(document.write_to_dir(dir, export::DEFAULT_PAGE_HEIGHT)?)
    }

    // ==========================================
    // 校验辅助
    // ==========================================

    fn require_work_order(&self, id: &str) -> ApiResult<WorkOrder> {
        self.work_order_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("WorkOrder(id={})不存在", id)))
    }

    fn ensure_equipment_exists(&self, equipment_id: &str) -> ApiResult<()> {
        let equipment_id = require_non_empty("equipment_id", equipment_id)?;
        if self.equipment_repo.find_by_id(&equipment_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Equipment(id={})不存在",
                equipment_id
            )));
        }
        Ok(())
    }

    fn ensure_maintainers_exist(&self, maintainer_ids: &[String]) -> ApiResult<()> {
        for id in maintainer_ids {
            if !self.maintainer_repo.exists(id)? {
                return Err(ApiError::NotFound(format!("Maintainer(id={})不存在", id)));
            }
        }
        Ok(())
    }

    /// 备件用量: 数量 >= 1 且备件存在
    fn validate_parts(&self, parts: &[PartUsageRequest]) -> ApiResult<Vec<PartUsageInput>> {
        parts
            .iter()
            .map(|usage| {
                if usage.quantity_used < 1 {
                    return Err(ApiError::InvalidInput(format!(
                        "备件用量必须 >= 1 (part_id={}, quantity_used={})",
                        usage.part_id, usage.quantity_used
                    )));
                }
                if self.part_repo.find_by_id(&usage.part_id)?.is_none() {
                    return Err(ApiError::NotFound(format!(
                        "Part(id={})不存在",
                        usage.part_id
                    )));
                }
                Ok(PartUsageInput {
                    part_id: usage.part_id.clone(),
                    quantity_used: usage.quantity_used,
                })
            })
            .collect()
    }

    /// OS-{毫秒时间戳}；同一毫秒内重复时顺延
    fn generate_code(&self, now: DateTime<Utc>) -> ApiResult<String> {
        generate_work_order_code(&self.work_order_repo, now)
    }
}

/// 生成未被占用的工单号
pub(crate) fn generate_work_order_code(
    repo: &WorkOrderRepository,
    now: DateTime<Utc>,
) -> ApiResult<String> {
    let mut instant = now;
    loop {
        let code = format!("OS-{}", instant.timestamp_millis());
        if !repo.code_exists(&code)? {
            return Ok(code);
        }
        instant += Duration::milliseconds(1);
    }
}
