// ==========================================
// 设备维护管理系统 - 申请 API
// ==========================================
// 维护申请: 提交 → 审核（批准生成纠正性工单 / 驳回需原因）
// 采购申请: 看板列之间自由移动
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{optional_text, require_non_empty, ApiError, ApiResult};
use crate::api::work_order_api::generate_work_order_code;
use crate::domain::request::{MaintenanceRequest, PurchaseRequest};
use crate::domain::types::{
    MaintenanceRequestStatus, MaintenanceType, Priority, PurchaseRequestStatus, WorkOrderStatus,
};
use crate::domain::work_order::WorkOrder;
use crate::engine::{ChangeEvent, OptionalEventPublisher, WatchedTable};
use crate::i18n;
use crate::repository::{
    EquipmentRepository, MaintenanceRequestRepository, PurchaseRequestRepository,
    WorkOrderRepository,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitMaintenanceRequest {
    pub equipment_id: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub requested_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePurchaseRequest {
    pub request_number: String,
    pub description: String,
    pub equipment_id: Option<String>,
    pub created_by: Option<String>,
}

/// 审批结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    pub request: MaintenanceRequest,
    pub work_order: WorkOrder,
}

/// 看板列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub status: PurchaseRequestStatus,
    pub requests: Vec<PurchaseRequest>,
}

// ==========================================
// RequestApi - 申请 API
// ==========================================
pub struct RequestApi {
    maintenance_repo: Arc<MaintenanceRequestRepository>,
    purchase_repo: Arc<PurchaseRequestRepository>,
    work_order_repo: Arc<WorkOrderRepository>,
    equipment_repo: Arc<EquipmentRepository>,
    publisher: OptionalEventPublisher,
}

impl RequestApi {
    pub fn new(
        maintenance_repo: Arc<MaintenanceRequestRepository>,
        purchase_repo: Arc<PurchaseRequestRepository>,
        work_order_repo: Arc<WorkOrderRepository>,
        equipment_repo: Arc<EquipmentRepository>,
        publisher: OptionalEventPublisher,
    ) -> Self {
        Self {
            maintenance_repo,
            purchase_repo,
            work_order_repo,
            equipment_repo,
            publisher,
        }
    }

    // ==========================================
    // 维护申请
    // ==========================================

    pub fn submit_maintenance_request(
        &self,
        request: SubmitMaintenanceRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<MaintenanceRequest> {
        let equipment_id = require_non_empty("equipment_id", &request.equipment_id)?;
        self.ensure_equipment_exists(&equipment_id)?;

        let maintenance_request = MaintenanceRequest {
            id: Uuid::new_v4().to_string(),
            equipment_id,
            description: require_non_empty("description", &request.description)?,
            priority: request.priority,
            status: MaintenanceRequestStatus::Pending,
            requested_by: optional_text(request.requested_by),
            requested_at: now,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            work_order_id: None,
            created_at: now,
            updated_at: now,
        };
        self.maintenance_repo.insert(&maintenance_request)?;

        tracing::info!(
            request_id = %maintenance_request.id,
            equipment_id = %maintenance_request.equipment_id,
            priority = %maintenance_request.priority,
            "维护申请已提交"
        );
        self.publisher
            .publish(ChangeEvent::insert(WatchedTable::MaintenanceRequests));
        Ok(maintenance_request)
    }

    /// 批准维护申请并生成纠正性工单
    ///
    /// 工单描述按 `locale` 本地化；紧急申请的工单标记为停机
    pub fn approve_maintenance_request(
        &self,
        id: &str,
        reviewer: &str,
        locale: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<ApprovalOutcome> {
        let mut request = self.require_pending(id)?;
        let reviewer = require_non_empty("reviewer", reviewer)?;

        let description = i18n::t_in_with_args(
            locale,
            "requests.approved_description",
            &[("description", request.description.as_str())],
        );
        let work_order = WorkOrder {
            id: Uuid::new_v4().to_string(),
            code: generate_work_order_code(&self.work_order_repo, now)?,
            equipment_id: request.equipment_id.clone(),
            maintenance_type: MaintenanceType::Corrective,
            status: WorkOrderStatus::Scheduled,
            priority: request.priority,
            scheduled_date: now,
            started_at: None,
            completed_at: None,
            machine_down: request.priority == Priority::Critical,
            description: Some(description),
            created_by: Some(reviewer.clone()),
            created_at: now,
            updated_at: now,
        };
        self.work_order_repo.insert(&work_order, &[], &[])?;

        let recorded = self.maintenance_repo.record_review(
            id,
            MaintenanceRequestStatus::Approved,
            Some(&reviewer),
            now,
            None,
            Some(&work_order.id),
        );
        match recorded {
            Ok(true) => {}
            Ok(false) => {
                // 并发审核: 回收刚生成的工单
                self.work_order_repo.delete(&work_order.id)?;
                return Err(ApiError::BusinessRuleViolation(format!(
                    "维护申请已被审核: id={}",
                    id
                )));
            }
            Err(e) => {
                // 审核写入失败: 回收刚生成的工单后返回原错误
                if let Err(cleanup) = self.work_order_repo.delete(&work_order.id) {
                    tracing::error!(
                        work_order_id = %work_order.id,
                        error = %cleanup,
                        "回收工单失败"
                    );
                }
                return Err(e.into());
            }
        }

        request.status = MaintenanceRequestStatus::Approved;
        request.reviewed_by = Some(reviewer);
        request.reviewed_at = Some(now);
        request.work_order_id = Some(work_order.id.clone());
        request.updated_at = now;

        tracing::info!(
            request_id = %id,
            work_order_id = %work_order.id,
            code = %work_order.code,
            "维护申请已批准"
        );
        self.publisher
            .publish(ChangeEvent::insert(WatchedTable::WorkOrders));
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::MaintenanceRequests));

        Ok(ApprovalOutcome {
            request,
            work_order,
        })
    }

    /// 驳回维护申请（必须填写原因）
    pub fn reject_maintenance_request(
        &self,
        id: &str,
        reviewer: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<MaintenanceRequest> {
        let reason = require_non_empty("rejection_reason", reason)?;
        let reviewer = require_non_empty("reviewer", reviewer)?;
        let mut request = self.require_pending(id)?;

        let recorded = self.maintenance_repo.record_review(
            id,
            MaintenanceRequestStatus::Rejected,
            Some(&reviewer),
            now,
            Some(&reason),
            None,
        )?;
        if !recorded {
            return Err(ApiError::BusinessRuleViolation(format!(
                "维护申请已被审核: id={}",
                id
            )));
        }

        request.status = MaintenanceRequestStatus::Rejected;
        request.reviewed_by = Some(reviewer);
        request.reviewed_at = Some(now);
        request.rejection_reason = Some(reason);
        request.updated_at = now;

        tracing::info!(request_id = %id, "维护申请已驳回");
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::MaintenanceRequests));
        Ok(request)
    }

    /// 待审核申请（最新在前）
    pub fn list_pending_requests(&self) -> ApiResult<Vec<MaintenanceRequest>> {
        self.list_requests_by_status(MaintenanceRequestStatus::Pending)
    }

    pub fn list_requests_by_status(
        &self,
        status: MaintenanceRequestStatus,
    ) -> ApiResult<Vec<MaintenanceRequest>> {
        Ok(self.maintenance_repo.list_by_status(status)?)
    }

    pub fn get_maintenance_request(&self, id: &str) -> ApiResult<MaintenanceRequest> {
        self.maintenance_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("MaintenanceRequest(id={})不存在", id)))
    }

    // ==========================================
    // 采购申请
    // ==========================================

    pub fn create_purchase_request(
        &self,
        request: CreatePurchaseRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<PurchaseRequest> {
        let request_number = require_non_empty("request_number", &request.request_number)?;
        if self.purchase_repo.exists_by_number(&request_number)? {
            return Err(ApiError::BusinessRuleViolation(format!(
                "采购申请编号已存在: {}",
                request_number
            )));
        }
        let equipment_id = optional_text(request.equipment_id);
        if let Some(equipment_id) = &equipment_id {
            self.ensure_equipment_exists(equipment_id)?;
        }

        let purchase = PurchaseRequest {
            id: Uuid::new_v4().to_string(),
            request_number,
            description: require_non_empty("description", &request.description)?,
            equipment_id,
            status: PurchaseRequestStatus::Pending,
            created_by: optional_text(request.created_by),
            created_at: now,
            updated_at: now,
        };
        self.purchase_repo.insert(&purchase)?;

        tracing::info!(
            purchase_id = %purchase.id,
            request_number = %purchase.request_number,
            "采购申请已创建"
        );
        self.publisher
            .publish(ChangeEvent::insert(WatchedTable::PurchaseRequests));
        Ok(purchase)
    }

    /// 将采购申请移动到指定看板列
    pub fn move_purchase_request(
        &self,
        id: &str,
        status: PurchaseRequestStatus,
        now: DateTime<Utc>,
    ) -> ApiResult<PurchaseRequest> {
        let mut purchase = self.require_purchase(id)?;
        if purchase.status == status {
            return Ok(purchase);
        }

        self.purchase_repo.update_status(id, status, now)?;
        tracing::info!(
            purchase_id = %id,
            from = %purchase.status,
            to = %status,
            "采购申请状态已变更"
        );

        purchase.status = status;
        purchase.updated_at = now;
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::PurchaseRequests));
        Ok(purchase)
    }

    pub fn list_purchase_requests(
        &self,
        status: PurchaseRequestStatus,
    ) -> ApiResult<Vec<PurchaseRequest>> {
        Ok(self.purchase_repo.list_by_status(status)?)
    }

    /// 完整看板（每个状态一列，列内最新在前）
    pub fn get_purchase_kanban(&self) -> ApiResult<Vec<KanbanColumn>> {
        PurchaseRequestStatus::ALL
            .iter()
            .map(|status| {
                Ok(KanbanColumn {
                    status: *status,
                    requests: self.purchase_repo.list_by_status(*status)?,
                })
            })
            .collect()
    }

    // ==========================================
    // 辅助
    // ==========================================

    fn require_pending(&self, id: &str) -> ApiResult<MaintenanceRequest> {
        let request = self.get_maintenance_request(id)?;
        if request.status != MaintenanceRequestStatus::Pending {
            return Err(ApiError::BusinessRuleViolation(format!(
                "维护申请已被审核: id={}, status={}",
                id, request.status
            )));
        }
        Ok(request)
    }

    fn require_purchase(&self, id: &str) -> ApiResult<PurchaseRequest> {
        self.purchase_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("PurchaseRequest(id={})不存在", id)))
    }

    fn ensure_equipment_exists(&self, equipment_id: &str) -> ApiResult<()> {
        if self.equipment_repo.find_by_id(equipment_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Equipment(id={})不存在",
                equipment_id
            )));
        }
        Ok(())
    }
}
