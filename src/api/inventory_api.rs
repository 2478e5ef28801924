// ==========================================
// 设备维护管理系统 - 库存 API
// ==========================================
// 职责: 备件台账维护、库存设置/增减、低库存查询
// 约束: 库存不允许为负
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{optional_text, require_non_empty, require_non_negative, ApiError, ApiResult};
use crate::domain::part::{Part, StockStatus};
use crate::engine::{ChangeEvent, OptionalEventPublisher, WatchedTable};
use crate::repository::{EquipmentRepository, PartRepository};

/// 备件新建/编辑请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub equipment_id: Option<String>,
    pub supplier: Option<String>,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
}

/// 带库存状态的备件视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartView {
    #[serde(flatten)]
    pub part: Part,
    pub stock_status: StockStatus,
}

impl From<Part> for PartView {
    fn from(part: Part) -> Self {
        let stock_status = part.stock_status();
        Self { part, stock_status }
    }
}

// ==========================================
// InventoryApi - 库存 API
// ==========================================
pub struct InventoryApi {
    part_repo: Arc<PartRepository>,
    equipment_repo: Arc<EquipmentRepository>,
    publisher: OptionalEventPublisher,
}

impl InventoryApi {
    pub fn new(
        part_repo: Arc<PartRepository>,
        equipment_repo: Arc<EquipmentRepository>,
        publisher: OptionalEventPublisher,
    ) -> Self {
        Self {
            part_repo,
            equipment_repo,
            publisher,
        }
    }

    pub fn create_part(&self, request: PartRequest, now: DateTime<Utc>) -> ApiResult<Part> {
        let part = self.build_part(Uuid::new_v4().to_string(), request, now, now)?;
        self.part_repo.insert(&part)?;

        tracing::info!(part_id = %part.id, code = %part.code, "备件已创建");
        self.publisher.publish(ChangeEvent::insert(WatchedTable::Parts));
        Ok(part)
    }

    pub fn update_part(&self, id: &str, request: PartRequest, now: DateTime<Utc>) -> ApiResult<Part> {
        let existing = self.require_part(id)?;
        let part = self.build_part(existing.id, request, existing.created_at, now)?;
        self.part_repo.update(&part)?;

        tracing::info!(part_id = %part.id, "备件已更新");
        self.publisher.publish(ChangeEvent::update(WatchedTable::Parts));
        Ok(part)
    }

    /// 设置库存绝对值
    pub fn set_stock(&self, id: &str, quantity: i32, now: DateTime<Utc>) -> ApiResult<Part> {
        let quantity = require_non_negative("quantity", quantity)?;
        let mut part = self.require_part(id)?;

        self.part_repo.set_stock(id, quantity, now)?;
        tracing::info!(
            part_id = %id,
            from = part.stock_quantity,
            to = quantity,
            "库存已调整"
        );

        part.stock_quantity = quantity;
        part.updated_at = now;
        self.publisher.publish(ChangeEvent::update(WatchedTable::Parts));
        Ok(part)
    }

    /// 按增量调整库存（+1 / -1 按钮）
    pub fn adjust_stock(&self, id: &str, delta: i32, now: DateTime<Utc>) -> ApiResult<Part> {
        let part = self.require_part(id)?;
        let target = part.stock_quantity.checked_add(delta).ok_or_else(|| {
            ApiError::InvalidInput(format!("库存调整溢出 (part_id={}, delta={})", id, delta))
        })?;
        self.set_stock(id, target, now)
    }

    pub fn get_part(&self, id: &str) -> ApiResult<PartView> {
        Ok(self.require_part(id)?.into())
    }

    /// 全部备件（按名称排序，附库存状态）
    pub fn list_parts(&self) -> ApiResult<Vec<PartView>> {
        Ok(self
            .part_repo
            .list_all()?
            .into_iter()
            .map(PartView::from)
            .collect())
    }

    /// 低库存备件（库存 <= 最低库存，按名称排序）
    pub fn list_low_stock(&self) -> ApiResult<Vec<Part>> {
        Ok(self.part_repo.list_low_stock()?)
    }

    pub fn delete_part(&self, id: &str) -> ApiResult<()> {
        self.part_repo.delete(id)?;
        tracing::info!(part_id = %id, "备件已删除");
        self.publisher.publish(ChangeEvent::delete(WatchedTable::Parts));
        Ok(())
    }

    // ==========================================
    // 辅助
    // ==========================================

    fn require_part(&self, id: &str) -> ApiResult<Part> {
        self.part_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Part(id={})不存在", id)))
    }

    fn build_part(
        &self,
        id: String,
        request: PartRequest,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ApiResult<Part> {
        let equipment_id = optional_text(request.equipment_id);
        if let Some(equipment_id) = &equipment_id {
            if self.equipment_repo.find_by_id(equipment_id)?.is_none() {
                return Err(ApiError::NotFound(format!(
                    "Equipment(id={})不存在",
                    equipment_id
                )));
            }
        }

        Ok(Part {
            id,
            code: require_non_empty("code", &request.code)?,
            name: require_non_empty("name", &request.name)?,
            description: optional_text(request.description),
            equipment_id,
            supplier: optional_text(request.supplier),
            stock_quantity: require_non_negative("stock_quantity", request.stock_quantity)?,
            minimum_stock: require_non_negative("minimum_stock", request.minimum_stock)?,
            created_at,
            updated_at: now,
        })
    }
}
