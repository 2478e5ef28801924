// ==========================================
// 设备维护管理系统 - 设备台账 API
// ==========================================
// 职责: 设备 CRUD、画布卡片移动/缩放、上下级关系
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{optional_text, require_non_empty, ApiError, ApiResult};
use crate::domain::equipment::{CardLayout, Equipment};
use crate::domain::types::Criticality;
use crate::engine::{
    build_equipment_tree, would_create_cycle, CardGeometry, ChangeEvent, EquipmentNode,
    OptionalEventPublisher, ResizeDirection, WatchedTable,
};
use crate::repository::EquipmentRepository;

/// 设备新建/编辑请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    #[serde(default)]
    pub criticality: Criticality,
    pub custom_color: Option<String>,
}

// ==========================================
// EquipmentApi - 设备台账 API
// ==========================================
pub struct EquipmentApi {
    equipment_repo: Arc<EquipmentRepository>,
    publisher: OptionalEventPublisher,
}

impl EquipmentApi {
    pub fn new(equipment_repo: Arc<EquipmentRepository>, publisher: OptionalEventPublisher) -> Self {
        Self {
            equipment_repo,
            publisher,
        }
    }

    // ==========================================
    // 台账
    // ==========================================

    /// 新建设备（可指定上级，布局取默认）
    pub fn create_equipment(
        &self,
        request: EquipmentRequest,
        parent_id: Option<String>,
        now: DateTime<Utc>,
    ) -> ApiResult<Equipment> {
        let parent_id = optional_text(parent_id);
        if let Some(parent) = &parent_id {
            self.require_equipment(parent)?;
        }

        let equipment = Equipment {
            id: Uuid::new_v4().to_string(),
            code: require_non_empty("code", &request.code)?,
            name: require_non_empty("name", &request.name)?,
            description: optional_text(request.description),
            location: optional_text(request.location),
            manufacturer: optional_text(request.manufacturer),
            acquisition_date: request.acquisition_date,
            parent_id,
            layout: CardLayout::default(),
            criticality: request.criticality,
            custom_color: optional_text(request.custom_color),
            created_at: now,
            updated_at: now,
        };
        self.equipment_repo.insert(&equipment)?;

        tracing::info!(equipment_id = %equipment.id, code = %equipment.code, "设备已创建");
        self.publisher
            .publish(ChangeEvent::insert(WatchedTable::Equipments));
        Ok(equipment)
    }

    pub fn update_equipment(
        &self,
        id: &str,
        request: EquipmentRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<Equipment> {
        let mut equipment = self.require_equipment(id)?;
        equipment.code = require_non_empty("code", &request.code)?;
        equipment.name = require_non_empty("name", &request.name)?;
        equipment.description = optional_text(request.description);
        equipment.location = optional_text(request.location);
        equipment.manufacturer = optional_text(request.manufacturer);
        equipment.acquisition_date = request.acquisition_date;
        equipment.criticality = request.criticality;
        equipment.custom_color = optional_text(request.custom_color);
        equipment.updated_at = now;

        self.equipment_repo.update(&equipment)?;
        tracing::info!(equipment_id = %id, "设备已更新");
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::Equipments));
        Ok(equipment)
    }

    pub fn delete_equipment(&self, id: &str) -> ApiResult<()> {
        self.equipment_repo.delete(id)?;
        tracing::info!(equipment_id = %id, "设备已删除");
        self.publisher
            .publish(ChangeEvent::delete(WatchedTable::Equipments));
        Ok(())
    }

    pub fn get_equipment(&self, id: &str) -> ApiResult<Equipment> {
        self.require_equipment(id)
    }

    /// 全部设备（按编码排序）
    pub fn list_equipments(&self) -> ApiResult<Vec<Equipment>> {
        Ok(self.equipment_repo.list_all()?)
    }

    // ==========================================
    // 画布布局
    // ==========================================

    /// 按拖动位移移动卡片
    pub fn move_card(&self, id: &str, dx: f64, dy: f64, now: DateTime<Utc>) -> ApiResult<CardGeometry> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(ApiError::InvalidInput(format!(
                "拖动位移无效: dx={}, dy={}",
                dx, dy
            )));
        }
        self.apply_geometry(id, now, |geometry| geometry.moved_by(dx, dy))
    }

    /// 步进缩放
    pub fn resize_card(
        &self,
        id: &str,
        direction: ResizeDirection,
        now: DateTime<Utc>,
    ) -> ApiResult<CardGeometry> {
        self.apply_geometry(id, now, |geometry| geometry.resized(direction))
    }

    /// 指定尺寸
    pub fn set_card_size(
        &self,
        id: &str,
        width: f64,
        height: f64,
        now: DateTime<Utc>,
    ) -> ApiResult<CardGeometry> {
        if !width.is_finite() || !height.is_finite() {
            return Err(ApiError::InvalidInput(format!(
                "卡片尺寸无效: width={}, height={}",
                width, height
            )));
        }
        self.apply_geometry(id, now, |geometry| geometry.with_size(width, height))
    }

    fn apply_geometry<F>(&self, id: &str, now: DateTime<Utc>, change: F) -> ApiResult<CardGeometry>
    where
        F: FnOnce(CardGeometry) -> CardGeometry,
    {
        let equipment = self.require_equipment(id)?;
        let geometry = change(CardGeometry::from_layout(&equipment.layout));

        self.equipment_repo
            .update_layout(id, &geometry.to_layout(), now)?;
        tracing::debug!(
            equipment_id = %id,
            x = geometry.x,
            y = geometry.y,
            width = geometry.width,
            height = geometry.height,
            "卡片布局已保存"
        );
        Ok(geometry)
    }

    // ==========================================
    // 层级
    // ==========================================

    /// 设置/清除上级设备，拒绝形成环
    pub fn set_parent(
        &self,
        id: &str,
        parent_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> ApiResult<Equipment> {
        let mut equipment = self.require_equipment(id)?;
        let parent_id = parent_id.map(str::trim).filter(|p| !p.is_empty());

        if let Some(parent) = parent_id {
            self.require_equipment(parent)?;
            let all = self.equipment_repo.list_all()?;
            if would_create_cycle(&all, id, parent) {
                return Err(ApiError::BusinessRuleViolation(format!(
                    "设备层级成环: equipment={}, parent={}",
                    id, parent
                )));
            }
        }

        self.equipment_repo.set_parent(id, parent_id, now)?;
        equipment.parent_id = parent_id.map(str::to_string);
        equipment.updated_at = now;

        tracing::info!(equipment_id = %id, parent_id = ?parent_id, "设备上级已变更");
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::Equipments));
        Ok(equipment)
    }

    /// 设备树（同级按编码排序）
    pub fn get_equipment_tree(&self) -> ApiResult<Vec<EquipmentNode>> {
        let all = self.equipment_repo.list_all()?;
        Ok(build_equipment_tree(&all))
    }

    fn require_equipment(&self, id: &str) -> ApiResult<Equipment> {
        self.equipment_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Equipment(id={})不存在", id)))
    }
}
