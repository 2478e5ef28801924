// ==========================================
// 设备维护管理系统 - 维护人员 API
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{optional_text, require_non_empty, ApiError, ApiResult};
use crate::domain::maintainer::Maintainer;
use crate::engine::{ChangeEvent, OptionalEventPublisher, WatchedTable};
use crate::repository::MaintainerRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintainerRequest {
    pub name: String,
    pub role: Option<String>,
    pub contact: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

pub struct MaintainerApi {
    maintainer_repo: Arc<MaintainerRepository>,
    publisher: OptionalEventPublisher,
}

impl MaintainerApi {
    pub fn new(maintainer_repo: Arc<MaintainerRepository>, publisher: OptionalEventPublisher) -> Self {
        Self {
            maintainer_repo,
            publisher,
        }
    }

    pub fn create_maintainer(
        &self,
        request: MaintainerRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<Maintainer> {
        let maintainer = Maintainer {
            id: Uuid::new_v4().to_string(),
            name: require_non_empty("name", &request.name)?,
            role: optional_text(request.role),
            contact: optional_text(request.contact),
            certifications: clean_certifications(request.certifications),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.maintainer_repo.insert(&maintainer)?;

        tracing::info!(maintainer_id = %maintainer.id, "维护人员已创建");
        self.publisher
            .publish(ChangeEvent::insert(WatchedTable::Maintainers));
        Ok(maintainer)
    }

    pub fn update_maintainer(
        &self,
        id: &str,
        request: MaintainerRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<Maintainer> {
        let mut maintainer = self.require_maintainer(id)?;
        maintainer.name = require_non_empty("name", &request.name)?;
        maintainer.role = optional_text(request.role);
        maintainer.contact = optional_text(request.contact);
        maintainer.certifications = clean_certifications(request.certifications);
        maintainer.updated_at = now;

        self.maintainer_repo.update(&maintainer)?;
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::Maintainers));
        Ok(maintainer)
    }

    /// 启用/停用
    pub fn set_active(&self, id: &str, active: bool, now: DateTime<Utc>) -> ApiResult<Maintainer> {
        let mut maintainer = self.require_maintainer(id)?;
        maintainer.active = active;
        maintainer.updated_at = now;

        self.maintainer_repo.update(&maintainer)?;
        tracing::info!(maintainer_id = %id, active, "维护人员状态已变更");
        self.publisher
            .publish(ChangeEvent::update(WatchedTable::Maintainers));
        Ok(maintainer)
    }

    /// 按姓名排序；`active_only` 为 true 时只返回在岗人员
    pub fn list_maintainers(&self, active_only: bool) -> ApiResult<Vec<Maintainer>> {
        Ok(self.maintainer_repo.list(active_only)?)
    }

    pub fn get_maintainer(&self, id: &str) -> ApiResult<Maintainer> {
        self.require_maintainer(id)
    }

    fn require_maintainer(&self, id: &str) -> ApiResult<Maintainer> {
        self.maintainer_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Maintainer(id={})不存在", id)))
    }
}

fn clean_certifications(certifications: Vec<String>) -> Vec<String> {
    certifications
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
