// ==========================================
// 设备维护管理系统 - 维护人员领域模型
// ==========================================
// 对齐: maintainers 表（certifications 以 JSON 数组存储）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintainer {
    pub id: String,
    pub name: String,
    pub role: Option<String>,    // 职能
    pub contact: Option<String>, // 联系方式
    pub certifications: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
