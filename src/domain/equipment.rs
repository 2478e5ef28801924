// ==========================================
// 设备维护管理系统 - 设备领域模型
// ==========================================
// 对齐: equipments 表
// 设备以卡片形式摆放在画布上（位置/尺寸可为空，取默认值）
// ==========================================

use crate::domain::types::Criticality;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Equipment - 设备
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub code: String, // 设备编码（唯一）
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub acquisition_date: Option<NaiveDate>,

    // ===== 层级 =====
    pub parent_id: Option<String>, // 上级设备

    // ===== 画布卡片 =====
    #[serde(flatten)]
    pub layout: CardLayout,
    pub criticality: Criticality,
    pub custom_color: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// CardLayout - 卡片位置与尺寸（存储值）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardLayout {
    pub position_x: Option<i32>,
    pub position_y: Option<i32>,
    pub card_width: Option<i32>,
    pub card_height: Option<i32>,
}
