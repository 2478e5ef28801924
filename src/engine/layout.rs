// ==========================================
// 设备维护管理系统 - 设备卡片画布布局
// ==========================================
// 职责: 卡片自由拖动与缩放的位置/尺寸计算
// 约束: 存储值为整数；缺失值取默认
// ==========================================

use crate::domain::equipment::CardLayout;
use crate::engine::kpi::round_half_up;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CARD_WIDTH: i32 = 320;
pub const DEFAULT_CARD_HEIGHT: i32 = 280;

pub const MIN_CARD_WIDTH: i32 = 280;
pub const MAX_CARD_WIDTH: i32 = 600;
pub const MIN_CARD_HEIGHT: i32 = 200;
pub const MAX_CARD_HEIGHT: i32 = 500;

/// 单次步进缩放量（像素）
pub const RESIZE_STEP: i32 = 40;

/// 缩放方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    Increase,
    Decrease,
}

/// 生效中的卡片几何（已填充默认值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CardGeometry {
    pub fn from_layout(layout: &CardLayout) -> Self {
        Self {
            x: layout.position_x.unwrap_or(0),
            y: layout.position_y.unwrap_or(0),
            width: layout.card_width.unwrap_or(DEFAULT_CARD_WIDTH),
            height: layout.card_height.unwrap_or(DEFAULT_CARD_HEIGHT),
        }
    }

    pub fn to_layout(self) -> CardLayout {
        CardLayout {
            position_x: Some(self.x),
            position_y: Some(self.y),
            card_width: Some(self.width),
            card_height: Some(self.height),
        }
    }

    /// 按拖动位移移动，结果取整
    pub fn moved_by(self, dx: f64, dy: f64) -> Self {
        Self {
            x: round_half_up(self.x as f64 + dx, 0) as i32,
            y: round_half_up(self.y as f64 + dy, 0) as i32,
            ..self
        }
    }

    /// 步进缩放，宽高分别夹在上下限内
    pub fn resized(self, direction: ResizeDirection) -> Self {
        let (width, height) = match direction {
            ResizeDirection::Increase => (
                (self.width + RESIZE_STEP).min(MAX_CARD_WIDTH),
                (self.height + RESIZE_STEP).min(MAX_CARD_HEIGHT),
            ),
            ResizeDirection::Decrease => (
                (self.width - RESIZE_STEP).max(MIN_CARD_WIDTH),
                (self.height - RESIZE_STEP).max(MIN_CARD_HEIGHT),
            ),
        };
        Self { width, height, ..self }
    }

    /// 指定尺寸（取整并夹紧）
    pub fn with_size(self, width: f64, height: f64) -> Self {
        Self {
            width: (round_half_up(width, 0) as i32).clamp(MIN_CARD_WIDTH, MAX_CARD_WIDTH),
            height: (round_half_up(height, 0) as i32).clamp(MIN_CARD_HEIGHT, MAX_CARD_HEIGHT),
            ..self
        }
    }
}
