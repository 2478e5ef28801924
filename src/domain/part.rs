// ==========================================
// 设备维护管理系统 - 备件领域模型
// ==========================================
// 对齐: parts 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Part - 备件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub equipment_id: Option<String>,
    pub supplier: Option<String>,

    // ===== 库存 =====
    pub stock_quantity: i32, // 当前库存
    pub minimum_stock: i32,  // 最低库存

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Part {
    /// 库存是否处于或低于最低库存
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.minimum_stock
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.stock_quantity == 0 {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}

// ==========================================
// StockStatus - 库存状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock, // 无库存
    Low,        // 库存不足
    Normal,     // 正常
}
