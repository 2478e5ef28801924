// ==========================================
// 设备维护管理系统 - 驾驶舱计算参数
// ==========================================
// 职责: 聚合算法使用的全部常量（成本单价/缺省工时/告警上限等）
// 说明: 以具名字段承载，可通过 config_kv 覆写，算法本身不含魔数
// ==========================================

use serde::{Deserialize, Serialize};

/// 预防性工单单价
pub const DEFAULT_PREVENTIVE_UNIT_COST: f64 = 2500.0;
/// 纠正性工单单价
pub const DEFAULT_CORRECTIVE_UNIT_COST: f64 = 4500.0;
/// 缺少开始/完成时间时计入的维修工时（小时）
pub const DEFAULT_REPAIR_HOURS: f64 = 4.0;
/// 无故障月份的可靠性指标（小时）
pub const DEFAULT_RELIABILITY_HOURS: f64 = 720.0;
/// 单月运行时间（30 天 × 24 小时）
pub const DEFAULT_PERIOD_HOURS: f64 = 30.0 * 24.0;
/// 近期完工告警回看窗口（小时）
pub const DEFAULT_RECENT_COMPLETION_WINDOW_HOURS: i64 = 24;
/// 告警条数上限
pub const DEFAULT_MAX_ALERTS: usize = 3;
/// 驾驶舱最近工单条数
pub const DEFAULT_RECENT_WORK_ORDERS_LIMIT: usize = 3;

/// 驾驶舱计算参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    // ===== 成本 =====
    pub preventive_unit_cost: f64,
    pub corrective_unit_cost: f64,

    // ===== 可靠性 =====
    pub default_repair_hours: f64,
    pub default_reliability_hours: f64,
    pub period_hours: f64,

    // ===== 告警 =====
    pub recent_completion_window_hours: i64,
    pub max_alerts: usize,
    pub alert_locale: String,

    // ===== 展示 =====
    pub recent_work_orders_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preventive_unit_cost: DEFAULT_PREVENTIVE_UNIT_COST,
            corrective_unit_cost: DEFAULT_CORRECTIVE_UNIT_COST,
            default_repair_hours: DEFAULT_REPAIR_HOURS,
            default_reliability_hours: DEFAULT_RELIABILITY_HOURS,
            period_hours: DEFAULT_PERIOD_HOURS,
            recent_completion_window_hours: DEFAULT_RECENT_COMPLETION_WINDOW_HOURS,
            max_alerts: DEFAULT_MAX_ALERTS,
            alert_locale: crate::i18n::DEFAULT_LOCALE.to_string(),
            recent_work_orders_limit: DEFAULT_RECENT_WORK_ORDERS_LIMIT,
        }
    }
}
