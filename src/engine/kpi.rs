// ==========================================
// 设备维护管理系统 - 可靠性与成本聚合引擎
// ==========================================
// 职责: 驾驶舱月度序列（近似 MTBF/MTTR、按维护类型的成本）
// 输入: 工单快照（任意顺序、任意规模）
// 输出: 固定 6 个月桶的序列，按日历顺序
// ==========================================
// 分桶规则: 按创建时间（UTC）的月份序号匹配桶位置，不区分年份。
// 不同年份的同月工单会落入同一个桶；7-12 月的工单不落入任何桶。
// ==========================================

use crate::config::DashboardConfig;
use crate::domain::dashboard::{CostPoint, ReliabilityPoint};
use crate::domain::types::MaintenanceType;
use crate::domain::work_order::WorkOrder;
use chrono::Datelike;

/// 月桶标签（桶位置 = 月份序号，0 = 一月）
pub const MONTH_LABELS: [&str; 6] = ["Jan", "Fev", "Mar", "Abr", "Mai", "Jun"];

/// 按 floor(x * 10^d + 0.5) / 10^d 取整（负数同样向上取半）
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

// ==========================================
// KpiEngine - 可靠性与成本聚合引擎
// ==========================================
pub struct KpiEngine {
    config: DashboardConfig,
}

impl KpiEngine {
    /// 使用默认参数构造
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算月度可靠性序列
    ///
    /// # 规则
    /// - 平均维修时长: 桶内纠正性工单 (完成 - 开始) 小时数的均值，
    ///   缺少任一时间的工单按缺省工时计入；桶内无纠正性工单时取缺省工时
    /// - 可靠性: 单月运行小时 / 纠正性工单数；无纠正性工单时取缺省值
    ///
    /// # 返回
    /// 恰好 6 条记录，按 MONTH_LABELS 顺序
    pub fn compute_reliability_series(&self, work_orders: &[WorkOrder]) -> Vec<ReliabilityPoint> {
        let buckets = bucket_by_month(work_orders);

        MONTH_LABELS
            .iter()
            .zip(buckets.iter())
            .map(|(label, orders)| {
                let corrective: Vec<&WorkOrder> = orders
                    .iter()
                    .copied()
                    .filter(|wo| wo.maintenance_type == MaintenanceType::Corrective)
                    .collect();

                let mean_repair_hours = self.mean_repair_hours(&corrective);
                let reliability_hours = if corrective.is_empty() {
                    self.config.default_reliability_hours
                } else {
                    self.config.period_hours / corrective.len() as f64
                };

                ReliabilityPoint {
                    month: label.to_string(),
                    reliability_hours: round_half_up(reliability_hours, 0) as i64,
                    mean_repair_hours: round_half_up(mean_repair_hours, 1),
                }
            })
            .collect()
    }

    /// 计算月度成本序列
    ///
    /// 成本 = 工单数 × 配置单价（实体不含成本字段，预测性工单不计成本）
    pub fn compute_cost_series(&self, work_orders: &[WorkOrder]) -> Vec<CostPoint> {
        let buckets = bucket_by_month(work_orders);

        MONTH_LABELS
            .iter()
            .zip(buckets.iter())
            .map(|(label, orders)| {
                let preventive = count_of_type(orders, MaintenanceType::Preventive);
                let corrective = count_of_type(orders, MaintenanceType::Corrective);

                CostPoint {
                    month: label.to_string(),
                    preventive_cost: preventive as f64 * self.config.preventive_unit_cost,
                    corrective_cost: corrective as f64 * self.config.corrective_unit_cost,
                }
            })
            .collect()
    }

    // ==========================================
    // 指标计算
    // ==========================================

    fn mean_repair_hours(&self, corrective: &[&WorkOrder]) -> f64 {
        if corrective.is_empty() {
            return self.config.default_repair_hours;
        }

        let total: f64 = corrective
            .iter()
            .map(|wo| wo.repair_hours().unwrap_or(self.config.default_repair_hours))
            .sum();

        total / corrective.len() as f64
    }
}

impl Default for KpiEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 按创建月份分入 6 个桶（保持输入顺序）
fn bucket_by_month(work_orders: &[WorkOrder]) -> [Vec<&WorkOrder>; 6] {
    let mut buckets: [Vec<&WorkOrder>; 6] = Default::default();
    for wo in work_orders {
        let month0 = wo.created_at.month0() as usize;
        if let Some(bucket) = buckets.get_mut(month0) {
            bucket.push(wo);
        }
    }
    buckets
}

fn count_of_type(orders: &[&WorkOrder], maintenance_type: MaintenanceType) -> usize {
    orders
        .iter()
        .filter(|wo| wo.maintenance_type == maintenance_type)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Priority, WorkOrderStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn order(
        maintenance_type: MaintenanceType,
        created_at: DateTime<Utc>,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> WorkOrder {
        WorkOrder {
            id: uuid::Uuid::new_v4().to_string(),
            code: "OS-1".to_string(),
            equipment_id: "EQ1".to_string(),
            maintenance_type,
            status: WorkOrderStatus::Completed,
            priority: Priority::Medium,
            scheduled_date: created_at,
            started_at,
            completed_at,
            machine_down: false,
            description: None,
            created_by: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.45, 1), 2.5);
        assert_eq!(round_half_up(240.0, 0), 240.0);
        assert_eq!(round_half_up(-2.5, 0), -2.0);
        assert_eq!(round_half_up(98.7651, 2), 98.77);
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        let engine = KpiEngine::new();

        let reliability = engine.compute_reliability_series(&[]);
        assert_eq!(reliability.len(), 6);
        for (point, label) in reliability.iter().zip(MONTH_LABELS.iter()) {
            assert_eq!(point.month, *label);
            assert_eq!(point.reliability_hours, 720);
            assert_eq!(point.mean_repair_hours, 4.0);
        }

        let cost = engine.compute_cost_series(&[]);
        assert_eq!(cost.len(), 6);
        assert!(cost.iter().all(|c| c.preventive_cost == 0.0 && c.corrective_cost == 0.0));
    }

    #[test]
    fn test_missing_timestamps_contribute_default_hours() {
        let engine = KpiEngine::new();
        let orders = vec![
            // 10 小时
            order(
                MaintenanceType::Corrective,
                ts(2024, 2, 1, 0),
                Some(ts(2024, 2, 1, 0)),
                Some(ts(2024, 2, 1, 10)),
            ),
            // 无完成时间 → 4 小时
            order(MaintenanceType::Corrective, ts(2024, 2, 3, 0), Some(ts(2024, 2, 3, 0)), None),
        ];

        let series = engine.compute_reliability_series(&orders);
        assert_eq!(series[1].mean_repair_hours, 7.0);
        assert_eq!(series[1].reliability_hours, 360);
    }

    #[test]
    fn test_orders_after_june_fall_in_no_bucket() {
        let engine = KpiEngine::new();
        let orders = vec![order(MaintenanceType::Corrective, ts(2024, 7, 1, 0), None, None)];

        let series = engine.compute_reliability_series(&orders);
        assert!(series.iter().all(|p| p.reliability_hours == 720));

        let cost = engine.compute_cost_series(&orders);
        assert!(cost.iter().all(|c| c.corrective_cost == 0.0));
    }

    #[test]
    fn test_custom_unit_costs() {
        let config = DashboardConfig {
            preventive_unit_cost: 100.0,
            corrective_unit_cost: 300.0,
            ..DashboardConfig::default()
        };
        let engine = KpiEngine::with_config(config);
        let orders = vec![
            order(MaintenanceType::Preventive, ts(2024, 1, 5, 0), None, None),
            order(MaintenanceType::Corrective, ts(2024, 1, 6, 0), None, None),
            order(MaintenanceType::Predictive, ts(2024, 1, 7, 0), None, None),
        ];

        let cost = engine.compute_cost_series(&orders);
        assert_eq!(cost[0].preventive_cost, 100.0);
        assert_eq!(cost[0].corrective_cost, 300.0);
    }
}
