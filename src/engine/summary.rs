// ==========================================
// 设备维护管理系统 - 驾驶舱汇总引擎
// ==========================================
// 职责: 组合计数指标、可用率、月度序列、告警、最近工单
// 输入: DashboardSnapshot + 评估时刻
// 输出: DashboardStats
// 红线: 纯计算，不读时钟、不做 I/O；同一快照重复计算结果完全一致
// ==========================================

use crate::config::DashboardConfig;
use crate::domain::dashboard::{DashboardSnapshot, DashboardStats, RecentWorkOrder};
use crate::domain::equipment::Equipment;
use crate::domain::types::WorkOrderStatus;
use crate::domain::work_order::WorkOrder;
use crate::engine::alerts::AlertEngine;
use crate::engine::kpi::{round_half_up, KpiEngine};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// 无设备时的可用率
pub const AVAILABILITY_WITHOUT_EQUIPMENT: f64 = 100.0;

/// 设备名缺失时的占位
const EQUIPMENT_PLACEHOLDER: &str = "N/A";

// ==========================================
// DashboardEngine - 驾驶舱汇总引擎
// ==========================================
pub struct DashboardEngine {
    config: DashboardConfig,
    kpi: KpiEngine,
    alerts: AlertEngine,
}

impl DashboardEngine {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            kpi: KpiEngine::with_config(config.clone()),
            alerts: AlertEngine::with_config(config.clone()),
            config,
        }
    }

    /// 基于完整快照计算驾驶舱
    pub fn compute(&self, snapshot: &DashboardSnapshot, now: DateTime<Utc>) -> DashboardStats {
        let orders = &snapshot.work_orders;

        let in_progress_count = count_status(orders, WorkOrderStatus::InProgress);
        let scheduled_count = count_status(orders, WorkOrderStatus::Scheduled);

        let today = now.date_naive();
        let completed_today = orders
            .iter()
            .filter(|wo| {
                wo.status == WorkOrderStatus::Completed
                    && wo.completed_at.map_or(false, |done| done.date_naive() == today)
            })
            .count();

        DashboardStats {
            total_work_orders: orders.len(),
            in_progress_count,
            scheduled_count,
            completed_today,
            availability: self.availability(orders, &snapshot.equipments),
            reliability_series: self.kpi.compute_reliability_series(orders),
            cost_series: self.kpi.compute_cost_series(orders),
            recent_work_orders: self.recent_work_orders(orders, &snapshot.equipments),
            alerts: self.alerts.generate_alerts(orders, &snapshot.low_stock_parts, now),
            generated_at: now,
        }
    }

    /// 可用率 = (设备数 - 停机数) / 设备数 × 100，保留 2 位小数
    ///
    /// 停机数 = 进行中且标记设备停机的工单数
    fn availability(&self, orders: &[WorkOrder], equipments: &[Equipment]) -> f64 {
        if equipments.is_empty() {
            return AVAILABILITY_WITHOUT_EQUIPMENT;
        }

        let machines_down = orders
            .iter()
            .filter(|wo| wo.machine_down && wo.status == WorkOrderStatus::InProgress)
            .count();

        let total = equipments.len() as f64;
        let availability = (total - machines_down as f64) / total * 100.0;
        round_half_up(availability, 2)
    }

    /// 快照顺序中的前 N 条工单
    fn recent_work_orders(&self, orders: &[WorkOrder], equipments: &[Equipment]) -> Vec<RecentWorkOrder> {
        let names: HashMap<&str, &str> = equipments
            .iter()
            .map(|eq| (eq.id.as_str(), eq.name.as_str()))
            .collect();

        orders
            .iter()
            .take(self.config.recent_work_orders_limit)
            .map(|wo| RecentWorkOrder {
                id: wo.id.clone(),
                code: wo.code.clone(),
                equipment: names
                    .get(wo.equipment_id.as_str())
                    .copied()
                    .unwrap_or(EQUIPMENT_PLACEHOLDER)
                    .to_string(),
                maintenance_type: wo.maintenance_type,
                status: wo.status,
                priority: wo.priority,
            })
            .collect()
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

fn count_status(orders: &[WorkOrder], status: WorkOrderStatus) -> usize {
    orders.iter().filter(|wo| wo.status == status).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::CardLayout;
    use crate::domain::types::{Criticality, MaintenanceType, Priority};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn equipment(id: &str, name: &str) -> Equipment {
        Equipment {
            id: id.to_string(),
            code: id.to_string(),
            name: name.to_string(),
            description: None,
            location: None,
            manufacturer: None,
            acquisition_date: None,
            parent_id: None,
            layout: CardLayout::default(),
            criticality: Criticality::None,
            custom_color: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn order(code: &str, equipment_id: &str, status: WorkOrderStatus) -> WorkOrder {
        WorkOrder {
            id: code.to_string(),
            code: code.to_string(),
            equipment_id: equipment_id.to_string(),
            maintenance_type: MaintenanceType::Corrective,
            status,
            priority: Priority::High,
            scheduled_date: now() + Duration::days(1),
            started_at: None,
            completed_at: None,
            machine_down: false,
            description: None,
            created_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = DashboardEngine::default().compute(&DashboardSnapshot::default(), now());
        assert_eq!(stats.total_work_orders, 0);
        assert_eq!(stats.availability, 100.0);
        assert_eq!(stats.reliability_series.len(), 6);
        assert_eq!(stats.cost_series.len(), 6);
        assert!(stats.alerts.is_empty());
        assert!(stats.recent_work_orders.is_empty());
        assert_eq!(stats.generated_at, now());
    }

    #[test]
    fn test_counters_and_availability() {
        let mut down = order("OS-1", "E1", WorkOrderStatus::InProgress);
        down.machine_down = true;
        let mut done_today = order("OS-2", "E2", WorkOrderStatus::Completed);
        done_today.completed_at = Some(now() - Duration::hours(1));
        let mut done_yesterday = order("OS-3", "E2", WorkOrderStatus::Completed);
        done_yesterday.completed_at = Some(now() - Duration::days(1));
        let scheduled = order("OS-4", "missing", WorkOrderStatus::Scheduled);

        let snapshot = DashboardSnapshot {
            work_orders: vec![down, done_today, done_yesterday, scheduled],
            low_stock_parts: vec![],
            equipments: vec![equipment("E1", "Prensa"), equipment("E2", "Torno"), equipment("E3", "Fresa")],
        };

        let stats = DashboardEngine::default().compute(&snapshot, now());
        assert_eq!(stats.total_work_orders, 4);
        assert_eq!(stats.in_progress_count, 1);
        assert_eq!(stats.scheduled_count, 1);
        assert_eq!(stats.completed_today, 1);
        // 2/3 → 66.67
        assert_eq!(stats.availability, 66.67);

        assert_eq!(stats.recent_work_orders.len(), 3);
        assert_eq!(stats.recent_work_orders[0].equipment, "Prensa");
        assert_eq!(stats.recent_work_orders[2].code, "OS-3");
    }

    #[test]
    fn test_unknown_equipment_placeholder() {
        let snapshot = DashboardSnapshot {
            work_orders: vec![order("OS-9", "missing", WorkOrderStatus::Scheduled)],
            low_stock_parts: vec![],
            equipments: vec![],
        };

        let stats = DashboardEngine::default().compute(&snapshot, now());
        assert_eq!(stats.recent_work_orders[0].equipment, "N/A");
    }

    #[test]
    fn test_compute_is_idempotent() {
        let snapshot = DashboardSnapshot {
            work_orders: vec![order("OS-1", "E1", WorkOrderStatus::Scheduled)],
            low_stock_parts: vec![],
            equipments: vec![equipment("E1", "Prensa")],
        };
        let engine = DashboardEngine::default();
        let first = serde_json::to_value(engine.compute(&snapshot, now())).unwrap();
        let second = serde_json::to_value(engine.compute(&snapshot, now())).unwrap();
        assert_eq!(first, second);
    }
}
