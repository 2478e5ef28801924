// ==========================================
// 设备维护管理系统 - 驾驶舱告警引擎
// ==========================================
// 职责: 按固定优先级生成至多 N 条告警（默认 3 条）
// 输入: 工单快照 + 低库存备件（已由调用方过滤）+ 评估时刻
// 输出: 可直接展示的告警（类型/标题/描述/图标键）
// ==========================================
// 优先级（各条件相互独立）:
//   1. 低库存        → warning
//   2. 计划工单逾期  → info
//   3. 近期完工      → success
// ==========================================

use crate::config::DashboardConfig;
use crate::domain::dashboard::{Alert, AlertIcon, AlertKind};
use crate::domain::part::Part;
use crate::domain::types::WorkOrderStatus;
use crate::domain::work_order::WorkOrder;
use crate::i18n::t_in_with_args;
use chrono::{DateTime, Duration, Utc};

// ==========================================
// AlertEngine - 告警引擎
// ==========================================
pub struct AlertEngine {
    config: DashboardConfig,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// 生成告警
    ///
    /// # 参数
    /// - `work_orders`: 工单快照
    /// - `low_stock_parts`: 低库存备件（只取第一条）
    /// - `now`: 评估时刻（显式传入，不读取系统时钟）
    ///
    /// # 返回
    /// 长度 ∈ [0, max_alerts]，顺序固定为 [低库存, 逾期, 近期完工]
    pub fn generate_alerts(
        &self,
        work_orders: &[WorkOrder],
        low_stock_parts: &[Part],
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let mut alerts = Vec::with_capacity(3);

        if let Some(alert) = self.low_stock_alert(low_stock_parts) {
            alerts.push(alert);
        }
        if let Some(alert) = self.overdue_alert(work_orders, now) {
            alerts.push(alert);
        }
        if let Some(alert) = self.recent_completion_alert(work_orders, now) {
            alerts.push(alert);
        }

        alerts.truncate(self.config.max_alerts);
        alerts
    }

    // ==========================================
    // 单项告警
    // ==========================================

    fn low_stock_alert(&self, low_stock_parts: &[Part]) -> Option<Alert> {
        let part = low_stock_parts.first()?;
        let quantity = part.stock_quantity.to_string();

        Some(Alert {
            kind: AlertKind::Warning,
            title: self.text("alerts.low_stock.title", &[]),
            description: self.text(
                "alerts.low_stock.description",
                &[("name", part.name.as_str()), ("quantity", quantity.as_str())],
            ),
            icon: AlertIcon::AlertTriangle,
        })
    }

    /// 状态为已计划、且计划时间严格早于 now 的工单
    fn overdue_alert(&self, work_orders: &[WorkOrder], now: DateTime<Utc>) -> Option<Alert> {
        let overdue = work_orders
            .iter()
            .filter(|wo| wo.status == WorkOrderStatus::Scheduled && wo.scheduled_date < now)
            .count();

        if overdue == 0 {
            return None;
        }

        let count = overdue.to_string();
        Some(Alert {
            kind: AlertKind::Info,
            title: self.text("alerts.overdue.title", &[]),
            description: self.text("alerts.overdue.description", &[("count", count.as_str())]),
            icon: AlertIcon::Activity,
        })
    }

    /// 回看窗口内完工的工单，取输入顺序中的第一条（不按完成时间排序）
    fn recent_completion_alert(&self, work_orders: &[WorkOrder], now: DateTime<Utc>) -> Option<Alert> {
        let window_hours = self.config.recent_completion_window_hours;
        // 超出可表示范围: 正值视为不设下界，负值视为空窗口
        let window_start = Duration::try_hours(window_hours)
            .and_then(|window| now.checked_sub_signed(window));
        if window_start.is_none() && window_hours <= 0 {
            return None;
        }

        let latest = work_orders.iter().find(|wo| {
            wo.status == WorkOrderStatus::Completed
                && wo
                    .completed_at
                    .map_or(false, |done| window_start.map_or(true, |start| done >= start))
        })?;

        Some(Alert {
            kind: AlertKind::Success,
            title: self.text("alerts.recent_completion.title", &[]),
            description: self.text(
                "alerts.recent_completion.description",
                &[("code", latest.code.as_str())],
            ),
            icon: AlertIcon::CheckCircle,
        })
    }

    fn text(&self, key: &str, args: &[(&str, &str)]) -> String {
        t_in_with_args(&self.config.alert_locale, key, args)
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{MaintenanceType, Priority};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn order(code: &str, status: WorkOrderStatus) -> WorkOrder {
        WorkOrder {
            id: code.to_string(),
            code: code.to_string(),
            equipment_id: "EQ1".to_string(),
            maintenance_type: MaintenanceType::Preventive,
            status,
            priority: Priority::Medium,
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
    fn test_no_conditions_no_alerts() {
        let engine = AlertEngine::new();
        let orders = vec![order("OS-1", WorkOrderStatus::Scheduled)];
        assert!(engine.generate_alerts(&orders, &[], now()).is_empty());
    }

    #[test]
    fn test_recent_completion_boundary_is_inclusive() {
        let engine = AlertEngine::new();
        let mut done = order("OS-9", WorkOrderStatus::Completed);
        done.completed_at = Some(now() - Duration::hours(24));

        let alerts = engine.generate_alerts(&[done.clone()], &[], now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Success);
        assert_eq!(alerts[0].description, "OS-9: Manutenção concluída");

        done.completed_at = Some(now() - Duration::hours(24) - Duration::seconds(1));
        assert!(engine.generate_alerts(&[done], &[], now()).is_empty());
    }

    #[test]
    fn test_out_of_range_window_does_not_panic() {
        let mut done = order("OS-9", WorkOrderStatus::Completed);
        done.completed_at = Some(now() - Duration::days(365));

        let wide = AlertEngine::with_config(DashboardConfig {
            recent_completion_window_hours: 100_000_000_000,
            ..DashboardConfig::default()
        });
        let alerts = wide.generate_alerts(&[done.clone()], &[], now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Success);

        let negative = AlertEngine::with_config(DashboardConfig {
            recent_completion_window_hours: i64::MIN,
            ..DashboardConfig::default()
        });
        assert!(negative.generate_alerts(&[done], &[], now()).is_empty());
    }

    #[test]
    fn test_scheduled_exactly_now_is_not_overdue() {
        let engine = AlertEngine::new();
        let mut wo = order("OS-2", WorkOrderStatus::Scheduled);
        wo.scheduled_date = now();
        assert!(engine.generate_alerts(&[wo], &[], now()).is_empty());
    }

    #[test]
    fn test_max_alerts_truncates_in_priority_order() {
        let config = DashboardConfig {
            max_alerts: 1,
            ..DashboardConfig::default()
        };
        let engine = AlertEngine::with_config(config);

        let mut overdue = order("OS-3", WorkOrderStatus::Scheduled);
        overdue.scheduled_date = now() - Duration::days(2);

        let alerts = engine.generate_alerts(&[overdue], &[], now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Info);
    }

    #[test]
    fn test_english_locale() {
        let config = DashboardConfig {
            alert_locale: "en".to_string(),
            ..DashboardConfig::default()
        };
        let engine = AlertEngine::with_config(config);

        let mut overdue = order("OS-4", WorkOrderStatus::Scheduled);
        overdue.scheduled_date = now() - Duration::hours(1);

        let alerts = engine.generate_alerts(&[overdue], &[], now());
        assert_eq!(alerts[0].title, "Overdue preventive maintenance");
        assert_eq!(alerts[0].description, "1 overdue order(s)");
    }
}
