// ==========================================
// AlertEngine 集成测试
// ==========================================
// 测试范围:
// 1. 单项告警（低库存/逾期/近期完工）
// 2. 固定顺序与数量上限
// 3. 语言切换
// ==========================================

mod test_helpers;

use maintenance_dashboard::config::DashboardConfig;
use maintenance_dashboard::domain::{AlertIcon, AlertKind, MaintenanceType, WorkOrderStatus};
use maintenance_dashboard::engine::AlertEngine;
use test_helpers::{part, ts, work_order};

#[test]
fn test_无数据时无告警() {
    let alerts = AlertEngine::new().generate_alerts(&[], &[], ts(2024, 3, 10, 12, 0));
    assert!(alerts.is_empty());
}

#[test]
fn test_单条逾期工单() {
    let now = ts(2024, 3, 10, 12, 0);
    let overdue = work_order(
        "1",
        MaintenanceType::Preventive,
        WorkOrderStatus::Scheduled,
        ts(2024, 3, 9, 12, 0),
    );

    let alerts = AlertEngine::new().generate_alerts(&[overdue], &[], now);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Info);
    assert_eq!(alerts[0].title, "Manutenção preventiva vencida");
    assert_eq!(alerts[0].description, "1 ordem(ns) em atraso");
    assert_eq!(alerts[0].icon, AlertIcon::Activity);
}

#[test]
fn test_计划时间等于当前不算逾期() {
    let now = ts(2024, 3, 10, 12, 0);
    let due_now = work_order("1", MaintenanceType::Preventive, WorkOrderStatus::Scheduled, now);

    let alerts = AlertEngine::new().generate_alerts(&[due_now], &[], now);
    assert!(alerts.is_empty());
}

#[test]
fn test_低库存只取第一条() {
    let parts = vec![part("Rolamento", 2, 5), part("Correia", 0, 1)];

    let alerts = AlertEngine::new().generate_alerts(&[], &parts, ts(2024, 3, 10, 12, 0));

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Warning);
    assert_eq!(alerts[0].title, "Estoque baixo");
    assert_eq!(alerts[0].description, "Peça: Rolamento (2 unidades)");
}

#[test]
fn test_近期完工取输入顺序第一条() {
    let now = ts(2024, 3, 10, 12, 0);
    let mut older = work_order("A", MaintenanceType::Corrective, WorkOrderStatus::Completed, ts(2024, 3, 1, 0, 0));
    older.completed_at = Some(ts(2024, 3, 10, 1, 0));
    let mut newer = work_order("B", MaintenanceType::Corrective, WorkOrderStatus::Completed, ts(2024, 3, 2, 0, 0));
    newer.completed_at = Some(ts(2024, 3, 10, 11, 0));

    let alerts = AlertEngine::new().generate_alerts(&[older, newer], &[], now);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Success);
    assert_eq!(alerts[0].description, "OS-A: Manutenção concluída");
}

#[test]
fn test_完工超出回看窗口() {
    let now = ts(2024, 3, 10, 12, 0);
    let mut stale = work_order("1", MaintenanceType::Corrective, WorkOrderStatus::Completed, ts(2024, 3, 1, 0, 0));
    stale.completed_at = Some(ts(2024, 3, 9, 11, 59));

    let alerts = AlertEngine::new().generate_alerts(&[stale], &[], now);
    assert!(alerts.is_empty());
}

#[test]
fn test_三类告警固定顺序() {
    let now = ts(2024, 3, 10, 12, 0);
    let overdue = work_order("1", MaintenanceType::Preventive, WorkOrderStatus::Scheduled, ts(2024, 3, 1, 0, 0));
    let mut done = work_order("2", MaintenanceType::Corrective, WorkOrderStatus::Completed, ts(2024, 3, 2, 0, 0));
    done.completed_at = Some(ts(2024, 3, 10, 10, 0));

    let alerts = AlertEngine::new().generate_alerts(&[done, overdue], &[part("Filtro", 1, 3)], now);

    let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::Warning, AlertKind::Info, AlertKind::Success]);
}

#[test]
fn test_告警数量上限() {
    let now = ts(2024, 3, 10, 12, 0);
    let overdue = work_order("1", MaintenanceType::Preventive, WorkOrderStatus::Scheduled, ts(2024, 3, 1, 0, 0));
    let config = DashboardConfig {
        max_alerts: 1,
        ..DashboardConfig::default()
    };

    let alerts = AlertEngine::with_config(config).generate_alerts(
        &[overdue],
        &[part("Filtro", 1, 3)],
        now,
    );

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Warning);
}

#[test]
fn test_英文告警文本() {
    let now = ts(2024, 3, 10, 12, 0);
    let overdue = work_order("1", MaintenanceType::Preventive, WorkOrderStatus::Scheduled, ts(2024, 3, 1, 0, 0));
    let config = DashboardConfig {
        alert_locale: "en".to_string(),
        ..DashboardConfig::default()
    };

    let alerts = AlertEngine::with_config(config).generate_alerts(&[overdue], &[], now);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Overdue preventive maintenance");
    assert_eq!(alerts[0].description, "1 overdue order(s)");
}
