// ==========================================
// ConfigApi 集成测试
// ==========================================
// 测试范围:
// 1. 配置读写
// 2. 快照导出/恢复
// 3. 驾驶舱参数（缺省值、格式错误回退）
// ==========================================

mod test_helpers;

use maintenance_dashboard::config::{config_keys, DashboardConfig};
use test_helpers::TestEnv;

#[test]
fn test_dashboard_config_默认值() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let config = env.state.config_api.get_dashboard_config().expect("读取失败");
    assert_eq!(config, DashboardConfig::default());
    assert_eq!(config.alert_locale, "pt-BR");
}

#[test]
fn test_update_config_格式错误回退默认值() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.config_api;

    api.update_config(config_keys::MAX_ALERTS, "2").expect("更新失败");
    api.update_config(config_keys::PREVENTIVE_UNIT_COST, "abc").expect("更新失败");

    let config = api.get_dashboard_config().expect("读取失败");
    assert_eq!(config.max_alerts, 2);
    assert_eq!(config.preventive_unit_cost, 2500.0);

    let item = api
        .get_config("global", config_keys::MAX_ALERTS)
        .expect("查询失败")
        .expect("配置不存在");
    assert_eq!(item.value, "2");
}

#[test]
fn test_update_config_空键被拒绝() {
    let env = TestEnv::new().expect("无法创建测试环境");
    assert!(env.state.config_api.update_config("  ", "1").is_err());
}

#[test]
fn test_config_snapshot_恢复() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.config_api;

    api.update_config(config_keys::ALERT_LOCALE, "en").expect("更新失败");
    let snapshot = api.get_config_snapshot().expect("导出失败");

    api.update_config(config_keys::ALERT_LOCALE, "pt-BR").expect("更新失败");
    let restored = api.restore_config_from_snapshot(&snapshot).expect("恢复失败");

    assert!(restored >= 1);
    assert_eq!(api.get_dashboard_config().expect("读取失败").alert_locale, "en");
    assert!(api
        .list_configs()
        .expect("查询失败")
        .iter()
        .any(|c| c.key == config_keys::ALERT_LOCALE));
}
