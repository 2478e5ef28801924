// ==========================================
// InventoryApi 集成测试
// ==========================================
// 测试范围:
// 1. 备件创建与校验
// 2. 库存设置/增减（不允许为负）
// 3. 低库存查询与库存状态
// ==========================================

mod test_helpers;

use maintenance_dashboard::api::ApiError;
use maintenance_dashboard::domain::StockStatus;
use test_helpers::{part_request, ts, TestEnv};

#[test]
fn test_create_part_负数库存被拒绝() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let result = env
        .state
        .inventory_api
        .create_part(part_request("P-01", "Rolamento", -1, 2), ts(2024, 1, 1, 0, 0));

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_create_part_编码重复() {
    let env = TestEnv::new().expect("无法创建测试环境");
    env.seed_part("P-01", "Rolamento", 5, 2);

    let result = env
        .state
        .inventory_api
        .create_part(part_request("P-01", "Outro", 5, 2), ts(2024, 1, 1, 0, 0));

    assert!(matches!(result, Err(ApiError::BusinessRuleViolation(_))));
}

#[test]
fn test_set_stock_负数被拒绝且库存不变() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let part = env.seed_part("P-01", "Rolamento", 5, 2);

    let result = env
        .state
        .inventory_api
        .set_stock(&part.id, -1, ts(2024, 1, 2, 0, 0));

    match result {
        Err(ApiError::InvalidInput(msg)) => assert!(msg.contains("quantity cannot be negative")),
        other => panic!("期望输入错误，实际: {:?}", other),
    }
    let stored = env.state.inventory_api.get_part(&part.id).expect("查询失败");
    assert_eq!(stored.part.stock_quantity, 5);
}

#[test]
fn test_adjust_stock_增减() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let part = env.seed_part("P-01", "Rolamento", 1, 2);
    let api = &env.state.inventory_api;

    let increased = api.adjust_stock(&part.id, 1, ts(2024, 1, 2, 0, 0)).expect("调整失败");
    assert_eq!(increased.stock_quantity, 2);

    let decreased = api.adjust_stock(&part.id, -2, ts(2024, 1, 2, 1, 0)).expect("调整失败");
    assert_eq!(decreased.stock_quantity, 0);

    // 已为 0 时继续减少
    let result = api.adjust_stock(&part.id, -1, ts(2024, 1, 2, 2, 0));
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(api.get_part(&part.id).expect("查询失败").stock_status, StockStatus::OutOfStock);
}

#[test]
fn test_list_low_stock_含等于最低库存() {
    let env = TestEnv::new().expect("无法创建测试环境");
    env.seed_part("P-01", "Rolamento", 2, 2);
    env.seed_part("P-02", "Correia", 1, 3);
    env.seed_part("P-03", "Filtro", 10, 3);

    let low = env.state.inventory_api.list_low_stock().expect("查询失败");

    let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Correia", "Rolamento"]);
}

#[test]
fn test_list_parts_附库存状态() {
    let env = TestEnv::new().expect("无法创建测试环境");
    env.seed_part("P-01", "Amortecedor", 0, 1);
    env.seed_part("P-02", "Bucha", 1, 1);
    env.seed_part("P-03", "Corrente", 9, 1);

    let parts = env.state.inventory_api.list_parts().expect("查询失败");

    let statuses: Vec<StockStatus> = parts.iter().map(|p| p.stock_status).collect();
    assert_eq!(
        statuses,
        vec![StockStatus::OutOfStock, StockStatus::Low, StockStatus::Normal]
    );
}

#[test]
fn test_delete_part_不存在() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let result = env.state.inventory_api.delete_part("missing");
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}
