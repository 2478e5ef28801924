// ==========================================
// MaintainerApi 集成测试
// ==========================================

mod test_helpers;

use maintenance_dashboard::api::{ApiError, MaintainerRequest};
use test_helpers::{ts, TestEnv};

#[test]
fn test_create_maintainer_姓名必填() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let result = env.state.maintainer_api.create_maintainer(
        MaintainerRequest {
            name: "  ".to_string(),
            role: None,
            contact: None,
            certifications: Vec::new(),
        },
        ts(2024, 1, 1, 0, 0),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_list_maintainers_过滤停用() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let carla = env.seed_maintainer("Carla");
    env.seed_maintainer("Ana");
    let api = &env.state.maintainer_api;

    api.set_active(&carla.id, false, ts(2024, 1, 2, 0, 0))
        .expect("停用失败");

    let active: Vec<String> = api
        .list_maintainers(true)
        .expect("查询失败")
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(active, vec!["Ana"]);

    let all = api.list_maintainers(false).expect("查询失败");
    assert_eq!(all.len(), 2);
    let stored = api.get_maintainer(&carla.id).expect("查询失败");
    assert!(!stored.active);
    assert_eq!(stored.certifications, vec!["NR-10".to_string()]);
}
