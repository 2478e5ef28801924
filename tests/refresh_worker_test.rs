// ==========================================
// 驾驶舱刷新任务集成测试
// ==========================================
// 测试范围:
// 1. 写操作发布事件 → 后台任务刷新缓存
// 2. 不触发刷新的事件被忽略
// 3. 发送端关闭后任务退出
// ==========================================

mod test_helpers;

use std::time::Duration;

use maintenance_dashboard::app::spawn_refresh_worker;
use maintenance_dashboard::engine::{
    ChangeEvent, ChangeEventPublisher, ChannelEventPublisher, WatchedTable,
};
use test_helpers::TestEnv;

/// 轮询直到条件成立或超时
async fn wait_until<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

#[tokio::test]
async fn test_写操作触发刷新() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let receiver = env
        .state
        .take_change_receiver()
        .expect("接收端已被取走");
    let _worker = spawn_refresh_worker(env.state.dashboard_api.clone(), receiver);

    assert!(env.state.dashboard_api.latest().is_none());
    env.seed_equipment("EQ-001", "Prensa");

    let api = env.state.dashboard_api.clone();
    assert!(wait_until(move || api.latest().is_some()).await);
}

#[tokio::test]
async fn test_无关事件不刷新() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let (publisher, receiver) = ChannelEventPublisher::channel();
    let worker = spawn_refresh_worker(env.state.dashboard_api.clone(), receiver);

    publisher
        .publish(ChangeEvent::insert(WatchedTable::PurchaseRequests))
        .expect("发布失败");
    publisher
        .publish(ChangeEvent::insert(WatchedTable::Parts))
        .expect("发布失败");

    // 关闭发送端，任务处理完队列后退出
    drop(publisher);
    tokio::time::timeout(Duration::from_secs(5), worker)
        .await
        .expect("刷新任务未退出")
        .expect("刷新任务异常");

    assert!(env.state.dashboard_api.latest().is_none());
}

#[tokio::test]
async fn test_批量事件合并后刷新() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let (publisher, receiver) = ChannelEventPublisher::channel();

    // 先排队再启动，整批只需一次刷新
    for _ in 0..5 {
        publisher
            .publish(ChangeEvent::update(WatchedTable::WorkOrders))
            .expect("发布失败");
    }
    let worker = spawn_refresh_worker(env.state.dashboard_api.clone(), receiver);

    drop(publisher);
    tokio::time::timeout(Duration::from_secs(5), worker)
        .await
        .expect("刷新任务未退出")
        .expect("刷新任务异常");

    assert!(env.state.dashboard_api.latest().is_some());
}
