// ==========================================
// 设备维护管理系统 - 驾驶舱刷新任务
// ==========================================
// 职责: 监听数据变更事件，合并同一批事件后全量重算驾驶舱
// 结果: DashboardApi 缓存整体替换（后写覆盖）
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::api::DashboardApi;
use crate::engine::ChangeEvent;

/// 启动刷新任务
///
/// 发送端全部关闭后任务结束
pub fn spawn_refresh_worker(
    dashboard_api: Arc<DashboardApi>,
    mut receiver: UnboundedReceiver<ChangeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("驾驶舱刷新任务已启动");

        while let Some(first) = receiver.recv().await {
            // 合并已排队的事件，一批只刷新一次
            let mut batch = vec![first];
            while let Ok(event) = receiver.try_recv() {
                batch.push(event);
            }

            if !batch.iter().any(ChangeEvent::triggers_dashboard_refresh) {
                continue;
            }
            tracing::debug!(events = batch.len(), "收到数据变更，开始刷新驾驶舱");

            let api = dashboard_api.clone();
            match tokio::task::spawn_blocking(move || api.refresh(Utc::now())).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::error!("驾驶舱刷新失败: {}", e),
                Err(e) => tracing::error!("刷新任务执行失败: {}", e),
            }
        }

        tracing::info!("驾驶舱刷新任务已退出");
    })
}
