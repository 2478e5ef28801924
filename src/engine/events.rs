// ==========================================
// 设备维护管理系统 - 引擎层变更事件
// ==========================================
// 职责: 定义数据变更事件与发布 trait，实现依赖倒置
// 说明: Engine 层定义 trait，App 层的刷新工作器消费事件
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// ==========================================
// 事件类型
// ==========================================

/// 被监听的数据表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedTable {
    WorkOrders,
    Parts,
    Equipments,
    Maintainers,
    MaintenanceRequests,
    PurchaseRequests,
}

impl WatchedTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchedTable::WorkOrders => "work_orders",
            WatchedTable::Parts => "parts",
            WatchedTable::Equipments => "equipments",
            WatchedTable::Maintainers => "maintainers",
            WatchedTable::MaintenanceRequests => "maintenance_requests",
            WatchedTable::PurchaseRequests => "purchase_requests",
        }
    }
}

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }
}

/// 数据变更事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: WatchedTable,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(table: WatchedTable, kind: ChangeKind) -> Self {
        Self { table, kind }
    }

    pub fn insert(table: WatchedTable) -> Self {
        Self::new(table, ChangeKind::Insert)
    }

    pub fn update(table: WatchedTable) -> Self {
        Self::new(table, ChangeKind::Update)
    }

    pub fn delete(table: WatchedTable) -> Self {
        Self::new(table, ChangeKind::Delete)
    }

    /// 是否需要重算驾驶舱
    ///
    /// - 工单: 任意变更
    /// - 备件: 仅更新（库存数量变化）
    /// - 设备: 任意变更（可用率分母）
    pub fn triggers_dashboard_refresh(&self) -> bool {
        match self.table {
            WatchedTable::WorkOrders | WatchedTable::Equipments => true,
            WatchedTable::Parts => self.kind == ChangeKind::Update,
            _ => false,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table.as_str(), self.kind.as_str())
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 变更事件发布者
///
/// # 实现说明
/// - `ChannelEventPublisher` 把事件送入刷新工作器的队列
/// - `NoOpEventPublisher` 用于不需要刷新的场景（CLI 单次调用、单元测试）
pub trait ChangeEventPublisher: Send + Sync {
    fn publish(&self, event: ChangeEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl ChangeEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: ChangeEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(event = %event, "NoOpEventPublisher: 跳过事件发布");
        Ok(())
    }
}

/// 基于 tokio 无界通道的事件发布者
#[derive(Debug, Clone)]
pub struct ChannelEventPublisher {
    sender: mpsc::UnboundedSender<ChangeEvent>,
}

impl ChannelEventPublisher {
    /// 创建发布者与对应的接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ChangeEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ChangeEventPublisher for ChannelEventPublisher {
    fn publish(&self, event: ChangeEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.sender
            .send(event)
            .map_err(|e| format!("刷新队列已关闭: {}", e.0).into())
    }
}

/// 延迟接入的通道发布者
///
/// 接收端被取走之前事件直接丢弃，队列只在刷新工作器存在时积累
#[derive(Debug, Default)]
pub struct DeferredChannelPublisher {
    sender: Mutex<Option<mpsc::UnboundedSender<ChangeEvent>>>,
}

impl DeferredChannelPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立通道并返回接收端（只能取一次）
    pub fn subscribe(&self) -> Option<mpsc::UnboundedReceiver<ChangeEvent>> {
        let mut guard = self.sender.lock().ok()?;
        if guard.is_some() {
            return None;
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        *guard = Some(sender);
        Some(receiver)
    }

    pub fn is_subscribed(&self) -> bool {
        self.sender
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl ChangeEventPublisher for DeferredChannelPublisher {
    fn publish(&self, event: ChangeEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        let guard = self
            .sender
            .lock()
            .map_err(|e| format!("发布者锁获取失败: {}", e))?;
        match guard.as_ref() {
            Some(sender) => sender
                .send(event)
                .map_err(|e| format!("刷新队列已关闭: {}", e.0).into()),
            None => {
                tracing::debug!(event = %event, "刷新任务未启动，丢弃事件");
                Ok(())
            }
        }
    }
}

/// 可选的事件发布者包装
///
/// 发布失败只记录日志，不影响已提交的写操作
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn ChangeEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn ChangeEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn publish(&self, event: ChangeEvent) {
        match &self.inner {
            Some(publisher) => {
                if let Err(e) = publisher.publish(event) {
                    tracing::warn!(event = %event, error = %e, "变更事件发布失败");
                }
            }
            None => {
                tracing::debug!(event = %event, "未配置发布者，跳过事件");
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}
