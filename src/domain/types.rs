// ==========================================
// 设备维护管理系统 - 领域类型定义
// ==========================================
// 存储值沿用既有后端的葡语词汇（preventiva/programada/...）
// 序列化格式与数据库存储值一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 维护类型 (Maintenance Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceType {
    #[serde(rename = "preventiva")]
    Preventive, // 预防性
    #[serde(rename = "corretiva")]
    Corrective, // 纠正性（故障后维修）
    #[serde(rename = "preditiva")]
    Predictive, // 预测性
}

impl MaintenanceType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "preventiva",
            MaintenanceType::Corrective => "corretiva",
            MaintenanceType::Predictive => "preditiva",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "preventiva" => Some(MaintenanceType::Preventive),
            "corretiva" => Some(MaintenanceType::Corrective),
            "preditiva" => Some(MaintenanceType::Predictive),
            _ => None,
        }
    }

    /// i18n 标签键
    pub fn label_key(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "labels.type.preventive",
            MaintenanceType::Corrective => "labels.type.corrective",
            MaintenanceType::Predictive => "labels.type.predictive",
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ==========================================
// 工单状态 (Work Order Status)
// ==========================================
// 状态单调推进: 已计划 → 进行中 → 已完成
// 取消只允许发生在完成之前
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    #[serde(rename = "programada")]
    Scheduled,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "finalizada")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl WorkOrderStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Scheduled => "programada",
            WorkOrderStatus::InProgress => "em_andamento",
            WorkOrderStatus::Completed => "finalizada",
            WorkOrderStatus::Cancelled => "cancelada",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "programada" => Some(WorkOrderStatus::Scheduled),
            "em_andamento" => Some(WorkOrderStatus::InProgress),
            "finalizada" => Some(WorkOrderStatus::Completed),
            "cancelada" => Some(WorkOrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            WorkOrderStatus::Scheduled => "labels.status.scheduled",
            WorkOrderStatus::InProgress => "labels.status.in_progress",
            WorkOrderStatus::Completed => "labels.status.completed",
            WorkOrderStatus::Cancelled => "labels.status.cancelled",
        }
    }

    /// 是否允许迁移到目标状态
    pub fn can_transition_to(&self, target: WorkOrderStatus) -> bool {
        matches!(
            (self, target),
            (WorkOrderStatus::Scheduled, WorkOrderStatus::InProgress)
                | (WorkOrderStatus::InProgress, WorkOrderStatus::Completed)
                | (WorkOrderStatus::Scheduled, WorkOrderStatus::Cancelled)
                | (WorkOrderStatus::InProgress, WorkOrderStatus::Cancelled)
        )
    }

    /// 终态（不可再变更）
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled)
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ==========================================
// 优先级 (Priority)
// ==========================================
// 顺序: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "baixa")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "critica")]
    Critical, // 仅维护申请使用
}

impl Priority {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Priority::Low => "baixa",
            Priority::Medium => "media",
            Priority::High => "alta",
            Priority::Critical => "critica",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "baixa" => Some(Priority::Low),
            "media" => Some(Priority::Medium),
            "alta" => Some(Priority::High),
            "critica" => Some(Priority::Critical),
            _ => None,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Priority::Low => "labels.priority.low",
            Priority::Medium => "labels.priority.medium",
            Priority::High => "labels.priority.high",
            Priority::Critical => "labels.priority.critical",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ==========================================
// 设备关键度 (Criticality)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Criticality {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Criticality::None => "none",
            Criticality::Low => "low",
            Criticality::Medium => "medium",
            Criticality::High => "high",
            Criticality::Critical => "critical",
        }
    }

    /// 未知值按 None 处理
    pub fn from_db_str(s: &str) -> Self {
        match s.trim() {
            "low" => Criticality::Low,
            "medium" => Criticality::Medium,
            "high" => Criticality::High,
            "critical" => Criticality::Critical,
            _ => Criticality::None,
        }
    }
}

impl Default for Criticality {
    fn default() -> Self {
        Criticality::None
    }
}

// ==========================================
// 维护申请状态 (Maintenance Request Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceRequestStatus {
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "aprovada")]
    Approved,
    #[serde(rename = "rejeitada")]
    Rejected,
}

impl MaintenanceRequestStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            MaintenanceRequestStatus::Pending => "pendente",
            MaintenanceRequestStatus::Approved => "aprovada",
            MaintenanceRequestStatus::Rejected => "rejeitada",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "pendente" => Some(MaintenanceRequestStatus::Pending),
            "aprovada" => Some(MaintenanceRequestStatus::Approved),
            "rejeitada" => Some(MaintenanceRequestStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for MaintenanceRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ==========================================
// 采购申请状态 (Purchase Request Status)
// ==========================================
// 看板列，状态之间可自由拖动
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseRequestStatus {
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "pedido_pendente")]
    OrderPending,
    #[serde(rename = "aprovacao")]
    Approval,
    #[serde(rename = "pedido_aprovacao")]
    OrderApproval,
    #[serde(rename = "finalizada")]
    Finished,
}

impl PurchaseRequestStatus {
    pub const ALL: [PurchaseRequestStatus; 5] = [
        PurchaseRequestStatus::Pending,
        PurchaseRequestStatus::OrderPending,
        PurchaseRequestStatus::Approval,
        PurchaseRequestStatus::OrderApproval,
        PurchaseRequestStatus::Finished,
    ];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            PurchaseRequestStatus::Pending => "pendente",
            PurchaseRequestStatus::OrderPending => "pedido_pendente",
            PurchaseRequestStatus::Approval => "aprovacao",
            PurchaseRequestStatus::OrderApproval => "pedido_aprovacao",
            PurchaseRequestStatus::Finished => "finalizada",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|st| st.as_db_str() == s.trim())
    }
}

impl fmt::Display for PurchaseRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_order_status_transitions() {
        use WorkOrderStatus::*;
        assert!(Scheduled.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));

        assert!(!Scheduled.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Scheduled));
        assert!(!InProgress.can_transition_to(Scheduled));
    }

    #[test]
    fn test_serde_uses_db_vocabulary() {
        let json = serde_json::to_string(&WorkOrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"em_andamento\"");

        let parsed: MaintenanceType = serde_json::from_str("\"corretiva\"").unwrap();
        assert_eq!(parsed, MaintenanceType::Corrective);

        let json = serde_json::to_string(&PurchaseRequestStatus::OrderApproval).unwrap();
        assert_eq!(json, "\"pedido_aprovacao\"");
    }

    #[test]
    fn test_db_str_parsing() {
        assert_eq!(Priority::from_db_str("critica"), Some(Priority::Critical));
        assert_eq!(Priority::from_db_str("urgent"), None);
        assert_eq!(Criticality::from_db_str("bogus"), Criticality::None);
        assert_eq!(
            PurchaseRequestStatus::from_db_str("aprovacao"),
            Some(PurchaseRequestStatus::Approval)
        );
    }
}
