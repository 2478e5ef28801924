// ==========================================
// 设备维护管理系统 - 导出展示文本
// ==========================================
// 状态取本地化标签；日期按目录中的 labels.date_format 以 UTC 日期输出
// ==========================================

use crate::domain::types::{MaintenanceType, Priority, WorkOrderStatus};
use crate::i18n::t_in;
use chrono::{DateTime, Utc};

pub fn status_label(locale: &str, status: WorkOrderStatus) -> String {
    t_in(locale, status.label_key())
}

pub fn type_label(locale: &str, maintenance_type: MaintenanceType) -> String {
    t_in(locale, maintenance_type.label_key())
}

pub fn priority_label(locale: &str, priority: Priority) -> String {
    t_in(locale, priority.label_key())
}

/// 首字母大写（按字符处理，兼容多字节）
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_date(locale: &str, value: DateTime<Utc>) -> String {
    let pattern = t_in(locale, "labels.date_format");
    value.format(&pattern).to_string()
}

/// 可空日期；缺失时输出给定占位键的文本
pub fn format_optional_date(locale: &str, value: Option<DateTime<Utc>>, missing_key: &str) -> String {
    match value {
        Some(v) => format_date(locale, v),
        None => t_in(locale, missing_key),
    }
}

pub fn yes_no(locale: &str, value: bool) -> String {
    if value {
        t_in(locale, "common.answer_yes")
    } else {
        t_in(locale, "common.answer_no")
    }
}

pub fn not_available(locale: &str) -> String {
    t_in(locale, "common.not_available")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("preventiva"), "Preventiva");
        assert_eq!(capitalize_first("média"), "Média");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_dates_and_flags() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 23, 30, 0).unwrap();
        assert_eq!(format_date("pt-BR", date), "05/03/2024");
        assert_eq!(format_date("en", date), "03/05/2024");
        assert_eq!(
            format_optional_date("pt-BR", None, "labels.not_started"),
            "Não iniciada"
        );
        assert_eq!(yes_no("pt-BR", true), "Sim");
        assert_eq!(yes_no("pt-BR", false), "Não");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label("pt-BR", WorkOrderStatus::InProgress), "Em Andamento");
        assert_eq!(type_label("pt-BR", MaintenanceType::Corrective), "Corretiva");
        assert_eq!(priority_label("pt-BR", Priority::Medium), "Média");
    }
}
