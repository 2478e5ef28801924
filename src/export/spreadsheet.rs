// ==========================================
// 设备维护管理系统 - 工单表格导出
// ==========================================
// 输出: CSV（csv crate），一行一张工单
// 类型/优先级: 存储值首字母大写；状态: 本地化标签
// ==========================================

use crate::domain::work_order::WorkOrderDetail;
use crate::export::error::ExportResult;
use crate::export::labels::{
    capitalize_first, format_date, format_optional_date, not_available, status_label, yes_no,
};
use crate::i18n::t_in;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 列头键（顺序即列顺序）
const COLUMN_KEYS: [&str; 13] = [
    "export.columns.code",
    "export.columns.type",
    "export.columns.status",
    "export.columns.priority",
    "export.columns.equipment",
    "export.columns.equipment_code",
    "export.columns.scheduled_date",
    "export.columns.started_at",
    "export.columns.completed_at",
    "export.columns.machine_down",
    "export.columns.description",
    "export.columns.maintainers",
    "export.columns.parts",
];

pub fn headers(locale: &str) -> Vec<String> {
    COLUMN_KEYS.iter().map(|key| t_in(locale, key)).collect()
}

/// 单张工单的表格行
pub fn row(detail: &WorkOrderDetail, locale: &str) -> Vec<String> {
    let wo = &detail.work_order;
    let na = not_available(locale);

    let maintainers = detail
        .maintainers
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let parts = detail
        .parts
        .iter()
        .map(|p| format!("{} ({})", p.name, p.quantity_used))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        wo.code.clone(),
        capitalize_first(wo.maintenance_type.as_db_str()),
        status_label(locale, wo.status),
        capitalize_first(wo.priority.as_db_str()),
        detail
            .equipment
            .as_ref()
            .map(|eq| eq.name.clone())
            .unwrap_or_else(|| na.clone()),
        detail
            .equipment
            .as_ref()
            .map(|eq| eq.code.clone())
            .unwrap_or_else(|| na.clone()),
        format_date(locale, wo.scheduled_date),
        format_optional_date(locale, wo.started_at, "labels.not_started"),
        format_optional_date(locale, wo.completed_at, "labels.not_completed"),
        yes_no(locale, wo.machine_down),
        wo.description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| na.clone()),
        non_empty_or(maintainers, &na),
        non_empty_or(parts, &na),
    ]
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// 写出 CSV（含表头）
pub fn write_work_orders_csv<W: Write>(
    writer: W,
    details: &[WorkOrderDetail],
    locale: &str,
) -> ExportResult<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(headers(locale))?;
    for detail in details {
        csv_writer.write_record(row(detail, locale))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn work_orders_csv_string(details: &[WorkOrderDetail], locale: &str) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_work_orders_csv(&mut buffer, details, locale)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn write_work_orders_csv_file(
    path: &Path,
    details: &[WorkOrderDetail],
    locale: &str,
) -> ExportResult<()> {
    let file = File::create(path)?;
    write_work_orders_csv(file, details, locale)?;
    tracing::info!(path = %path.display(), rows = details.len(), "工单表格已导出");
    Ok(())
}

/// 导出文件名: {前缀}_{YYYY-MM-DD}.csv
pub fn export_file_name(locale: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", t_in(locale, "export.file_prefix"), date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::maintainer::Maintainer;
    use crate::domain::types::{MaintenanceType, Priority, WorkOrderStatus};
    use crate::domain::work_order::{EquipmentRef, WorkOrder, WorkOrderPartUsage};
    use chrono::{TimeZone, Utc};

    fn detail() -> WorkOrderDetail {
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        WorkOrderDetail {
            work_order: WorkOrder {
                id: "wo-1".to_string(),
                code: "OS-1700000000000".to_string(),
                equipment_id: "eq-1".to_string(),
                maintenance_type: MaintenanceType::Corrective,
                status: WorkOrderStatus::Completed,
                priority: Priority::High,
                scheduled_date: at,
                started_at: Some(at),
                completed_at: None,
                machine_down: true,
                description: None,
                created_by: None,
                created_at: at,
                updated_at: at,
            },
            equipment: Some(EquipmentRef {
                id: "eq-1".to_string(),
                code: "PR-01".to_string(),
                name: "Prensa Hidráulica".to_string(),
            }),
            maintainers: vec![
                Maintainer {
                    id: "m1".to_string(),
                    name: "Ana".to_string(),
                    role: None,
                    contact: None,
                    certifications: vec![],
                    active: true,
                    created_at: at,
                    updated_at: at,
                },
                Maintainer {
                    id: "m2".to_string(),
                    name: "Bruno".to_string(),
                    role: Some("Eletricista".to_string()),
                    contact: None,
                    certifications: vec!["NR-10".to_string()],
                    active: true,
                    created_at: at,
                    updated_at: at,
                },
            ],
            parts: vec![WorkOrderPartUsage {
                part_id: "p1".to_string(),
                code: "ROL-6205".to_string(),
                name: "Rolamento".to_string(),
                quantity_used: 2,
            }],
        }
    }

    #[test]
    fn test_row_formatting() {
        let cells = row(&detail(), "pt-BR");
        assert_eq!(
            cells,
            vec![
                "OS-1700000000000",
                "Corretiva",
                "Finalizada",
                "Alta",
                "Prensa Hidráulica",
                "PR-01",
                "10/01/2024",
                "10/01/2024",
                "Não concluída",
                "Sim",
                "N/A",
                "Ana, Bruno",
                "Rolamento (2)",
            ]
        );
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let mut empty = detail();
        empty.equipment = None;
        empty.maintainers.clear();
        empty.parts.clear();

        let csv = work_orders_csv_string(&[detail(), empty], "pt-BR").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Código,Tipo,Status,Prioridade,Equipamento,Código Equipamento"));
        assert!(lines[0].ends_with("Manutentores,Peças Utilizadas"));
        assert!(lines[1].contains("\"Ana, Bruno\""));
        assert!(lines[2].ends_with("N/A,N/A,N/A"));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        assert_eq!(export_file_name("pt-BR", date), "ordens_servico_2024-05-07.csv");
    }
}
