// ==========================================
// 工单导出集成测试
// ==========================================
// 测试范围:
// 1. 表格导出（表头、行内容、文件名）
// 2. 工单打印件（文件名、可选段落）
// ==========================================

mod test_helpers;

use maintenance_dashboard::api::{ApiError, PartUsageRequest};
use maintenance_dashboard::domain::MaintenanceType;
use test_helpers::{ts, work_order_request, TestEnv};

#[test]
fn test_export_csv_内容() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let equipment = env.seed_equipment("EQ-001", "Prensa");
    let maintainer = env.seed_maintainer("João Silva");
    let part = env.seed_part("P-01", "Rolamento", 10, 2);
    let now = ts(2024, 5, 7, 10, 0);

    let mut request = work_order_request(&equipment.id, MaintenanceType::Corrective, now);
    request.maintainer_ids = vec![maintainer.id];
    request.parts = vec![PartUsageRequest {
        part_id: part.id,
        quantity_used: 2,
    }];
    let wo = env
        .state
        .work_order_api
        .create_work_order(request, now)
        .expect("创建失败");

    let csv_text = env
        .state
        .work_order_api
        .export_work_orders_csv("pt-BR")
        .expect("导出失败");

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = reader.headers().expect("表头读取失败").clone();
    assert_eq!(&headers[0], "Código");
    assert_eq!(headers.len(), 13);

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("行读取失败");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(&record[0], wo.code.as_str());
    assert_eq!(&record[1], "Corretiva");
    assert_eq!(&record[2], "Programada");
    assert_eq!(&record[3], "Media");
    assert_eq!(&record[4], "Prensa");
    assert_eq!(&record[5], "EQ-001");
    assert_eq!(&record[6], "07/05/2024");
    assert_eq!(&record[7], "Não iniciada");
    assert_eq!(&record[9], "Não");
    assert_eq!(&record[11], "João Silva");
    assert_eq!(&record[12], "Rolamento (2)");
}

#[test]
fn test_export_csv_写入目录() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dir = tempfile::tempdir().expect("无法创建临时目录");

    let path = env
        .state
        .work_order_api
        .export_work_orders_csv_to_dir(dir.path(), "pt-BR", ts(2024, 5, 7, 10, 0))
        .expect("导出失败");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("ordens_servico_2024-05-07.csv")
    );
    let content = std::fs::read_to_string(&path).expect("读取失败");
    // 无工单时只有表头
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_document_写入文件() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let equipment = env.seed_equipment("EQ-001", "Prensa");
    let now = ts(2024, 5, 7, 10, 0);
    let wo = env.seed_work_order(&equipment.id, MaintenanceType::Preventive, now, now);
    let dir = tempfile::tempdir().expect("无法创建临时目录");

    let path = env
        .state
        .work_order_api
        .write_document(&wo.id, "pt-BR", dir.path())
        .expect("生成失败");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(format!("OS_{}.txt", wo.code).as_str())
    );
    let content = std::fs::read_to_string(&path).expect("读取失败");
    assert!(content.contains("ORDEM DE SERVIÇO"));
    assert!(content.contains("Troca de rolamento"));
    assert!(content.contains("Assinatura do Responsável"));
    assert!(content.contains("Página 1/1"));
    // 无维护人员/用料时不输出对应表格
    assert!(!content.contains("Função"));
    assert!(!content.contains("Quantidade"));
}

#[test]
fn test_document_工单不存在() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let result = env.state.work_order_api.build_document("missing", "pt-BR");
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}
