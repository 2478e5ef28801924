// ==========================================
// 设备维护管理系统 - 命令行入口
// ==========================================
// 用法:
//   maintenance-dashboard dashboard            输出驾驶舱 JSON
//   maintenance-dashboard low-stock            输出低库存备件 JSON
//   maintenance-dashboard export [目录]        导出工单表格
//   maintenance-dashboard document <工单ID> [目录]  生成工单打印件
//   maintenance-dashboard config               输出当前驾驶舱参数
// 环境变量:
//   MAINTENANCE_DASHBOARD_DB_PATH  数据库路径
//   MAINTENANCE_DASHBOARD_LOCALE   导出语言（默认 pt-BR）
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use maintenance_dashboard::app::{get_default_db_path, spawn_refresh_worker, AppState};
use maintenance_dashboard::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", maintenance_dashboard::APP_NAME, maintenance_dashboard::VERSION);
    tracing::info!("==================================================");

    let locale = std::env::var("MAINTENANCE_DASHBOARD_LOCALE")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| i18n::DEFAULT_LOCALE.to_string());

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("dashboard");

    match command {
        "dashboard" => {
            let stats = state.dashboard_api.refresh(Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        "low-stock" => {
            let parts = state.dashboard_api.get_low_stock_parts()?;
            println!("{}", serde_json::to_string_pretty(&parts)?);
        }
        "export" => {
            let dir = output_dir(args.get(1))?;
            let path = state
                .work_order_api
                .export_work_orders_csv_to_dir(&dir, &locale, Utc::now())?;
            println!("{}", path.display());
        }
        "document" => {
            let id = args
                .get(1)
                .context("缺少工单ID: document <工单ID> [目录]")?;
            let dir = output_dir(args.get(2))?;
            let path = state.work_order_api.write_document(id, &locale, &dir)?;
            println!("{}", path.display());
        }
        "config" => {
            let config = state.config_api.get_dashboard_config()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        "watch" => {
            // 常驻模式: 数据变更后自动刷新驾驶舱，Ctrl+C 退出
            let receiver = state
                .take_change_receiver()
                .context("变更事件接收端已被占用")?;
            let worker = spawn_refresh_worker(state.dashboard_api.clone(), receiver);
            state.dashboard_api.refresh(Utc::now())?;

            tokio::signal::ctrl_c().await?;
            tracing::info!("收到退出信号");
            worker.abort();
        }
        other => bail!("未知命令: {}", other),
    }

    Ok(())
}

fn output_dir(arg: Option<&String>) -> anyhow::Result<PathBuf> {
    match arg {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => std::env::current_dir().context("无法读取当前目录"),
    }
}
