// ==========================================
// 시트 관리 도구 - 主入口
// ==========================================
// tauri-app 特性: 启动桌面应用
// 默认: stdio 行协议桥接（stdout 只输出响应，日志走 stderr）
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(
    all(feature = "tauri-app", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use sheet_admin::app::AppState;
use sheet_admin::config::AppConfig;

#[cfg(feature = "tauri-app")]
fn main() -> anyhow::Result<()> {
    use sheet_admin::app::tauri_commands::*;

    // 初始化日志系统
    sheet_admin::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", sheet_admin::APP_NAME);
    tracing::info!("系统版本: {}", sheet_admin::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env()?;
    tracing::info!("使用文档: {}", config.db_path);

    tracing::info!("正在初始化AppState...");
    let app_state = AppState::new(&config).map_err(anyhow::Error::msg)?;
    tracing::info!("AppState初始化成功");

    tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 工作表配置相关命令 (3个)
            // ==========================================
            get_sheet_configs,
            create_sheet_config,
            get_sheet_columns,

            // ==========================================
            // 记录 CRUD 相关命令 (4个)
            // ==========================================
            get_spreadsheet_data,
            create_record,
            update_record,
            delete_record,
        ])
        .run(tauri::generate_context!())?;

    tracing::info!("Tauri应用已退出");
    Ok(())
}

#[cfg(not(feature = "tauri-app"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;
    use tokio::io::BufReader;

    sheet_admin::logging::init();

    tracing::info!("{} {}", sheet_admin::APP_NAME, sheet_admin::VERSION);

    let config = AppConfig::from_env()?;
    tracing::info!(db_path = %config.db_path, time_zone = %config.time_zone, locale = %config.locale, "启动配置");

    let state = Arc::new(AppState::new(&config).map_err(anyhow::Error::msg)?);
    tracing::info!(
        commands = ?sheet_admin::app::bridge::COMMANDS,
        "stdio 桥接就绪"
    );

    let handled = sheet_admin::app::stdio_bridge::run(
        state,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!(handled, "stdio 桥接已退出");
    Ok(())
}
