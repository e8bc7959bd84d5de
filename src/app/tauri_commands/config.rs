use serde_json::Value;

use crate::app::bridge;
use crate::app::state::AppState;

use super::common::to_response;

// ==========================================
// 工作表配置相关命令
// ==========================================

/// 查询所有已注册的工作表配置
#[tauri::command(rename_all = "snake_case")]
pub async fn get_sheet_configs(state: tauri::State<'_, AppState>) -> Result<String, String> {
    to_response(&bridge::get_sheet_configs(&state))
}

/// 注册新的工作表配置（同时创建数据工作表）
#[tauri::command(rename_all = "snake_case")]
pub async fn create_sheet_config(
    state: tauri::State<'_, AppState>,
    config: Option<Value>,
) -> Result<String, String> {
    let config = config.unwrap_or(Value::Null);
    to_response(&bridge::create_sheet_config_json(&state, &config))
}

/// 查询已注册工作表的列定义
#[tauri::command(rename_all = "snake_case")]
pub async fn get_sheet_columns(
    state: tauri::State<'_, AppState>,
    sheet_name: String,
) -> Result<String, String> {
    to_response(&bridge::get_sheet_columns(&state, &sheet_name))
}
