use crate::app::bridge;
use crate::app::state::AppState;
use crate::domain::RecordInput;

use super::common::to_response;

// ==========================================
// 记录 CRUD 相关命令
// ==========================================

/// 查询工作表数据（可选关键字过滤）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_spreadsheet_data(
    state: tauri::State<'_, AppState>,
    sheet_name: String,
    keys: Vec<String>,
    search_query: Option<String>,
) -> Result<String, String> {
    to_response(&bridge::get_spreadsheet_data(
        &state,
        &sheet_name,
        &keys,
        search_query.as_deref(),
    ))
}

/// 在工作表末尾追加记录
#[tauri::command(rename_all = "snake_case")]
pub async fn create_record(
    state: tauri::State<'_, AppState>,
    sheet_name: String,
    keys: Vec<String>,
    record: RecordInput,
) -> Result<String, String> {
    to_response(&bridge::create_record(&state, &sheet_name, &keys, &record))
}

/// 覆盖指定行
#[tauri::command(rename_all = "snake_case")]
pub async fn update_record(
    state: tauri::State<'_, AppState>,
    sheet_name: String,
    keys: Vec<String>,
    row_index: i64,
    record: RecordInput,
) -> Result<String, String> {
    to_response(&bridge::update_record(
        &state,
        &sheet_name,
        &keys,
        row_index,
        &record,
    ))
}

/// 删除指定行（下方行上移）
#[tauri::command(rename_all = "snake_case")]
pub async fn delete_record(
    state: tauri::State<'_, AppState>,
    sheet_name: String,
    row_index: i64,
) -> Result<String, String> {
    to_response(&bridge::delete_record(&state, &sheet_name, row_index))
}
