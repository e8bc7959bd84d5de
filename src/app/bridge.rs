// ==========================================
// 시트 관리 도구 - 前端桥接（序列化边界）
// ==========================================
// 职责: 将 API 结果转换为可序列化的纯值返回给前端
// 约定: 边界处不抛出错误；所有失败都以 {error, code} / {success:false} 形状返回
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::ApiError;
use crate::app::state::AppState;
use crate::domain::{ColumnSpec, NewSheetConfig, Record, RecordInput, SheetConfig};
use crate::i18n::{t, t_with_args};

// ==========================================
// 返回形状
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// 本地化的错误消息
    pub error: String,

    /// 错误代码
    pub code: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    pub fn invalid_request(detail: &str) -> Self {
        Self::new(
            t_with_args("error.invalid_request", &[("detail", detail)]),
            INVALID_REQUEST,
        )
    }
}

/// 成功载荷或错误对象
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Ok(T),
    Err(ErrorReply),
}

impl<T> Reply<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }
}

/// 写操作成功响应: {message, error: null}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageReply {
    pub message: String,
    pub error: Option<String>,
}

impl MessageReply {
    fn new(message: String) -> Self {
        Self {
            message,
            error: None,
        }
    }
}

/// 注册响应: {success, message}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterReply {
    pub success: bool,
    pub message: String,
}

/// 请求格式错误的错误代码
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

// ==========================================
// 错误映射
// ==========================================

/// 将 ApiError 转换为面向前端的错误对象
pub fn map_api_error(operation: &str, err: &ApiError) -> ErrorReply {
    tracing::warn!(operation, code = err.code(), "{}", err);
    ErrorReply::new(localize_error(err), err.code())
}

fn localize_error(err: &ApiError) -> String {
    match err {
        ApiError::NotFound(sheet) => t_with_args("error.sheet_not_found", &[("sheet", sheet.as_str())]),
        ApiError::ValidationError(_) => t("config.invalid_headers"),
        ApiError::Duplicate(_) => t("config.duplicate"),
        ApiError::RangeError { .. } => t("error.invalid_row"),
        ApiError::StoreFault(detail) => t_with_args("error.store_fault", &[("detail", detail.as_str())]),
    }
}

fn into_reply<T>(operation: &str, result: Result<T, ApiError>) -> Reply<T> {
    match result {
        Ok(value) => Reply::Ok(value),
        Err(err) => Reply::Err(map_api_error(operation, &err)),
    }
}

// ==========================================
// 工作表配置
// ==========================================

/// 查询所有工作表配置
pub fn get_sheet_configs(state: &AppState) -> Reply<Vec<SheetConfig>> {
    into_reply("getSheetConfigs", state.config_registry.list())
}

/// 注册新的工作表配置
pub fn create_sheet_config(state: &AppState, config: &NewSheetConfig) -> RegisterReply {
    match state.config_registry.register(config) {
        Ok(()) => RegisterReply {
            success: true,
            message: t_with_args("config.registered", &[("title", config.title.as_str())]),
        },
        Err(err) => {
            tracing::warn!(operation = "createSheetConfig", code = err.code(), "{}", err);
            let message = match &err {
                ApiError::ValidationError(_) | ApiError::Duplicate(_) => localize_error(&err),
                ApiError::StoreFault(detail) => {
                    t_with_args("config.register_failed", &[("detail", detail.as_str())])
                }
                other => {
                    let detail = localize_error(other);
                    t_with_args("config.register_failed", &[("detail", detail.as_str())])
                }
            };
            RegisterReply {
                success: false,
                message,
            }
        }
    }
}

/// 注册新的工作表配置（未解析的前端参数）
///
/// 参数缺失或不是对象时同样返回 {success: false, message}
pub fn create_sheet_config_json(state: &AppState, config: &Value) -> RegisterReply {
    match NewSheetConfig::deserialize(config) {
        Ok(parsed) => create_sheet_config(state, &parsed),
        Err(e) => {
            tracing::warn!(operation = "createSheetConfig", "注册参数解析失败: {}", e);
            let detail = e.to_string();
            RegisterReply {
                success: false,
                message: t_with_args("config.register_failed", &[("detail", detail.as_str())]),
            }
        }
    }
}

/// 已注册工作表的列定义
pub fn get_sheet_columns(state: &AppState, sheet_name: &str) -> Reply<Vec<ColumnSpec>> {
    into_reply("getSheetColumns", state.config_registry.columns(sheet_name))
}

// ==========================================
// 记录 CRUD
// ==========================================

/// 查询工作表数据
pub fn get_spreadsheet_data(
    state: &AppState,
    sheet_name: &str,
    keys: &[String],
    search_query: Option<&str>,
) -> Reply<Vec<Record>> {
    into_reply(
        "getSpreadsheetData",
        state.record_store.list(sheet_name, keys, search_query),
    )
}

/// 新增记录
pub fn create_record(
    state: &AppState,
    sheet_name: &str,
    keys: &[String],
    record: &RecordInput,
) -> Reply<MessageReply> {
    let result = state
        .record_store
        .create(sheet_name, keys, record)
        .map(|()| MessageReply::new(t("record.created")));
    into_reply("createRecord", result)
}

/// 修改记录
pub fn update_record(
    state: &AppState,
    sheet_name: &str,
    keys: &[String],
    row_index: i64,
    record: &RecordInput,
) -> Reply<MessageReply> {
    let result = state
        .record_store
        .update(sheet_name, keys, row_index, record)
        .map(|()| MessageReply::new(t("record.updated")));
    into_reply("updateRecord", result)
}

/// 删除记录
pub fn delete_record(state: &AppState, sheet_name: &str, row_index: i64) -> Reply<MessageReply> {
    let result = state
        .record_store
        .delete(sheet_name, row_index)
        .map(|()| MessageReply::new(t("record.deleted")));
    into_reply("deleteRecord", result)
}

// ==========================================
// 按命令名分发（stdio 桥接使用）
// ==========================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetNameArgs {
    sheet_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSheetConfigArgs {
    #[serde(default)]
    config: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetDataArgs {
    sheet_name: String,
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    search_query: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRecordArgs {
    sheet_name: String,
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    record: RecordInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRecordArgs {
    sheet_name: String,
    #[serde(default)]
    keys: Vec<String>,
    row_index: i64,
    #[serde(default)]
    record: RecordInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRecordArgs {
    sheet_name: String,
    row_index: i64,
}

/// 支持的命令名
pub const COMMANDS: [&str; 7] = [
    "getSheetConfigs",
    "createSheetConfig",
    "getSheetColumns",
    "getSpreadsheetData",
    "createRecord",
    "updateRecord",
    "deleteRecord",
];

/// 按命令名执行并返回 JSON 结果
///
/// 未知命令或参数格式错误返回 {error, code: "INVALID_REQUEST"}
pub fn dispatch(state: &AppState, command: &str, args: Value) -> Value {
    match command {
        "getSheetConfigs" => to_json(&get_sheet_configs(state)),
        "createSheetConfig" => with_args(command, args, |a: CreateSheetConfigArgs| {
            to_json(&create_sheet_config_json(state, &a.config))
        }),
        "getSheetColumns" => with_args(command, args, |a: SheetNameArgs| {
            to_json(&get_sheet_columns(state, &a.sheet_name))
        }),
        "getSpreadsheetData" => with_args(command, args, |a: SpreadsheetDataArgs| {
            to_json(&get_spreadsheet_data(
                state,
                &a.sheet_name,
                &a.keys,
                a.search_query.as_deref(),
            ))
        }),
        "createRecord" => with_args(command, args, |a: CreateRecordArgs| {
            to_json(&create_record(state, &a.sheet_name, &a.keys, &a.record))
        }),
        "updateRecord" => with_args(command, args, |a: UpdateRecordArgs| {
            to_json(&update_record(state, &a.sheet_name, &a.keys, a.row_index, &a.record))
        }),
        "deleteRecord" => with_args(command, args, |a: DeleteRecordArgs| {
            to_json(&delete_record(state, &a.sheet_name, a.row_index))
        }),
        unknown => {
            tracing::warn!(command = unknown, "未知命令");
            to_json(&ErrorReply::new(
                t_with_args("error.unknown_command", &[("command", unknown)]),
                INVALID_REQUEST,
            ))
        }
    }
}

fn with_args<A, F>(command: &str, args: Value, handler: F) -> Value
where
    A: serde::de::DeserializeOwned,
    F: FnOnce(A) -> Value,
{
    let args = if args.is_null() { json!({}) } else { args };
    match serde_json::from_value::<A>(args) {
        Ok(parsed) => handler(parsed),
        Err(e) => {
            tracing::warn!(command, "参数解析失败: {}", e);
            to_json(&ErrorReply::invalid_request(&e.to_string()))
        }
    }
}

/// 序列化为 JSON 值；失败时同样返回错误形状
pub fn to_json<T: Serialize>(reply: &T) -> Value {
    serde_json::to_value(reply).unwrap_or_else(|e| {
        json!({ "error": e.to_string(), "code": INVALID_REQUEST })
    })
}
