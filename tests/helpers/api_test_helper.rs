// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;

use sheet_admin::api::{ConfigRegistry, RecordStore};
use sheet_admin::app::AppState;
use sheet_admin::config::AppConfig;
use sheet_admin::domain::{NewSheetConfig, RecordInput};
use sheet_admin::repository::SheetHost;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 基于临时文档构建完整的 AppState
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境（文档时区 +09:00，语言 ko）
    pub fn new() -> Result<Self, String> {
        sheet_admin::logging::init_test();

        let temp_file =
            NamedTempFile::new().map_err(|e| format!("创建临时文档失败: {}", e))?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| "临时文件路径无效".to_string())?
            .to_string();

        let config = AppConfig {
            db_path: db_path.clone(),
            time_zone: "+09:00".to_string(),
            locale: "ko".to_string(),
        };
        let state = AppState::new(&config)?;

        Ok(Self {
            db_path,
            state,
            _temp_file: temp_file,
        })
    }

    pub fn host(&self) -> &Arc<dyn SheetHost> {
        &self.state.host
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.state.config_registry
    }

    pub fn store(&self) -> &RecordStore {
        &self.state.record_store
    }

    /// 拆分为共享状态与临时文件（临时文件需与状态同时存活）
    pub fn into_shared(self) -> (Arc<AppState>, NamedTempFile) {
        (Arc::new(self.state), self._temp_file)
    }

    /// 注册工作表（表头即字段键）
    pub fn register_sheet(&self, sheet_name: &str, headers: &[&str]) {
        self.registry()
            .register(&new_sheet_config(sheet_name, json!(headers)))
            .unwrap();
    }
}

// ==========================================
// 数据构造
// ==========================================

pub fn new_sheet_config(sheet_name: &str, headers: Value) -> NewSheetConfig {
    NewSheetConfig {
        sheet_name: sheet_name.to_string(),
        title: format!("{} 관리", sheet_name),
        headers,
        order: None,
        exposure: None,
    }
}

pub fn keys(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 从 json!({...}) 构造记录输入
pub fn record(value: Value) -> RecordInput {
    match value {
        Value::Object(map) => map,
        other => panic!("记录必须是 JSON 对象: {}", other),
    }
}
