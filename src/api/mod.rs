// ==========================================
// 시트 관리 도구 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供桥接层（Tauri 命令 / stdio）调用
// ==========================================

pub mod config_registry_api;
pub mod error;
pub mod record_api;

// 重导出核心类型
pub use config_registry_api::ConfigRegistry;
pub use error::{ApiError, ApiResult};
pub use record_api::{RecordStore, DATE_FORMAT};
