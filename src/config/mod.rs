// ==========================================
// 시트 관리 도구 - 配置层
// ==========================================
// 职责: 应用启动配置（文档路径、时区、语言）
// 存储: 环境变量
// ==========================================

pub mod app_config;

// 重导出核心配置
pub use app_config::{get_default_db_path, AppConfig, ConfigError};
