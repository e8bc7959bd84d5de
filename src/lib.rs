// ==========================================
// 시트 관리 도구 - 核心库
// ==========================================
// 系统定位: 表格型文档之上的通用记录 CRUD 管理层
// 技术栈: Tauri + Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ko");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格值/配置/记录
pub mod domain;

// 数据仓储层 - 表格宿主
pub mod repository;

// 配置层 - 启动配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 桥接与传输
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{CellValue, ColumnSpec, NewSheetConfig, Record, RecordInput, SheetConfig};

// 表格宿主
pub use repository::{SheetHost, SqliteSheetHost};

// API
pub use api::{ApiError, ConfigRegistry, RecordStore};

// 应用
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Google Sheet CRUD 관리 도구";
