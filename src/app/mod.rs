// ==========================================
// 시트 관리 도구 - 应用层
// ==========================================
// 职责: 序列化边界与传输层（Tauri / stdio）
// ==========================================

pub mod bridge;
pub mod state;
pub mod stdio_bridge;
pub mod tauri_commands;

// 重导出
pub use state::AppState;

#[cfg(feature = "tauri-app")]
pub use tauri_commands::*;
