// ==========================================
// 시트 관리 도구 - Tauri 命令（按域拆分）
// ==========================================
// 职责: Tauri 命令定义,连接前端与桥接层
// 说明: 命令返回 JSON 字符串；业务失败以 {error, code} 形状放在 Ok 中
// ==========================================

#![cfg(feature = "tauri-app")]

mod common;
mod config;
mod record;

pub use config::*;
pub use record::*;
