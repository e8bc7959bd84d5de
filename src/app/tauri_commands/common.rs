use serde::Serialize;

// ==========================================
// 公共工具：响应序列化
// ==========================================

/// 将桥接层返回值序列化为JSON字符串（Tauri要求）
pub(super) fn to_response<T: Serialize>(reply: &T) -> Result<String, String> {
    serde_json::to_string(reply).map_err(|e| format!("序列化失败: {}", e))
}
