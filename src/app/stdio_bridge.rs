// ==========================================
// 시트 관리 도구 - stdio 桥接
// ==========================================
// 协议: 每行一个 JSON 请求 {"command": "...", "args": {...}}，每行一个 JSON 响应
// 说明: 请求按顺序逐个执行；空行忽略
// ==========================================

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::bridge::{dispatch, to_json, ErrorReply};
use crate::app::state::AppState;

#[derive(Debug, Deserialize)]
struct BridgeRequest {
    command: String,
    #[serde(default)]
    args: Value,
}

/// 运行 stdio 桥接循环，直到输入结束
///
/// # 返回
/// - Ok(usize): 已处理的请求数
/// - Err: 读写失败
pub async fn run<R, W>(state: Arc<AppState>, reader: R, mut writer: W) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = handle_line(state.clone(), line).await;
        let mut encoded = serde_json::to_string(&reply)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    tracing::info!(handled, "stdio 桥接输入结束");
    Ok(handled)
}

async fn handle_line(state: Arc<AppState>, line: &str) -> Value {
    let request: BridgeRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("请求解析失败: {}", e);
            return to_json(&ErrorReply::invalid_request(&e.to_string()));
        }
    };

    tracing::debug!(command = %request.command, "收到请求");

    // 存储访问为同步阻塞调用
    let result = tokio::task::spawn_blocking(move || {
        dispatch(&state, &request.command, request.args)
    })
    .await;

    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("请求执行失败: {}", e);
            to_json(&ErrorReply::new(e.to_string(), "INTERNAL_ERROR"))
        }
    }
}
