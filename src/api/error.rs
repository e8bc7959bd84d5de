// ==========================================
// 시트 관리 도구 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为业务错误
// 说明: Display 为面向日志的开发者文本；面向前端的消息由 app::bridge 本地化
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 指定的工作表不存在
    #[error("工作表不存在: {0}")]
    NotFound(String),

    /// 注册请求的表头列表无效
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 工作表名称已注册
    #[error("工作表名称已注册: {0}")]
    Duplicate(String),

    /// 行号越界
    #[error("无效的行号: row_index={row_index}, last_row={last_row}")]
    RangeError { row_index: i64, last_row: u32 },

    /// 底层存储读写失败
    #[error("存储错误: {0}")]
    StoreFault(String),
}

impl ApiError {
    /// 错误代码（返回给前端）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::Duplicate(_) => "DUPLICATE",
            ApiError::RangeError { .. } => "RANGE_ERROR",
            ApiError::StoreFault(_) => "STORE_FAULT",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::SheetNotFound(name) => ApiError::NotFound(name),
            other => ApiError::StoreFault(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
