// ==========================================
// 시트 관리 도구 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层（表格宿主）错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 工作表错误 =====
    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    #[error("工作表已存在: {0}")]
    DuplicateSheet(String),

    #[error("无效的工作表名称: {0:?}")]
    InvalidSheetName(String),

    #[error("无效的区域: row={row}, col={col}, rows={num_rows}, cols={num_cols}")]
    InvalidRange {
        row: i64,
        col: i64,
        num_rows: i64,
        num_cols: i64,
    },

    #[error("无效的时区: {0}")]
    InvalidTimeZone(String),

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("单元格数据损坏 (type={value_type}): {message}")]
    CorruptCell { value_type: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl RepositoryError {
    pub fn invalid_range(row: i64, col: i64, num_rows: i64, num_cols: i64) -> Self {
        RepositoryError::InvalidRange {
            row,
            col,
            num_rows,
            num_cols,
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
