// ==========================================
// 시트 관리 도구 - 表格宿主接口
// ==========================================
// 职责: 抽象后端表格文档（按名称定位工作表，按行列区域读写）
// 约定: 行列均为 1-based；last_row/last_column 为最后一个非空单元格所在行/列
// ==========================================

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt::Write as _;

use crate::domain::CellValue;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 工作表元信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub sheet_id: String,
    pub name: String,
    /// 在文档中的位置（0-based）
    pub position: u32,
    pub frozen_rows: u32,
}

/// 表格宿主
///
/// 每次调用自身是原子的；跨调用没有事务边界
pub trait SheetHost: Send + Sync {
    /// 按名称查找工作表（不存在返回 None）
    fn find_sheet(&self, name: &str) -> RepositoryResult<Option<SheetInfo>>;

    /// 在指定位置插入工作表；None 表示追加到末尾
    fn insert_sheet(&self, name: &str, position: Option<u32>) -> RepositoryResult<SheetInfo>;

    /// 按位置顺序列出所有工作表
    fn list_sheets(&self) -> RepositoryResult<Vec<SheetInfo>>;

    /// 读取矩形区域，空单元格为 CellValue::Empty
    fn get_values(
        &self,
        sheet: &str,
        row: i64,
        col: i64,
        num_rows: i64,
        num_cols: i64,
    ) -> RepositoryResult<Vec<Vec<CellValue>>>;

    /// 写入矩形区域（左上角为 row/col），写入 Empty 即清空单元格
    fn set_values(&self, sheet: &str, row: i64, col: i64, values: &[Vec<CellValue>]) -> RepositoryResult<()>;

    fn last_row(&self, sheet: &str) -> RepositoryResult<u32>;

    fn last_column(&self, sheet: &str) -> RepositoryResult<u32>;

    /// 在最后一行之后追加一行，返回写入的行号
    fn append_row(&self, sheet: &str, values: &[CellValue]) -> RepositoryResult<u32>;

    /// 删除物理行，其后各行上移一行
    fn delete_row(&self, sheet: &str, row: i64) -> RepositoryResult<()>;

    fn set_frozen_rows(&self, sheet: &str, rows: u32) -> RepositoryResult<()>;

    /// 文档时区
    fn time_zone(&self) -> RepositoryResult<FixedOffset>;

    /// 按文档时区格式化日期（chrono 格式串）
    fn format_date(&self, value: &DateTime<Utc>, pattern: &str) -> RepositoryResult<String> {
        let tz = self.time_zone()?;
        let mut out = String::new();
        write!(out, "{}", value.with_timezone(&tz).format(pattern))
            .map_err(|_| RepositoryError::InternalError(format!("无效的日期格式: {}", pattern)))?;
        Ok(out)
    }
}

/// 网格最大行数（区域越过此行即越界）
pub const MAX_GRID_ROWS: u32 = 1_000_000;

/// 网格最大列数
pub const MAX_GRID_COLUMNS: u32 = 18_278;

/// 单次读写区域的最大单元格数
pub const MAX_GRID_CELLS: u64 = 10_000_000;

/// 校验区域参数并转换为无符号坐标
///
/// 区域必须完全落在 MAX_GRID_ROWS x MAX_GRID_COLUMNS 网格内
pub fn check_range(row: i64, col: i64, num_rows: i64, num_cols: i64) -> RepositoryResult<(u32, u32, u32, u32)> {
    let to_u32 = |v: i64| u32::try_from(v).ok().filter(|v| *v > 0);
    let out_of_range = || RepositoryError::invalid_range(row, col, num_rows, num_cols);

    let (r, c, nr, nc) = match (to_u32(row), to_u32(col), to_u32(num_rows), to_u32(num_cols)) {
        (Some(r), Some(c), Some(nr), Some(nc)) => (r, c, nr, nc),
        _ => return Err(out_of_range()),
    };

    let last_row = u64::from(r) + u64::from(nr) - 1;
    let last_col = u64::from(c) + u64::from(nc) - 1;
    if last_row > u64::from(MAX_GRID_ROWS)
        || last_col > u64::from(MAX_GRID_COLUMNS)
        || u64::from(nr) * u64::from(nc) > MAX_GRID_CELLS
    {
        return Err(out_of_range());
    }

    Ok((r, c, nr, nc))
}

/// 解析 UTC 偏移（"UTC" / "Z" / "+09:00" / "+0900" / "-05"）
pub fn parse_utc_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("utc") || text.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match text.chars().next()? {
        '+' => (1, &text[1..]),
        '-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
