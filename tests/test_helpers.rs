// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时文档、宿主初始化等功能
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use tempfile::NamedTempFile;

use sheet_admin::domain::CellValue;
use sheet_admin::repository::{SheetHost, SqliteSheetHost};

/// 创建临时测试文档
///
/// # 返回
/// - NamedTempFile: 临时文档文件（需要保持存活）
/// - String: 文档文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是有效的 UTF-8")?
        .to_string();

    Ok((temp_file, db_path))
}

/// 打开测试文档并设置时区
pub fn open_test_host(db_path: &str, time_zone: &str) -> Result<SqliteSheetHost, Box<dyn Error>> {
    let host = SqliteSheetHost::new(db_path)?;
    host.set_time_zone(time_zone)?;
    Ok(host)
}

/// 读取整行（1..=num_cols 列）
pub fn read_row(host: &dyn SheetHost, sheet: &str, row: i64, num_cols: i64) -> Vec<CellValue> {
    host.get_values(sheet, row, 1, 1, num_cols)
        .unwrap()
        .into_iter()
        .next()
        .unwrap_or_default()
}
