// ==========================================
// 시트 관리 도구 - SQLite 表格宿主
// ==========================================
// 职责: 以 SQLite 持久化整个表格文档
// 存储: sheet_meta（工作表）/ sheet_cell（非空单元格）/ spreadsheet_setting（文档设置）
// 红线: 仓储不含业务逻辑,只做行列区域的读写映射
// ==========================================

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::db::{open_in_memory_connection, open_sqlite_connection, CURRENT_SCHEMA_VERSION};
use crate::domain::CellValue;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sheet_host::{check_range, parse_utc_offset, SheetHost, SheetInfo};

/// 文档时区设置键
pub const TIME_ZONE_SETTING_KEY: &str = "time_zone";

pub struct SqliteSheetHost {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSheetHost {
    /// 打开（或创建）文档数据库
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 内存文档（测试用）
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = open_in_memory_connection()?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let host = Self { conn };
        host.ensure_schema()?;
        Ok(host)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
              version INTEGER PRIMARY KEY,
              applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS spreadsheet_setting (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sheet_meta (
              sheet_id TEXT PRIMARY KEY,
              sheet_name TEXT NOT NULL UNIQUE,
              position INTEGER NOT NULL,
              frozen_rows INTEGER NOT NULL DEFAULT 0,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS sheet_cell (
              sheet_id TEXT NOT NULL REFERENCES sheet_meta(sheet_id) ON DELETE CASCADE,
              row_idx INTEGER NOT NULL,
              col_idx INTEGER NOT NULL,
              value_type TEXT NOT NULL,
              value_text TEXT NOT NULL,
              PRIMARY KEY (sheet_id, row_idx, col_idx)
            );

            CREATE INDEX IF NOT EXISTS idx_sheet_cell_col
              ON sheet_cell(sheet_id, col_idx);
            "#,
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![CURRENT_SCHEMA_VERSION],
        )?;
        Ok(())
    }

    // ==========================================
    // 文档设置
    // ==========================================

    /// 设置文档时区（UTC 偏移）
    pub fn set_time_zone(&self, time_zone: &str) -> RepositoryResult<()> {
        if parse_utc_offset(time_zone).is_none() {
            return Err(RepositoryError::InvalidTimeZone(time_zone.to_string()));
        }
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO spreadsheet_setting (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![TIME_ZONE_SETTING_KEY, time_zone.trim()],
        )?;
        Ok(())
    }

    /// 文档尚未设置时区时写入默认值；返回是否写入
    pub fn ensure_time_zone(&self, default_time_zone: &str) -> RepositoryResult<bool> {
        if self.read_setting(TIME_ZONE_SETTING_KEY)?.is_some() {
            return Ok(false);
        }
        self.set_time_zone(default_time_zone)?;
        Ok(true)
    }

    fn read_setting(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM spreadsheet_setting WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl SheetHost for SqliteSheetHost {
    fn find_sheet(&self, name: &str) -> RepositoryResult<Option<SheetInfo>> {
        let conn = self.get_conn()?;
        query_sheet(&conn, name)
    }

    fn insert_sheet(&self, name: &str, position: Option<u32>) -> RepositoryResult<SheetInfo> {
        if name.trim().is_empty() {
            return Err(RepositoryError::InvalidSheetName(name.to_string()));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        if query_sheet(&tx, name)?.is_some() {
            return Err(RepositoryError::DuplicateSheet(name.to_string()));
        }

        let count: u32 = tx.query_row("SELECT COUNT(*) FROM sheet_meta", [], |row| row.get(0))?;
        let position = position.map(|p| p.min(count)).unwrap_or(count);

        tx.execute(
            "UPDATE sheet_meta SET position = position + 1 WHERE position >= ?1",
            params![position],
        )?;

        let info = SheetInfo {
            sheet_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            position,
            frozen_rows: 0,
        };
        tx.execute(
            "INSERT INTO sheet_meta (sheet_id, sheet_name, position, frozen_rows) VALUES (?1, ?2, ?3, 0)",
            params![info.sheet_id, info.name, info.position],
        )?;
        tx.commit()?;

        tracing::debug!(sheet = name, position, "insert_sheet");
        Ok(info)
    }

    fn list_sheets(&self) -> RepositoryResult<Vec<SheetInfo>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT sheet_id, sheet_name, position, frozen_rows FROM sheet_meta ORDER BY position",
        )?;
        let sheets = stmt
            .query_map([], map_sheet_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sheets)
    }

    fn get_values(
        &self,
        sheet: &str,
        row: i64,
        col: i64,
        num_rows: i64,
        num_cols: i64,
    ) -> RepositoryResult<Vec<Vec<CellValue>>> {
        let (row, col, num_rows, num_cols) = check_range(row, col, num_rows, num_cols)?;
        let conn = self.get_conn()?;
        let sheet_id = require_sheet_id(&conn, sheet)?;

        let mut grid = vec![vec![CellValue::Empty; num_cols as usize]; num_rows as usize];

        let mut stmt = conn.prepare(
            r#"
            SELECT row_idx, col_idx, value_type, value_text
            FROM sheet_cell
            WHERE sheet_id = ?1
              AND row_idx BETWEEN ?2 AND ?3
              AND col_idx BETWEEN ?4 AND ?5
            "#,
        )?;
        let cells = stmt.query_map(
            params![
                sheet_id,
                row,
                row as i64 + num_rows as i64 - 1,
                col,
                col as i64 + num_cols as i64 - 1
            ],
            |r| {
                Ok((
                    r.get::<_, u32>(0)?,
                    r.get::<_, u32>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )?;

        for cell in cells {
            let (r, c, value_type, value_text) = cell?;
            grid[(r - row) as usize][(c - col) as usize] = decode_cell(&value_type, &value_text)?;
        }

        Ok(grid)
    }

    fn set_values(&self, sheet: &str, row: i64, col: i64, values: &[Vec<CellValue>]) -> RepositoryResult<()> {
        let num_rows = values.len() as i64;
        let num_cols = values.first().map(|r| r.len()).unwrap_or(0) as i64;
        let (row, col, _, num_cols_u) = check_range(row, col, num_rows, num_cols)?;
        if values.iter().any(|r| r.len() as u32 != num_cols_u) {
            return Err(RepositoryError::InternalError(
                "写入区域的各行列数不一致".to_string(),
            ));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let sheet_id = require_sheet_id(&tx, sheet)?;

        for (r_offset, cells) in values.iter().enumerate() {
            write_row(&tx, &sheet_id, row + r_offset as u32, col, cells)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn last_row(&self, sheet: &str) -> RepositoryResult<u32> {
        let conn = self.get_conn()?;
        let sheet_id = require_sheet_id(&conn, sheet)?;
        max_index(&conn, &sheet_id, "row_idx")
    }

    fn last_column(&self, sheet: &str) -> RepositoryResult<u32> {
        let conn = self.get_conn()?;
        let sheet_id = require_sheet_id(&conn, sheet)?;
        max_index(&conn, &sheet_id, "col_idx")
    }

    fn append_row(&self, sheet: &str, values: &[CellValue]) -> RepositoryResult<u32> {
        if values.is_empty() {
            return Err(RepositoryError::invalid_range(0, 1, 1, 0));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let sheet_id = require_sheet_id(&tx, sheet)?;

        let row = max_index(&tx, &sheet_id, "row_idx")?
            .checked_add(1)
            .ok_or_else(|| RepositoryError::invalid_range(i64::from(u32::MAX), 1, 1, values.len() as i64))?;
        check_range(i64::from(row), 1, 1, values.len() as i64)?;
        write_row(&tx, &sheet_id, row, 1, values)?;

        tx.commit()?;
        Ok(row)
    }

    fn delete_row(&self, sheet: &str, row: i64) -> RepositoryResult<()> {
        let (row, _, _, _) = check_range(row, 1, 1, 1)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let sheet_id = require_sheet_id(&tx, sheet)?;

        tx.execute(
            "DELETE FROM sheet_cell WHERE sheet_id = ?1 AND row_idx = ?2",
            params![sheet_id, row],
        )?;
        // 两步移动，避免主键在逐行更新时冲突
        tx.execute(
            "UPDATE sheet_cell SET row_idx = -(row_idx - 1) WHERE sheet_id = ?1 AND row_idx > ?2",
            params![sheet_id, row],
        )?;
        tx.execute(
            "UPDATE sheet_cell SET row_idx = -row_idx WHERE sheet_id = ?1 AND row_idx < 0",
            params![sheet_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn set_frozen_rows(&self, sheet: &str, rows: u32) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE sheet_meta SET frozen_rows = ?1 WHERE sheet_name = ?2",
            params![rows, sheet],
        )?;
        if affected == 0 {
            return Err(RepositoryError::SheetNotFound(sheet.to_string()));
        }
        Ok(())
    }

    fn time_zone(&self) -> RepositoryResult<FixedOffset> {
        match self.read_setting(TIME_ZONE_SETTING_KEY)? {
            Some(raw) => parse_utc_offset(&raw).ok_or(RepositoryError::InvalidTimeZone(raw)),
            None => FixedOffset::east_opt(0)
                .ok_or_else(|| RepositoryError::InternalError("UTC 偏移构造失败".to_string())),
        }
    }
}

// ==========================================
// 内部辅助函数
// ==========================================

fn map_sheet_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SheetInfo> {
    Ok(SheetInfo {
        sheet_id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        frozen_rows: row.get(3)?,
    })
}

fn query_sheet(conn: &Connection, name: &str) -> RepositoryResult<Option<SheetInfo>> {
    let info = conn
        .query_row(
            "SELECT sheet_id, sheet_name, position, frozen_rows FROM sheet_meta WHERE sheet_name = ?1",
            params![name],
            map_sheet_row,
        )
        .optional()?;
    Ok(info)
}

fn require_sheet_id(conn: &Connection, name: &str) -> RepositoryResult<String> {
    query_sheet(conn, name)?
        .map(|info| info.sheet_id)
        .ok_or_else(|| RepositoryError::SheetNotFound(name.to_string()))
}

fn max_index(conn: &Connection, sheet_id: &str, column: &str) -> RepositoryResult<u32> {
    let sql = format!(
        "SELECT COALESCE(MAX({}), 0) FROM sheet_cell WHERE sheet_id = ?1",
        column
    );
    let value: u32 = conn.query_row(&sql, params![sheet_id], |row| row.get(0))?;
    Ok(value)
}

fn write_row(
    tx: &Transaction<'_>,
    sheet_id: &str,
    row: u32,
    first_col: u32,
    cells: &[CellValue],
) -> RepositoryResult<()> {
    for (offset, value) in cells.iter().enumerate() {
        let col = first_col + offset as u32;
        match encode_cell(value) {
            None => {
                tx.execute(
                    "DELETE FROM sheet_cell WHERE sheet_id = ?1 AND row_idx = ?2 AND col_idx = ?3",
                    params![sheet_id, row, col],
                )?;
            }
            Some((value_type, value_text)) => {
                tx.execute(
                    r#"
                    INSERT INTO sheet_cell (sheet_id, row_idx, col_idx, value_type, value_text)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(sheet_id, row_idx, col_idx) DO UPDATE SET
                        value_type = excluded.value_type,
                        value_text = excluded.value_text
                    "#,
                    params![sheet_id, row, col, value_type, value_text],
                )?;
            }
        }
    }
    Ok(())
}

/// 单元格编码为 (类型, 文本)；空单元格不落库
fn encode_cell(value: &CellValue) -> Option<(&'static str, String)> {
    match value {
        CellValue::Empty => None,
        CellValue::Text(s) if s.is_empty() => None,
        CellValue::Text(s) => Some(("text", s.clone())),
        CellValue::Number(n) => Some(("number", n.to_string())),
        CellValue::Bool(b) => Some(("bool", b.to_string())),
        CellValue::Date(d) => Some(("date", d.to_rfc3339_opts(SecondsFormat::Millis, true))),
    }
}

fn decode_cell(value_type: &str, value_text: &str) -> RepositoryResult<CellValue> {
    let corrupt = |message: String| RepositoryError::CorruptCell {
        value_type: value_type.to_string(),
        message,
    };

    match value_type {
        "text" => Ok(CellValue::Text(value_text.to_string())),
        "number" => value_text
            .parse::<f64>()
            .map(CellValue::Number)
            .map_err(|e| corrupt(e.to_string())),
        "bool" => value_text
            .parse::<bool>()
            .map(CellValue::Bool)
            .map_err(|e| corrupt(e.to_string())),
        "date" => DateTime::parse_from_rfc3339(value_text)
            .map(|d| CellValue::Date(d.with_timezone(&Utc)))
            .map_err(|e| corrupt(e.to_string())),
        other => Err(corrupt(format!("未知的单元格类型: {}", other))),
    }
}

#[cfg(test)]
mod tests;
