// ==========================================
// 시트 관리 도구 - 记录 CRUD API
// ==========================================
// 职责: 任意已命名工作表数据行的查询/新增/修改/删除
// 约定: 字段键按位置对应列；row_index 每次读取时重新计算
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{project_record, CellValue, Record, RecordInput, HEADER_ROW_INDEX};
use crate::repository::{SheetHost, SheetInfo};

/// 日期单元格的输出格式（yyyy-MM-dd）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// RecordStore - 记录存取
// ==========================================
pub struct RecordStore {
    host: Arc<dyn SheetHost>,
}

impl RecordStore {
    pub fn new(host: Arc<dyn SheetHost>) -> Self {
        Self { host }
    }

    fn require_sheet(&self, sheet_name: &str) -> ApiResult<SheetInfo> {
        self.host
            .find_sheet(sheet_name)?
            .ok_or_else(|| ApiError::NotFound(sheet_name.to_string()))
    }

    /// 查询工作表的全部数据行
    ///
    /// # 参数
    /// - sheet_name: 工作表名称
    /// - keys: 字段键（按列位置），缺失或为空时使用表头文本
    /// - search_query: 检索词（trim 后为空则不过滤）
    pub fn list(
        &self,
        sheet_name: &str,
        keys: &[String],
        search_query: Option<&str>,
    ) -> ApiResult<Vec<Record>> {
        self.require_sheet(sheet_name)?;

        let last_row = self.host.last_row(sheet_name)?;
        let last_col = self.host.last_column(sheet_name)?;
        if last_row <= HEADER_ROW_INDEX || last_col == 0 {
            return Ok(Vec::new());
        }

        let data = self.host.get_values(
            sheet_name,
            (HEADER_ROW_INDEX + 1) as i64,
            1,
            (last_row - HEADER_ROW_INDEX) as i64,
            last_col as i64,
        )?;
        let headers = self
            .host
            .get_values(sheet_name, HEADER_ROW_INDEX as i64, 1, 1, last_col as i64)?
            .into_iter()
            .next()
            .unwrap_or_default();

        let records: Vec<Record> = data
            .into_iter()
            .enumerate()
            .map(|(offset, row)| self.build_record(offset, row, keys, &headers))
            .collect();

        let query = search_query.unwrap_or_default().trim().to_lowercase();
        if query.is_empty() {
            tracing::debug!(sheet = sheet_name, count = records.len(), "读取数据行");
            return Ok(records);
        }

        let matched: Vec<Record> = records.into_iter().filter(|r| r.matches(&query)).collect();
        tracing::debug!(sheet = sheet_name, query = %query, count = matched.len(), "检索数据行");
        Ok(matched)
    }

    fn build_record(&self, offset: usize, row: Vec<CellValue>, keys: &[String], headers: &[CellValue]) -> Record {
        let mut record = Record::new(HEADER_ROW_INDEX + 1 + offset as u32);

        for (col, value) in row.into_iter().enumerate() {
            let key = match keys.get(col).filter(|k| !k.is_empty()) {
                Some(key) => key.clone(),
                None => headers.get(col).map(|h| h.to_string()).unwrap_or_default(),
            };
            record.set(key, self.render_value(value));
        }

        record
    }

    /// 日期按文档时区格式化为 yyyy-MM-dd，失败时退回通用字符串
    fn render_value(&self, value: CellValue) -> CellValue {
        match value {
            CellValue::Date(date) => match self.host.format_date(&date, DATE_FORMAT) {
                Ok(formatted) => CellValue::Text(formatted),
                Err(e) => {
                    tracing::warn!("日期格式化失败: {}", e);
                    CellValue::Text(CellValue::Date(date).to_string())
                }
            },
            other => other,
        }
    }

    /// 追加新记录（按 keys 顺序投影，缺失键写为空）
    pub fn create(&self, sheet_name: &str, keys: &[String], record: &RecordInput) -> ApiResult<()> {
        self.require_sheet(sheet_name)?;

        let row = project_record(keys, record);
        let written = self.host.append_row(sheet_name, &row)?;

        tracing::info!(sheet = sheet_name, row_index = written, "新增记录");
        Ok(())
    }

    /// 覆盖指定行的第 1..=keys.len() 列
    ///
    /// 注意: 不校验 row_index 是否为表头或超出最后一行；
    /// 超出网格的行号由宿主拒绝（StoreFault）
    pub fn update(
        &self,
        sheet_name: &str,
        keys: &[String],
        row_index: i64,
        record: &RecordInput,
    ) -> ApiResult<()> {
        self.require_sheet(sheet_name)?;

        let row = project_record(keys, record);
        self.host.set_values(sheet_name, row_index, 1, &[row])?;

        tracing::info!(sheet = sheet_name, row_index, "修改记录");
        Ok(())
    }

    /// 删除指定行（表头与越界行号返回 RangeError）
    pub fn delete(&self, sheet_name: &str, row_index: i64) -> ApiResult<()> {
        self.require_sheet(sheet_name)?;

        let last_row = self.host.last_row(sheet_name)?;
        if row_index <= HEADER_ROW_INDEX as i64 || row_index > last_row as i64 {
            return Err(ApiError::RangeError { row_index, last_row });
        }

        self.host.delete_row(sheet_name, row_index)?;

        tracing::info!(sheet = sheet_name, row_index, "删除记录");
        Ok(())
    }
}
