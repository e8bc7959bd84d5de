// ==========================================
// 시트 관리 도구 - 领域模型层
// ==========================================
// 职责: 定义单元格值、工作表配置、数据行记录及其转换规则
// 红线: 不含数据访问逻辑
// ==========================================

pub mod cell;
pub mod record;
pub mod sheet_config;

// 重导出核心类型
pub use cell::CellValue;
pub use record::{project_record, Record, RecordInput};
pub use sheet_config::{
    coerce_order, ColumnSpec, NewSheetConfig, SheetConfig, CONFIG_COLUMN_COUNT, CONFIG_HEADERS,
    CONFIG_SHEET_NAME, DEFAULT_EXPOSURE, DEFAULT_ORDER, HEADER_ROW_INDEX,
};
