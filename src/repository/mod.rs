// ==========================================
// 시트 관리 도구 - 数据仓储层（表格宿主）
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供工作表/行列区域访问接口,屏蔽文档存储细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod sheet_host;
pub mod sqlite_sheet_host;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use sheet_host::{
    check_range, parse_utc_offset, SheetHost, SheetInfo, MAX_GRID_CELLS, MAX_GRID_COLUMNS,
    MAX_GRID_ROWS,
};
pub use sqlite_sheet_host::{SqliteSheetHost, TIME_ZONE_SETTING_KEY};
