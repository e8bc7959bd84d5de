// ==========================================
// 시트 관리 도구 - 工作表配置注册 API
// ==========================================
// 职责: SHEET_DATA 注册表的初始化、查询与新工作表注册
// 说明: 注册的两步写入（建表、追加注册行）之间没有补偿动作
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{
    ColumnSpec, NewSheetConfig, SheetConfig, CONFIG_COLUMN_COUNT, CONFIG_HEADERS,
    CONFIG_SHEET_NAME, HEADER_ROW_INDEX,
};
use crate::domain::CellValue;
use crate::repository::{SheetHost, SheetInfo};

// ==========================================
// ConfigRegistry - 工作表配置注册表
// ==========================================

/// 工作表配置注册表
///
/// 职责：
/// 1. 确保 SHEET_DATA 存在（首次调用时创建并冻结表头）
/// 2. 读取全部配置
/// 3. 注册新工作表（建表 + 追加注册行）
pub struct ConfigRegistry {
    host: Arc<dyn SheetHost>,
}

impl ConfigRegistry {
    pub fn new(host: Arc<dyn SheetHost>) -> Self {
        Self { host }
    }

    /// 获取注册表工作表，不存在时创建
    ///
    /// 新建的注册表位于文档首位，表头行冻结
    pub fn get_or_create(&self) -> ApiResult<SheetInfo> {
        if let Some(info) = self.host.find_sheet(CONFIG_SHEET_NAME)? {
            return Ok(info);
        }

        let info = self.host.insert_sheet(CONFIG_SHEET_NAME, Some(0))?;
        let header: Vec<CellValue> = CONFIG_HEADERS.iter().map(|h| CellValue::from(*h)).collect();
        self.host
            .set_values(CONFIG_SHEET_NAME, HEADER_ROW_INDEX as i64, 1, &[header])?;
        self.host.set_frozen_rows(CONFIG_SHEET_NAME, HEADER_ROW_INDEX)?;

        tracing::info!("已创建注册表工作表: {}", CONFIG_SHEET_NAME);
        Ok(info)
    }

    /// 查询所有工作表配置
    ///
    /// # 返回
    /// - Ok(Vec<SheetConfig>): 按注册表行顺序；无数据行时为空
    /// - Err(ApiError): 读取失败
    pub fn list(&self) -> ApiResult<Vec<SheetConfig>> {
        self.get_or_create()?;

        let last_row = self.host.last_row(CONFIG_SHEET_NAME)?;
        if last_row <= HEADER_ROW_INDEX {
            return Ok(Vec::new());
        }

        let rows = self.host.get_values(
            CONFIG_SHEET_NAME,
            (HEADER_ROW_INDEX + 1) as i64,
            1,
            (last_row - HEADER_ROW_INDEX) as i64,
            CONFIG_COLUMN_COUNT as i64,
        )?;

        let configs: Vec<SheetConfig> = rows.iter().map(|row| SheetConfig::from_row(row)).collect();
        tracing::debug!(count = configs.len(), "读取工作表配置");
        Ok(configs)
    }

    /// 按名称查询已注册的配置
    pub fn find(&self, sheet_name: &str) -> ApiResult<Option<SheetConfig>> {
        Ok(self.list()?.into_iter().find(|c| c.sheet_name == sheet_name))
    }

    /// 已注册工作表的列定义（键/标签对）
    pub fn columns(&self, sheet_name: &str) -> ApiResult<Vec<ColumnSpec>> {
        self.find(sheet_name)?
            .map(|config| config.columns())
            .ok_or_else(|| ApiError::NotFound(sheet_name.to_string()))
    }

    /// 注册新的工作表配置并创建工作表
    ///
    /// # 步骤
    /// 1. 校验表头（非空字符串数组）
    /// 2. 名称查重
    /// 3. 创建工作表（已存在则复用），写入并冻结表头
    /// 4. 追加注册行
    pub fn register(&self, config: &NewSheetConfig) -> ApiResult<()> {
        let headers = config.validated_headers().ok_or_else(|| {
            tracing::warn!("表头列表无效: {}", config.headers);
            ApiError::ValidationError(format!("headers 必须是非空字符串数组: {}", config.headers))
        })?;

        self.get_or_create()?;

        if self
            .list()?
            .iter()
            .any(|existing| existing.sheet_name == config.sheet_name)
        {
            return Err(ApiError::Duplicate(config.sheet_name.clone()));
        }

        if self.host.find_sheet(&config.sheet_name)?.is_none() {
            self.host.insert_sheet(&config.sheet_name, None)?;
        }
        let header_row: Vec<CellValue> = headers.iter().map(|h| CellValue::from(h.as_str())).collect();
        self.host
            .set_values(&config.sheet_name, HEADER_ROW_INDEX as i64, 1, &[header_row])?;
        self.host.set_frozen_rows(&config.sheet_name, HEADER_ROW_INDEX)?;

        self.host
            .append_row(CONFIG_SHEET_NAME, &config.registry_row(&headers))?;

        tracing::info!(
            sheet = %config.sheet_name,
            columns = headers.len(),
            "工作表注册完成"
        );
        Ok(())
    }
}
