// ==========================================
// 시트 관리 도구 - 应用状态
// ==========================================
// 职责: 持有注入的表格宿主与 API 实例
// 说明: 所有组件共享同一个宿主句柄，不存在全局"当前文档"
// ==========================================

use std::sync::Arc;

use crate::api::{ConfigRegistry, RecordStore};
use crate::config::AppConfig;
use crate::repository::{SheetHost, SqliteSheetHost};

/// 应用状态
///
/// 在Tauri应用中作为全局状态管理；stdio 桥接中以 Arc 共享
pub struct AppState {
    /// 表格宿主
    pub host: Arc<dyn SheetHost>,

    /// 工作表配置注册表
    pub config_registry: Arc<ConfigRegistry>,

    /// 记录存取
    pub record_store: Arc<RecordStore>,
}

impl AppState {
    /// 按配置打开文档并创建 AppState
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开（或创建）SQLite 文档
    /// 2. 为新文档写入默认时区
    /// 3. 设置消息语言
    /// 4. 预先确保注册表存在（失败不阻塞启动）
    pub fn new(config: &AppConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，文档路径: {}", config.db_path);

        let host = SqliteSheetHost::new(&config.db_path)
            .map_err(|e| format!("无法打开文档: {}", e))?;

        if host
            .ensure_time_zone(&config.time_zone)
            .map_err(|e| format!("无法设置文档时区: {}", e))?
        {
            tracing::info!("新文档时区: {}", config.time_zone);
        }

        crate::i18n::set_locale(&config.locale);

        let state = Self::with_host(Arc::new(host));
        if let Err(e) = state.config_registry.get_or_create() {
            tracing::warn!("注册表初始化失败(将继续启动): {}", e);
        }

        Ok(state)
    }

    /// 使用已有宿主创建 AppState（测试可注入替身）
    pub fn with_host(host: Arc<dyn SheetHost>) -> Self {
        Self {
            config_registry: Arc::new(ConfigRegistry::new(host.clone())),
            record_store: Arc::new(RecordStore::new(host.clone())),
            host,
        }
    }
}
