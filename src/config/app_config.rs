// ==========================================
// 시트 관리 도구 - 应用配置
// ==========================================
// 来源: 环境变量（未设置时使用默认值）
// - SHEET_ADMIN_DB_PATH: 文档数据库路径
// - SHEET_ADMIN_TIME_ZONE: 新文档的时区（UTC 偏移）
// - SHEET_ADMIN_LOCALE: 消息语言
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

use crate::repository::parse_utc_offset;

pub const ENV_DB_PATH: &str = "SHEET_ADMIN_DB_PATH";
pub const ENV_TIME_ZONE: &str = "SHEET_ADMIN_TIME_ZONE";
pub const ENV_LOCALE: &str = "SHEET_ADMIN_LOCALE";

/// 新文档默认时区
pub const DEFAULT_TIME_ZONE: &str = "+09:00";

/// 默认消息语言
pub const DEFAULT_LOCALE: &str = "ko";

/// 支持的消息语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["ko", "en", "zh-CN"];

const DB_FILE_NAME: &str = "sheet_admin.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无效的时区配置 {var}={value}（应为 UTC 偏移，如 +09:00）")]
    InvalidTimeZone { var: &'static str, value: String },

    #[error("不支持的语言 {var}={value}")]
    UnsupportedLocale { var: &'static str, value: String },
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub time_zone: String,
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl AppConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置（便于测试注入）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let time_zone = read(ENV_TIME_ZONE).unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        if parse_utc_offset(&time_zone).is_none() {
            return Err(ConfigError::InvalidTimeZone {
                var: ENV_TIME_ZONE,
                value: time_zone,
            });
        }

        let locale = read(ENV_LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        if !SUPPORTED_LOCALES.contains(&locale.as_str()) {
            return Err(ConfigError::UnsupportedLocale {
                var: ENV_LOCALE,
                value: locale,
            });
        }

        Ok(Self {
            db_path: read(ENV_DB_PATH).unwrap_or_else(get_default_db_path),
            time_zone,
            locale,
        })
    }
}

/// 获取默认文档数据库路径
///
/// 优先使用用户数据目录；开发构建使用独立目录，避免污染正式数据
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("sheet-admin-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("sheet-admin");

        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_默认值() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "/tmp/doc.db")])).unwrap();
        assert_eq!(config.db_path, "/tmp/doc.db");
        assert_eq!(config.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(config.locale, DEFAULT_LOCALE);
    }

    #[test]
    fn test_from_lookup_覆盖() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/doc.db"),
            (ENV_TIME_ZONE, " -05:00 "),
            (ENV_LOCALE, "en"),
        ]))
        .unwrap();
        assert_eq!(config.time_zone, "-05:00");
        assert_eq!(config.locale, "en");
    }

    #[test]
    fn test_from_lookup_无效值() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/doc.db"),
            (ENV_TIME_ZONE, "Asia/Seoul"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeZone { .. }));

        let err = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/doc.db"),
            (ENV_LOCALE, "fr"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedLocale { .. }));
    }
}
