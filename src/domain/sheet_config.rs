// ==========================================
// 시트 관리 도구 - 工作表配置实体
// ==========================================
// 存储: SHEET_DATA 工作表（第1行为冻结表头，第2行起每行一个配置）
// 列顺序: 시트 이름 / 탭 표시 이름 / 헤더 목록 / 탭 순서 / 노출여부
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::cell::CellValue;

/// 表头所在行（1-based）
pub const HEADER_ROW_INDEX: u32 = 1;

/// 注册表工作表名称
pub const CONFIG_SHEET_NAME: &str = "SHEET_DATA";

/// 注册表表头
pub const CONFIG_HEADERS: [&str; 5] = ["시트 이름", "탭 표시 이름", "헤더 목록", "탭 순서", "노출여부"];

/// 注册表固定列数（忽略右侧多余数据）
pub const CONFIG_COLUMN_COUNT: u32 = 5;

/// 缺省/无法解析的排序值
pub const DEFAULT_ORDER: i64 = 9999;

/// 缺省的显示标志
pub const DEFAULT_EXPOSURE: &str = "Y";

/// 表头列表持久化时的分隔符
pub const HEADERS_SEPARATOR: &str = ", ";

// ==========================================
// SheetConfig - 已注册的工作表配置
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    pub sheet_name: String,
    pub title: String,
    pub headers_str: String,
    pub order: i64,
    pub exposure: String,
}

impl SheetConfig {
    /// 按列位置从注册表行构造（不足5列的部分视为空）
    pub fn from_row(row: &[CellValue]) -> Self {
        let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();

        Self {
            sheet_name: cell(0).to_string(),
            title: cell(1).to_string(),
            headers_str: cell(2).to_string(),
            order: coerce_order(&cell(3)),
            exposure: cell(4).to_string(),
        }
    }

    /// 键/标签对（按列顺序）
    pub fn columns(&self) -> Vec<ColumnSpec> {
        self.headers_str
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(ColumnSpec::from_label)
            .collect()
    }

    pub fn is_exposed(&self) -> bool {
        self.exposure == DEFAULT_EXPOSURE
    }
}

/// 列定义：记录字段键与表头标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
}

impl ColumnSpec {
    pub fn from_label(label: &str) -> Self {
        Self {
            key: label.to_string(),
            label: label.to_string(),
        }
    }
}

// ==========================================
// NewSheetConfig - 注册请求
// ==========================================

/// 前端提交的注册请求
///
/// `headers` 保留原始 JSON，以便区分"非数组"与"空数组"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSheetConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub sheet_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default)]
    pub headers: Value,
    #[serde(default)]
    pub order: Option<Value>,
    #[serde(default)]
    pub exposure: Option<Value>,
}

impl NewSheetConfig {
    /// 校验表头：必须是非空、全部为字符串的数组
    pub fn validated_headers(&self) -> Option<Vec<String>> {
        let items = self.headers.as_array()?;
        if items.is_empty() {
            return None;
        }
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }

    /// 写入注册表的一行: [名称, 标题, 表头串, 排序, 显示标志]
    pub fn registry_row(&self, headers: &[String]) -> Vec<CellValue> {
        let order = self
            .order
            .as_ref()
            .map(CellValue::from_json)
            .filter(|v| !v.is_falsy())
            .unwrap_or(CellValue::Number(DEFAULT_ORDER as f64));
        let exposure = self
            .exposure
            .as_ref()
            .map(CellValue::from_json)
            .filter(|v| !v.is_falsy())
            .unwrap_or_else(|| CellValue::text(DEFAULT_EXPOSURE));

        vec![
            CellValue::from(self.sheet_name.as_str()),
            CellValue::from(self.title.as_str()),
            CellValue::from(headers.join(HEADERS_SEPARATOR)),
            order,
            exposure,
        ]
    }
}

/// 宽松读取字符串字段：数字/布尔取其字符串形式，null 为空串
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => CellValue::from_json(&other).to_string(),
    })
}

/// 将排序单元格转换为整数
///
/// 取字符串形式的整数前缀（允许前导空白与正负号）；
/// 没有数字或结果为 0 时返回 DEFAULT_ORDER
pub fn coerce_order(value: &CellValue) -> i64 {
    let text = match value {
        CellValue::Number(n) if !n.is_finite() => return DEFAULT_ORDER,
        CellValue::Number(n) => return non_zero_or_default(n.trunc() as i64),
        CellValue::Text(s) => s.as_str(),
        _ => return DEFAULT_ORDER,
    };

    parse_int_prefix(text)
        .map(non_zero_or_default)
        .unwrap_or(DEFAULT_ORDER)
}

fn non_zero_or_default(n: i64) -> i64 {
    if n == 0 {
        DEFAULT_ORDER
    } else {
        n
    }
}

fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first().copied() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_order() {
        assert_eq!(coerce_order(&CellValue::Number(3.0)), 3);
        assert_eq!(coerce_order(&CellValue::Number(3.7)), 3);
        assert_eq!(coerce_order(&CellValue::text("12")), 12);
        assert_eq!(coerce_order(&CellValue::text("  -5")), -5);
        assert_eq!(coerce_order(&CellValue::text("3abc")), 3);
    }

    #[test]
    fn test_coerce_order_缺省值() {
        assert_eq!(coerce_order(&CellValue::Empty), DEFAULT_ORDER);
        assert_eq!(coerce_order(&CellValue::text("abc")), DEFAULT_ORDER);
        assert_eq!(coerce_order(&CellValue::Number(0.0)), DEFAULT_ORDER);
        assert_eq!(coerce_order(&CellValue::Bool(true)), DEFAULT_ORDER);
    }

    #[test]
    fn test_from_row_固定5列() {
        let row = vec![
            CellValue::text("members"),
            CellValue::text("회원"),
            CellValue::text("이름, 이메일"),
            CellValue::Number(2.0),
            CellValue::text("N"),
            CellValue::text("stray"),
        ];
        let config = SheetConfig::from_row(&row);
        assert_eq!(config.sheet_name, "members");
        assert_eq!(config.order, 2);
        assert_eq!(config.exposure, "N");
        assert!(!config.is_exposed());

        let short = SheetConfig::from_row(&row[..2]);
        assert_eq!(short.headers_str, "");
        assert_eq!(short.order, DEFAULT_ORDER);
    }

    #[test]
    fn test_columns() {
        let config = SheetConfig {
            sheet_name: "members".to_string(),
            title: "회원".to_string(),
            headers_str: "이름, 이메일,전화".to_string(),
            order: 1,
            exposure: "Y".to_string(),
        };
        let labels: Vec<String> = config.columns().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["이름", "이메일", "전화"]);
    }

    #[test]
    fn test_validated_headers() {
        let mut config = NewSheetConfig {
            headers: json!(["a", "b"]),
            ..Default::default()
        };
        assert_eq!(config.validated_headers(), Some(vec!["a".to_string(), "b".to_string()]));

        config.headers = json!([]);
        assert!(config.validated_headers().is_none());

        config.headers = json!("a, b");
        assert!(config.validated_headers().is_none());

        config.headers = json!(["a", 1]);
        assert!(config.validated_headers().is_none());
    }

    #[test]
    fn test_registry_row_默认值() {
        let config = NewSheetConfig {
            sheet_name: "members".to_string(),
            title: "회원".to_string(),
            headers: json!(["이름", "이메일"]),
            order: Some(json!("")),
            exposure: None,
        };
        let headers = config.validated_headers().unwrap();
        let row = config.registry_row(&headers);

        assert_eq!(row[2], CellValue::text("이름, 이메일"));
        assert_eq!(row[3], CellValue::Number(9999.0));
        assert_eq!(row[4], CellValue::text("Y"));
    }

    #[test]
    fn test_new_sheet_config_宽松字符串() {
        let config: NewSheetConfig = serde_json::from_value(json!({
            "sheetName": "events",
            "title": 7,
            "headers": ["제목"]
        }))
        .unwrap();
        assert_eq!(config.title, "7");

        let config: NewSheetConfig =
            serde_json::from_value(json!({ "sheetName": null, "title": true })).unwrap();
        assert_eq!(config.sheet_name, "");
        assert_eq!(config.title, "true");
        assert!(config.validated_headers().is_none());
    }
}
