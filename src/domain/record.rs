// ==========================================
// 시트 관리 도구 - 数据行记录
// ==========================================
// 约定: row_index 为读取时刻的物理行号（1-based），删除后失效
// ==========================================

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::domain::cell::CellValue;

/// 前端提交的记录（字段键 → JSON 值）
pub type RecordInput = Map<String, Value>;

/// 一行数据
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub row_index: u32,
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new(row_index: u32) -> Self {
        Self {
            row_index,
            fields: Vec::new(),
        }
    }

    /// 设置字段；重复键保留首次出现的位置，值以后写入者为准
    pub fn set(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 子串匹配（query 须已 trim 并转小写）
    ///
    /// rowIndex 也作为字段参与匹配；空值、0、false 不匹配
    pub fn matches(&self, query: &str) -> bool {
        if self.row_index.to_string().contains(query) {
            return true;
        }
        self.fields
            .iter()
            .filter(|(_, value)| !value.is_falsy())
            .any(|(_, value)| value.to_string().to_lowercase().contains(query))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("rowIndex", &self.row_index)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// 按键顺序将记录投影为一行单元格（缺失的键写为空）
pub fn project_record(keys: &[String], record: &RecordInput) -> Vec<CellValue> {
    keys.iter()
        .map(|key| record.get(key).map(CellValue::from_json).unwrap_or_default())
        .collect()
}
