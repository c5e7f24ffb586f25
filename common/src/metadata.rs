//! 実験メタデータ
//!
//! 2列（キー, 値）のシートから順序付きマップを作る。
//! 重複キーは後勝ち（位置は最初の出現位置のまま）。

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::types::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 下流で参照される実験者キー
pub const EXPERIMENTER_KEY: &str = "Experimenter";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataMap {
    fields: IndexMap<String, CellValue>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// キー/値シートから読み込む（列0=キー, 列1=値）
    ///
    /// キーが空の行は読み飛ばす。値列がない行は空値になる。
    pub fn from_grid(grid: &Grid) -> Result<Self> {
        if grid.is_empty() {
            return Ok(Self::new());
        }
        if grid.width() < 2 {
            return Err(Error::Layout {
                grid: "metadata".to_string(),
                reason: format!("expected 2 columns (key, value), got {}", grid.width()),
            });
        }

        let mut map = Self::new();
        for row in grid.rows() {
            let key = &row[0];
            if key.is_empty() {
                continue;
            }
            let key = key.to_string();
            if map.fields.contains_key(&key) {
                tracing::warn!(key = %key, "duplicate metadata key, keeping the last value");
            }
            map.insert(key, row[1].clone());
        }
        Ok(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    /// 必須キーを取得（なければ MissingField）
    pub fn require(&self, key: &str) -> Result<&CellValue> {
        self.get(key)
            .ok_or_else(|| Error::MissingField(key.to_string()))
    }

    pub fn experimenter(&self) -> Option<&CellValue> {
        self.get(EXPERIMENTER_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(key: &str, value: CellValue) -> Vec<CellValue> {
        vec![CellValue::from(key), value]
    }

    #[test]
    fn test_from_grid_keeps_order() {
        let grid = Grid::from_rows(vec![
            kv("Experimenter", "SS".into()),
            kv("Date", "2024-05-01".into()),
            kv("Plate_ID", CellValue::Int(7)),
        ]);
        let map = MetadataMap::from_grid(&grid).unwrap();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["Experimenter", "Date", "Plate_ID"]);
        assert_eq!(map.experimenter(), Some(&CellValue::from("SS")));
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let grid = Grid::from_rows(vec![
            kv("Experimenter", "AA".into()),
            kv("Date", "2024-05-01".into()),
            kv("Experimenter", "SS".into()),
        ]);
        let map = MetadataMap::from_grid(&grid).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Experimenter"), Some(&CellValue::from("SS")));
        assert_eq!(map.keys().next(), Some("Experimenter"));
    }

    #[test]
    fn test_blank_keys_skipped_and_numeric_keys_stringified() {
        let grid = Grid::from_rows(vec![
            vec![CellValue::Empty, CellValue::from("ignored")],
            vec![CellValue::Int(1), CellValue::from("one")],
        ]);
        let map = MetadataMap::from_grid(&grid).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("1"), Some(&CellValue::from("one")));
    }

    #[test]
    fn test_single_column_sheet_rejected() {
        let grid = Grid::from_rows(vec![vec![CellValue::from("Experimenter")]]);
        assert!(matches!(
            MetadataMap::from_grid(&grid),
            Err(Error::Layout { .. })
        ));
    }

    #[test]
    fn test_empty_sheet_is_empty_map() {
        let map = MetadataMap::from_grid(&Grid::default()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_require_missing() {
        let map: MetadataMap = [("Date", "2024-05-01")].into_iter().collect();
        assert!(map.experimenter().is_none());
        assert_eq!(
            map.require(EXPERIMENTER_KEY),
            Err(Error::MissingField("Experimenter".to_string()))
        );
    }
}
