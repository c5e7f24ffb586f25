//! 整形済みテーブル（1ウェル1行）

use crate::error::{Error, Result};
use crate::melt::{COL_COLUMN, ROW_COLUMN};
use crate::types::{CellValue, WellCoordinate};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// 列名付きの行指向テーブル
///
/// 組み立て後は変更しない。呼び出し側へ値で渡す。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TidyTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TidyTable {
    /// 列名と行データから作成（全行の列数が一致すること）
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(Error::Layout {
                grid: "tidy".to_string(),
                reason: format!(
                    "row {} has {} values but there are {} columns",
                    i,
                    row.len(),
                    columns.len()
                ),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    /// 座標でウェルの行を検索
    pub fn well(&self, well: WellCoordinate) -> Option<RowView<'_>> {
        self.rows().find(|r| r.coordinate() == Some(well))
    }

    /// 1列分の値
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[index]))
    }

    /// 列名→値のレコード列に変換（JSON出力用）
    pub fn to_records(&self) -> Vec<IndexMap<&str, &CellValue>> {
        self.rows().map(|r| r.to_record()).collect()
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<String> {
        &mut self.columns
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.rows
    }
}

impl Serialize for TidyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows() {
            seq.serialize_element(&row.to_record())?;
        }
        seq.end()
    }
}

/// テーブルの1行への参照
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> RowView<'a> {
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let cells = self.cells;
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &cells[i])
    }

    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }

    /// Row/Col列からウェル座標を復元
    pub fn coordinate(&self) -> Option<WellCoordinate> {
        let row = match self.get(ROW_COLUMN)? {
            CellValue::Text(s) => {
                let mut chars = s.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                c
            }
            _ => return None,
        };
        let col = match self.get(COL_COLUMN)? {
            CellValue::Int(i) if *i > 0 => *i as usize,
            CellValue::Float(f) if *f > 0.0 && f.fract() == 0.0 => *f as usize,
            _ => return None,
        };
        Some(WellCoordinate::new(row, col))
    }

    pub fn to_record(&self) -> IndexMap<&'a str, &'a CellValue> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter())
            .collect()
    }
}
