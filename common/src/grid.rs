//! プレートグリッド
//!
//! シートから読み込んだ位置情報付きの2次元セル配列と、
//! プレート形状（96ウェル: 8x12）の検証。

use crate::error::{Error, Result};
use crate::types::CellValue;
use serde::{Deserialize, Serialize};

/// プレート形状（行数 x 列数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateShape {
    pub rows: usize,
    pub cols: usize,
}

impl PlateShape {
    /// 96ウェル（A〜H x 1〜12）
    pub const WELLS_96: PlateShape = PlateShape { rows: 8, cols: 12 };
    /// 384ウェル（A〜P x 1〜24）
    pub const WELLS_384: PlateShape = PlateShape { rows: 16, cols: 24 };

    pub fn well_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for PlateShape {
    fn default() -> Self {
        Self::WELLS_96
    }
}

/// 矩形のセル配列
///
/// 短い行は `CellValue::Empty` で埋めて矩形にそろえる。
/// シリアライズ形式は行の配列で、読み込み時も `from_rows` を通す。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<CellValue>>", into = "Vec<Vec<CellValue>>")]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    /// 全セルを同じ値で埋めたグリッド
    pub fn filled(shape: PlateShape, value: CellValue) -> Self {
        Self {
            rows: vec![vec![value; shape.cols]; shape.rows],
            width: shape.cols,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// 1セルを差し替えたグリッドを返す（元のグリッドは変更しない）
    pub fn with_cell(mut self, row: usize, col: usize, value: impl Into<CellValue>) -> Self {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value.into();
        }
        self
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// 形状が `shape` と完全一致するか検証（全行の長さも確認）
    pub fn validate(&self, name: &str, shape: PlateShape) -> Result<()> {
        let ragged = self.rows.iter().any(|r| r.len() != shape.cols);
        if self.height() != shape.rows || self.width() != shape.cols || ragged {
            return Err(Error::Shape {
                grid: name.to_string(),
                expected_rows: shape.rows,
                expected_cols: shape.cols,
                actual_rows: self.height(),
                actual_cols: self.width(),
            });
        }
        Ok(())
    }
}

impl From<Vec<Vec<CellValue>>> for Grid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<CellValue>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}
