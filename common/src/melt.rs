//! グリッドのmelt（横持ち→縦持ち変換）
//!
//! 8行のグリッドに行ラベルA〜Hを振り、1セル1レコードの縦持ちテーブルにする。
//! 列番号は1始まり。入力グリッドは変更しない。

use crate::error::{Error, Result};
use crate::grid::{Grid, PlateShape};
use crate::types::{CellValue, WellCoordinate};
use serde::{Deserialize, Serialize};

pub const ROW_COLUMN: &str = "Row";
pub const COL_COLUMN: &str = "Col";

/// 縦持ちテーブルの1レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub well: WellCoordinate,
    pub value: CellValue,
}

/// melt結果（値列名 + レコード列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTable {
    pub value_name: String,
    pub records: Vec<LongRecord>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// グリッドを縦持ちに変換する
///
/// 行数はプレート形状の行数と一致しなければならない。列数は検証しない
/// （存在する列をすべて変換する）。列数の検証は `PlateAssembler` が行う。
#[derive(Debug, Clone, Copy, Default)]
pub struct GridMelter {
    shape: PlateShape,
}

impl GridMelter {
    pub fn new(shape: PlateShape) -> Self {
        Self { shape }
    }

    pub fn melt(&self, grid: &Grid, value_name: &str) -> Result<LongTable> {
        if value_name.is_empty() || value_name == ROW_COLUMN || value_name == COL_COLUMN {
            return Err(Error::InvalidValueName(value_name.to_string()));
        }

        if grid.height() != self.shape.rows {
            return Err(Error::Shape {
                grid: value_name.to_string(),
                expected_rows: self.shape.rows,
                expected_cols: grid.width(),
                actual_rows: grid.height(),
                actual_cols: grid.width(),
            });
        }

        let mut records = Vec::with_capacity(grid.height() * grid.width());
        for (row_index, row) in grid.rows().enumerate() {
            for (col_index, value) in row.iter().enumerate() {
                let well = WellCoordinate::from_indices(row_index, col_index).ok_or_else(|| {
                    Error::Layout {
                        grid: value_name.to_string(),
                        reason: format!("row index {} has no letter label", row_index),
                    }
                })?;
                records.push(LongRecord {
                    well,
                    value: value.clone(),
                });
            }
        }

        tracing::debug!(
            value_name,
            rows = grid.height(),
            cols = grid.width(),
            records = records.len(),
            "melted grid"
        );

        Ok(LongTable {
            value_name: value_name.to_string(),
            records,
        })
    }
}

/// 96ウェルプレートとしてmeltする
pub fn melt(grid: &Grid, value_name: &str) -> Result<LongTable> {
    GridMelter::default().melt(grid, value_name)
}
