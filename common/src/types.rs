//! セル値とウェル座標の型定義
//!
//! - CellValue: スプレッドシートから読み込んだ1セルの値（型変換しない）
//! - WellCoordinate: プレート上の1ウェル（行A〜H × 列1〜12）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1セルの値
///
/// 読み込んだ値をそのまま保持する。数値→文字列などの変換は行わない。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 数値として取得（Int/Floatのみ）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// CSV等から読み戻した文字列を型推定して変換
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return CellValue::Float(f);
        }
        match raw {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            // 整数値のFloatは "10.0" と書き、読み戻し時にFloatのまま復元できるようにする
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{:.1}", v)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

/// ウェル座標（行ラベル, 1始まりの列番号）
///
/// 導出順序は行優先（A1..A12, B1..）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WellCoordinate {
    pub row: char,
    pub col: usize,
}

impl WellCoordinate {
    pub fn new(row: char, col: usize) -> Self {
        Self { row, col }
    }

    /// 0始まりのグリッド位置から座標を作る
    ///
    /// 行ラベルは `'A' + row_index`、列は `col_index + 1`。
    /// 行ラベルが 'Z' を超える場合は None。
    pub fn from_indices(row_index: usize, col_index: usize) -> Option<Self> {
        row_label(row_index).map(|row| Self {
            row,
            col: col_index + 1,
        })
    }

    /// ウェル名（例: "A1"）
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.col)
    }
}

/// 0始まりの行インデックスを行ラベルに変換
pub fn row_label(row_index: usize) -> Option<char> {
    if row_index >= 26 {
        return None;
    }
    char::from_u32('A' as u32 + row_index as u32)
}
