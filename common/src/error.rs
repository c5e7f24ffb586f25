//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Shape error in '{grid}': expected {expected_rows}x{expected_cols}, got {actual_rows}x{actual_cols}")]
    Shape {
        grid: String,
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Shape error in '{grid}': {reason}")]
    Layout { grid: String, reason: String },

    #[error("Invalid value column name: '{0}'")]
    InvalidValueName(String),

    #[error("Ambiguous join key {well} in '{table}'")]
    JoinAmbiguity { table: String, well: String },

    #[error("Merge error: {0}")]
    Merge(String),

    #[error("Metadata field not found: {0}")]
    MissingField(String),

    #[error("Metadata key '{0}' collides with a reserved column")]
    ReservedColumn(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
