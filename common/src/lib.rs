//! Plate Pioneer Common Library
//!
//! 96ウェルプレートのグリッドを1ウェル1行の整形済みテーブルに変換するコア処理。
//! I/Oは持たない（読み込み・出力はCLI側で行う）。

pub mod types;
pub mod grid;
pub mod error;
pub mod melt;
pub mod metadata;
pub mod table;
pub mod assemble;

pub use types::{CellValue, WellCoordinate, row_label};
pub use grid::{Grid, PlateShape};
pub use error::{Error, Result};
pub use melt::{GridMelter, LongRecord, LongTable, melt, COL_COLUMN, ROW_COLUMN};
pub use metadata::{MetadataMap, EXPERIMENTER_KEY};
pub use table::{RowView, TidyTable};
pub use assemble::{
    assemble, CollisionPolicy, PlateAssembler, ANTIBODY_COLUMN, CONCENTRATION_COLUMN,
    FIXED_COLUMNS, RESULT_COLUMN,
};
