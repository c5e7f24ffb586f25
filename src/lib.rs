//! plate-pioneer
//!
//! 96ウェルプレートの実験データ（結果・抗体・濃度・メタデータの4シート）を
//! 1ウェル1行の整形済みテーブルに変換し、CSV/Excel/SQLiteへ出力する。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod interactive;
pub mod logging;
pub mod pipeline;
pub mod preview;
pub mod session;
pub mod store;
pub mod workbook;
