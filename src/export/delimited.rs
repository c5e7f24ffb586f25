//! CSV入出力
//!
//! ヘッダー1行 + 1ウェル1行。インデックス列は出力しない。

use crate::error::Result;
use csv::{ReaderBuilder, WriterBuilder};
use plate_pioneer_common::{CellValue, TidyTable};
use std::path::Path;

pub fn write_csv(table: &TidyTable, output_path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(output_path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.cells().iter().map(|c| c.to_string()))?;
    }
    writer.flush()?;

    tracing::info!(path = %output_path.display(), rows = table.len(), "wrote csv");
    Ok(())
}

/// CSVを読み戻す（数値・真偽値は型推定）
pub fn read_csv(input_path: &Path) -> Result<TidyTable> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(input_path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }

    Ok(TidyTable::new(columns, rows)?)
}
