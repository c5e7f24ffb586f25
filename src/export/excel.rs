//! Excel出力
//!
//! 整形済みテーブルを1シートに書き出す（1行目はヘッダー）。

use crate::error::{PioneerError, Result};
use plate_pioneer_common::{CellValue, TidyTable};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use std::path::Path;

pub const DEFAULT_SHEET_NAME: &str = "tidy";

pub fn write_xlsx(table: &TidyTable, output_path: &Path) -> Result<()> {
    write_xlsx_with_sheet(table, output_path, DEFAULT_SHEET_NAME)
}

pub fn write_xlsx_with_sheet(table: &TidyTable, output_path: &Path, sheet_name: &str) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| PioneerError::ExcelGeneration(format!("シート名設定エラー: {}", e)))?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name.as_str(), &header_format)
            .map_err(|e| PioneerError::ExcelGeneration(format!("ヘッダー書き込みエラー: {}", e)))?;
    }

    for (i, row) in table.rows().enumerate() {
        let excel_row = (i + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            let col = col as u16;
            let written = match cell {
                CellValue::Empty => continue,
                CellValue::Int(v) => worksheet.write_number(excel_row, col, *v as f64),
                CellValue::Float(v) => worksheet.write_number(excel_row, col, *v),
                CellValue::Bool(v) => worksheet.write_boolean(excel_row, col, *v),
                CellValue::Text(v) => worksheet.write_string(excel_row, col, v.as_str()),
            };
            written.map_err(|e| PioneerError::ExcelGeneration(format!("セル書き込みエラー: {}", e)))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| PioneerError::ExcelGeneration(format!("ウィンドウ枠固定エラー: {}", e)))?;

    workbook
        .save(output_path)
        .map_err(|e| PioneerError::ExcelGeneration(format!("Excel保存エラー: {}", e)))?;

    tracing::info!(path = %output_path.display(), rows = table.len(), "wrote xlsx");
    Ok(())
}
