//! Excelワークブック読み込み
//!
//! ヘッダーなしの4シート（メタデータ・結果・抗体・濃度）をグリッドとして読む。
//! グリッドはセルA1を起点にそろえる（先頭の空行・空列も保持する）。
//! 日付セルは `2024-05-01` 形式の文字列として読む。

use crate::config::SheetNames;
use crate::error::{PioneerError, Result};
use calamine::{open_workbook, Data, ExcelDateTime, Range, Reader, Xlsx};
use chrono::Timelike;
use plate_pioneer_common::{CellValue, Grid};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// 1実験分のシート
#[derive(Debug, Clone)]
pub struct PlateSheets {
    pub metadata: Grid,
    pub results: Grid,
    pub antibodies: Grid,
    pub concentrations: Grid,
}

pub struct PlateWorkbook {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
}

impl PlateWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PioneerError::FileNotFound(path.display().to_string()));
        }
        let workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| PioneerError::WorkbookRead(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シートをグリッドとして読む（存在しなければ MissingSheet）
    pub fn read_grid(&mut self, sheet: &str) -> Result<Grid> {
        if !self.sheet_names().iter().any(|s| s == sheet) {
            return Err(PioneerError::MissingSheet {
                sheet: sheet.to_string(),
                path: self.path.display().to_string(),
            });
        }
        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| PioneerError::WorkbookRead(format!("{}: {}", sheet, e)))?;
        let grid = range_to_grid(&range);
        tracing::debug!(sheet, rows = grid.height(), cols = grid.width(), "read sheet");
        Ok(grid)
    }

    pub fn read_sheets(&mut self, names: &SheetNames) -> Result<PlateSheets> {
        Ok(PlateSheets {
            metadata: self.read_grid(&names.metadata)?,
            results: self.read_grid(&names.results)?,
            antibodies: self.read_grid(&names.antibodies)?,
            concentrations: self.read_grid(&names.concentrations)?,
        })
    }
}

fn range_to_grid(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    Grid::from_rows(rows)
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => datetime_value(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            tracing::warn!(error = ?e, "cell contains a formula error");
            CellValue::Text(format!("#{:?}", e))
        }
    }
}

/// 時刻が0時なら日付のみ、それ以外は秒まで
fn datetime_value(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return CellValue::Float(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(ndt) if ndt.time().num_seconds_from_midnight() == 0 => {
            CellValue::Text(ndt.format("%Y-%m-%d").to_string())
        }
        Some(ndt) => CellValue::Text(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => {
            tracing::warn!(serial = dt.as_f64(), "date cell out of range, keeping serial value");
            CellValue::Float(dt.as_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_value(&Data::Float(1.23)), CellValue::Float(1.23));
        assert_eq!(cell_value(&Data::Int(4)), CellValue::Int(4));
        assert_eq!(
            cell_value(&Data::String("Antibody_1".into())),
            CellValue::Text("Antibody_1".into())
        );
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn test_range_anchored_at_a1() {
        // B2:C2 に値がある範囲
        let mut range: Range<Data> = Range::new((1, 1), (1, 2));
        range.set_value((1, 1), Data::Float(1.0));
        range.set_value((1, 2), Data::Float(2.0));

        let grid = range_to_grid(&range);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.get(0, 0), Some(&CellValue::Empty));
        assert_eq!(grid.get(1, 1), Some(&CellValue::Float(1.0)));
        assert_eq!(grid.get(1, 2), Some(&CellValue::Float(2.0)));
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_grid(&range).is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let result = PlateWorkbook::open(Path::new("/nonexistent/plate.xlsx"));
        assert!(matches!(result, Err(PioneerError::FileNotFound(_))));
    }

    #[test]
    fn test_date_cells_read_as_iso_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("experiment_meta").unwrap();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let time_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let date = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 5, 1).unwrap();
        let started = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 5, 1)
            .unwrap()
            .and_hms(13, 30, 0)
            .unwrap();
        sheet.write_string(0, 0, "Date").unwrap();
        sheet.write_datetime_with_format(0, 1, &date, &date_format).unwrap();
        sheet.write_string(1, 0, "Started").unwrap();
        sheet.write_datetime_with_format(1, 1, &started, &time_format).unwrap();
        workbook.save(&path).unwrap();

        let grid = PlateWorkbook::open(&path)
            .unwrap()
            .read_grid("experiment_meta")
            .unwrap();
        assert_eq!(grid.get(0, 1), Some(&CellValue::from("2024-05-01")));
        assert_eq!(grid.get(1, 1), Some(&CellValue::from("2024-05-01 13:30:00")));
    }
}
