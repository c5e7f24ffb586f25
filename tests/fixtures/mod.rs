//! テスト用Excelファイル生成

#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;

pub const METADATA: [(&str, &str); 3] = [
    ("Experimenter", "SS"),
    ("Date", "2024-05-01"),
    ("Plate_ID", "P-001"),
];

/// テスト用ワークブックの内容
pub struct PlateFixture {
    pub results_rows: u32,
    pub skip_sheet: Option<&'static str>,
    pub metadata: Vec<(&'static str, &'static str)>,
    /// Date を文字列ではなく日付セルで書く
    pub date_cell: bool,
}

impl Default for PlateFixture {
    fn default() -> Self {
        Self {
            results_rows: 8,
            skip_sheet: None,
            metadata: METADATA.to_vec(),
            date_cell: false,
        }
    }
}

pub fn result_value(row: u32, col: u16) -> f64 {
    if row == 0 && col == 0 {
        1.23
    } else {
        (row * 12 + col as u32) as f64 / 10.0
    }
}

pub fn concentration(row: u32) -> f64 {
    10.0 / f64::from(1u32 << row)
}

impl PlateFixture {
    pub fn write(&self, path: &Path) {
        let mut workbook = Workbook::new();

        if self.skip_sheet != Some("experiment_meta") {
            let sheet = workbook.add_worksheet();
            sheet.set_name("experiment_meta").unwrap();
            let date_format = Format::new().set_num_format("yyyy-mm-dd");
            for (i, (key, value)) in self.metadata.iter().enumerate() {
                sheet.write_string(i as u32, 0, *key).unwrap();
                if self.date_cell && *key == "Date" {
                    let date = ExcelDateTime::parse_from_str(value).unwrap();
                    sheet
                        .write_datetime_with_format(i as u32, 1, &date, &date_format)
                        .unwrap();
                } else {
                    sheet.write_string(i as u32, 1, *value).unwrap();
                }
            }
        }

        if self.skip_sheet != Some("results") {
            let sheet = workbook.add_worksheet();
            sheet.set_name("results").unwrap();
            for row in 0..self.results_rows {
                for col in 0..12u16 {
                    sheet.write_number(row, col, result_value(row, col)).unwrap();
                }
            }
        }

        if self.skip_sheet != Some("ta_map") {
            let sheet = workbook.add_worksheet();
            sheet.set_name("ta_map").unwrap();
            for row in 0..8u32 {
                for col in 0..12u16 {
                    sheet
                        .write_string(row, col, &format!("Antibody_{}", col + 1))
                        .unwrap();
                }
            }
        }

        if self.skip_sheet != Some("concentration_map") {
            let sheet = workbook.add_worksheet();
            sheet.set_name("concentration_map").unwrap();
            for row in 0..8u32 {
                for col in 0..12u16 {
                    sheet.write_number(row, col, concentration(row)).unwrap();
                }
            }
        }

        workbook.save(path).unwrap();
    }
}
