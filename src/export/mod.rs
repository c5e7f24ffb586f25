pub mod delimited;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use plate_pioneer_common::TidyTable;
use std::path::{Path, PathBuf};

pub const DEFAULT_STEM: &str = "output_tidy";

fn output_path_for_format(output: &Path, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_STEM, extension))
    } else {
        output.with_extension(extension)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 出力形式を拡張子から推定（.xlsx → Excel、それ以外 → CSV）
pub fn format_for_path(path: &Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ExportFormat::Excel,
        _ => ExportFormat::Csv,
    }
}

/// 整形済みテーブルを出力し、書き出したパスを返す
///
/// `output` がディレクトリ（または拡張子なし）の場合は `output_tidy.<ext>` を作る。
pub fn export_table(table: &TidyTable, format: &ExportFormat, output: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        let csv_path = output_path_for_format(output, "csv");
        ensure_parent(&csv_path)?;
        delimited::write_csv(table, &csv_path)?;
        written.push(csv_path);
    }

    if matches!(format, ExportFormat::Excel | ExportFormat::Both) {
        let excel_path = output_path_for_format(output, "xlsx");
        ensure_parent(&excel_path)?;
        excel::write_xlsx(table, &excel_path)?;
        written.push(excel_path);
    }

    Ok(written)
}
