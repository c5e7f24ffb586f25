//! 処理パイプライン
//!
//! 読み込み → メタデータ変換 → 組み立て → 出力

use crate::cli::ExportFormat;
use crate::config::{Config, SheetNames};
use crate::error::Result;
use crate::export;
use crate::workbook::{PlateSheets, PlateWorkbook};
use plate_pioneer_common::{Grid, MetadataMap, PlateAssembler, TidyTable, EXPERIMENTER_KEY};
use std::path::{Path, PathBuf};

/// 1回の処理結果
#[derive(Debug, Clone)]
pub struct ProcessedPlate {
    pub source: PathBuf,
    pub metadata: MetadataMap,
    /// 結果グリッド（プレート表示用）
    pub results: Grid,
    pub tidy: TidyTable,
}

/// 読み込み済みシートから整形済みテーブルを作る
pub fn process_sheets(sheets: &PlateSheets, assembler: &PlateAssembler) -> Result<(MetadataMap, TidyTable)> {
    let metadata = MetadataMap::from_grid(&sheets.metadata)?;
    match metadata.experimenter() {
        Some(name) => tracing::info!(experimenter = %name, "loaded metadata"),
        None => tracing::warn!("metadata has no Experimenter field"),
    }

    let tidy = assembler.assemble(
        &sheets.results,
        &sheets.antibodies,
        &sheets.concentrations,
        &metadata,
    )?;
    Ok((metadata, tidy))
}

pub fn process_workbook(
    path: &Path,
    sheet_names: &SheetNames,
    assembler: &PlateAssembler,
) -> Result<ProcessedPlate> {
    let mut workbook = PlateWorkbook::open(path)?;
    let sheets = workbook.read_sheets(sheet_names)?;
    let (metadata, tidy) = process_sheets(&sheets, assembler)?;

    Ok(ProcessedPlate {
        source: path.to_path_buf(),
        metadata,
        results: sheets.results,
        tidy,
    })
}

/// 設定の入力ファイルを処理し、出力ファイルに書き出す
///
/// `require_experimenter` の場合、Experimenter がなければ出力前に MissingField で失敗する。
pub fn run(
    config: &Config,
    assembler: &PlateAssembler,
    format: &ExportFormat,
    require_experimenter: bool,
) -> Result<(ProcessedPlate, Vec<PathBuf>)> {
    let input = config.input_file()?;
    let output = config.output_file()?;

    let plate = process_workbook(input, &config.sheet_names, assembler)?;
    if require_experimenter {
        plate.metadata.require(EXPERIMENTER_KEY)?;
    }
    let written = export::export_table(&plate.tidy, format, output)?;
    Ok((plate, written))
}
