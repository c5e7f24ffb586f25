//! 処理パイプラインの統合テスト
//!
//! テスト用Excelを生成し、読み込み→変換→CSV/Excel出力までを検証

mod fixtures;

use fixtures::{concentration, result_value, PlateFixture};
use plate_pioneer::cli::ExportFormat;
use plate_pioneer::config::Config;
use plate_pioneer::error::PioneerError;
use plate_pioneer::export::delimited;
use plate_pioneer::pipeline;
use plate_pioneer::workbook::PlateWorkbook;
use plate_pioneer_common::{CellValue, PlateAssembler, WellCoordinate, FIXED_COLUMNS};
use std::collections::HashSet;
use tempfile::tempdir;

fn config_for(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.file_paths.input_file = Some(dir.join("test_plate.xlsx"));
    config.file_paths.output_file = Some(dir.join("test_output").join("test_results.csv"));
    config
}

#[test]
fn test_full_pipeline() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture::default().write(config.input_file().unwrap());

    let (plate, written) = pipeline::run(
        &config,
        &PlateAssembler::default(),
        &ExportFormat::Csv,
        true,
    )
    .expect("パイプライン失敗");

    let output = config.output_file().unwrap();
    assert_eq!(written, vec![output.to_path_buf()]);
    assert!(output.exists(), "CSVが作成されていない");
    assert_eq!(plate.tidy.len(), 96);

    let df = delimited::read_csv(output).expect("CSV読み込み失敗");
    assert_eq!(df.len(), 96, "96行ではない");

    let first = df.row(0).unwrap();
    assert_eq!(first.get("Antibody"), Some(&CellValue::from("Antibody_1")));
    assert_eq!(first.get("Experimenter"), Some(&CellValue::from("SS")));
}

#[test]
fn test_scenario_well_a1() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture::default().write(config.input_file().unwrap());

    let plate = pipeline::process_workbook(
        config.input_file().unwrap(),
        &config.sheet_names,
        &PlateAssembler::default(),
    )
    .unwrap();

    let a1 = plate.tidy.well(WellCoordinate::new('A', 1)).unwrap();
    assert_eq!(a1.get("Result_Value"), Some(&CellValue::Float(1.23)));
    assert_eq!(a1.get("Antibody"), Some(&CellValue::from("Antibody_1")));
    assert_eq!(a1.get("Concentration"), Some(&CellValue::Float(10.0)));
    assert_eq!(a1.get("Experimenter"), Some(&CellValue::from("SS")));

    let h12 = plate.tidy.well(WellCoordinate::new('H', 12)).unwrap();
    assert_eq!(h12.get("Result_Value"), Some(&CellValue::Float(result_value(7, 11))));
    assert_eq!(h12.get("Antibody"), Some(&CellValue::from("Antibody_12")));
    assert_eq!(h12.get("Concentration"), Some(&CellValue::Float(concentration(7))));
}

#[test]
fn test_columns_and_coordinates() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture::default().write(config.input_file().unwrap());

    let plate = pipeline::process_workbook(
        config.input_file().unwrap(),
        &config.sheet_names,
        &PlateAssembler::default(),
    )
    .unwrap();

    let mut expected: Vec<&str> = FIXED_COLUMNS.to_vec();
    expected.extend(["Experimenter", "Date", "Plate_ID"]);
    assert_eq!(plate.tidy.columns(), expected.as_slice());

    let wells: HashSet<_> = plate.tidy.rows().filter_map(|r| r.coordinate()).collect();
    assert_eq!(wells.len(), 96);
    assert!(plate.tidy.rows().all(|r| r.get("Plate_ID") == Some(&CellValue::from("P-001"))));
}

#[test]
fn test_csv_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture::default().write(config.input_file().unwrap());

    let (plate, _) = pipeline::run(
        &config,
        &PlateAssembler::default(),
        &ExportFormat::Csv,
        false,
    )
    .unwrap();

    let reloaded = delimited::read_csv(config.output_file().unwrap()).unwrap();
    assert_eq!(reloaded, plate.tidy);
}

#[test]
fn test_export_both_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture::default().write(config.input_file().unwrap());

    let (_, written) = pipeline::run(
        &config,
        &PlateAssembler::default(),
        &ExportFormat::Both,
        false,
    )
    .unwrap();

    assert_eq!(written.len(), 2);
    let xlsx = &written[1];
    assert_eq!(xlsx.extension().and_then(|e| e.to_str()), Some("xlsx"));

    // 出力したExcelを読み戻してヘッダーと行数を確認
    let mut workbook = PlateWorkbook::open(xlsx).unwrap();
    let grid = workbook.read_grid("tidy").unwrap();
    assert_eq!(grid.height(), 97);
    assert_eq!(grid.get(0, 2), Some(&CellValue::from("Result_Value")));
}

#[test]
fn test_processing_is_idempotent() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture::default().write(config.input_file().unwrap());

    let assembler = PlateAssembler::default();
    let first = pipeline::process_workbook(config.input_file().unwrap(), &config.sheet_names, &assembler).unwrap();
    let second = pipeline::process_workbook(config.input_file().unwrap(), &config.sheet_names, &assembler).unwrap();
    assert_eq!(first.tidy, second.tidy);
}

#[test]
fn test_short_results_sheet_fails_with_shape_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture {
        results_rows: 6,
        ..Default::default()
    }
    .write(config.input_file().unwrap());

    let err = pipeline::run(&config, &PlateAssembler::default(), &ExportFormat::Csv, false)
        .unwrap_err();
    assert!(matches!(
        err,
        PioneerError::Common(plate_pioneer_common::Error::Shape { actual_rows: 6, .. })
    ));
    assert!(!config.output_file().unwrap().exists(), "エラー時にCSVが作成された");
}

#[test]
fn test_missing_sheet() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture {
        skip_sheet: Some("ta_map"),
        ..Default::default()
    }
    .write(config.input_file().unwrap());

    let err = pipeline::process_workbook(
        config.input_file().unwrap(),
        &config.sheet_names,
        &PlateAssembler::default(),
    )
    .unwrap_err();
    match err {
        PioneerError::MissingSheet { sheet, .. } => assert_eq!(sheet, "ta_map"),
        other => panic!("MissingSheetではない: {:?}", other),
    }
}

#[test]
fn test_require_experimenter() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture {
        metadata: vec![("Date", "2024-05-01")],
        ..Default::default()
    }
    .write(config.input_file().unwrap());

    // 必須でなければ処理は成功する
    let (plate, _) = pipeline::run(&config, &PlateAssembler::default(), &ExportFormat::Csv, false).unwrap();
    assert!(plate.metadata.experimenter().is_none());

    let err = pipeline::run(&config, &PlateAssembler::default(), &ExportFormat::Csv, true).unwrap_err();
    assert!(matches!(
        err,
        PioneerError::Common(plate_pioneer_common::Error::MissingField(_))
    ));
}

#[test]
fn test_date_metadata_cell_is_written_as_date() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = config_for(dir.path());
    PlateFixture {
        date_cell: true,
        ..Default::default()
    }
    .write(config.input_file().unwrap());

    let (plate, _) = pipeline::run(&config, &PlateAssembler::default(), &ExportFormat::Csv, false).unwrap();
    assert!(plate
        .tidy
        .rows()
        .all(|r| r.get("Date") == Some(&CellValue::from("2024-05-01"))));

    let csv = std::fs::read_to_string(config.output_file().unwrap()).unwrap();
    let first = csv.lines().nth(1).unwrap();
    assert!(first.contains(",2024-05-01,"), "日付がシリアル値のまま: {}", first);
}
