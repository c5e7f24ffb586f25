use clap::{Parser, Subcommand};
use plate_pioneer_common::PlateShape;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plate-pioneer")]
#[command(about = "96ウェルプレートの実験データを整形済みCSVに変換", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時: ./config.yml → ~/.config/plate-pioneer/config.yml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Excelファイルを処理して整形済みテーブルを出力
    Process {
        /// 入力Excelファイル（省略時: file_paths.input_file）
        input: Option<PathBuf>,

        /// 出力ファイル/ディレクトリ（省略時: file_paths.output_file）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/excel/both)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// プレートサイズ (96/384)
        #[arg(long, default_value = "96")]
        plate: PlateSize,

        /// メタデータキーが固定列名と衝突したらエラーにする
        #[arg(long)]
        reject_collisions: bool,

        /// Experimenter がなければエラーにする
        #[arg(long)]
        require_experimenter: bool,

        /// 結果をデータベースにも保存
        #[arg(long)]
        save_db: bool,
    },

    /// 処理結果をプレビュー表示（ファイルは出力しない）
    Show {
        /// 入力Excelファイル（省略時: file_paths.input_file）
        input: Option<PathBuf>,

        /// 表示行数
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,

        /// プレートサイズ (96/384)
        #[arg(long, default_value = "96")]
        plate: PlateSize,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話モード
    Interactive {
        /// プレートサイズ (96/384)
        #[arg(long, default_value = "96")]
        plate: PlateSize,
    },

    /// 設定を表示/作成
    Config {
        /// 有効な設定を表示
        #[arg(long)]
        show: bool,

        /// 設定ファイルのひな形を作成
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

/// プレートサイズ
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlateSize {
    /// 8 x 12
    #[default]
    Wells96,
    /// 16 x 24
    Wells384,
}

impl PlateSize {
    pub fn shape(&self) -> PlateShape {
        match self {
            PlateSize::Wells96 => PlateShape::WELLS_96,
            PlateSize::Wells384 => PlateShape::WELLS_384,
        }
    }
}

impl std::str::FromStr for PlateSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "96" => Ok(PlateSize::Wells96),
            "384" => Ok(PlateSize::Wells384),
            _ => Err(format!("Unknown plate size: {}. Use 96 or 384", s)),
        }
    }
}

impl std::fmt::Display for PlateSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlateSize::Wells96 => write!(f, "96"),
            PlateSize::Wells384 => write!(f, "384"),
        }
    }
}
