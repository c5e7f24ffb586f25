use thiserror::Error;

#[derive(Error, Debug)]
pub enum PioneerError {
    #[error(transparent)]
    Common(#[from] plate_pioneer_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("シート '{sheet}' が見つかりません ({path})。4つのシート（メタデータ・結果・抗体・濃度）があるか確認してください")]
    MissingSheet { sheet: String, path: String },

    #[error("Excel読み込みエラー: {0}")]
    WorkbookRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("データベースエラー: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("列名 '{column}' は '{existing}' と大文字小文字だけが異なります（データベースでは同じ列になります）")]
    ColumnConflict { column: String, existing: String },

    #[error("YAML解析エラー: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("Excelファイルが選択されていません")]
    NoInputSelected,

    #[error("処理済みのデータがありません。先にプレートデータを処理してください")]
    NothingProcessed,
}

pub type Result<T> = std::result::Result<T, PioneerError>;
