//! 対話モード
//!
//! ファイル選択 → 処理 → 表示 → 出力/DB保存 をメニューから繰り返す。
//! 各操作のエラーは表示するだけでセッションは継続する。

use crate::config::Config;
use crate::error::{PioneerError, Result};
use crate::export;
use crate::preview;
use crate::session::Session;
use crate::store::ResultStore;
use dialoguer::{Input, Select};
use indicatif::ProgressBar;
use plate_pioneer_common::PlateAssembler;
use std::path::PathBuf;
use std::time::Duration;

const PREVIEW_ROWS: usize = 20;

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SelectFile,
    Process,
    ShowTable,
    ShowPlate,
    Export,
    SaveDatabase,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::SelectFile,
        MenuAction::Process,
        MenuAction::ShowTable,
        MenuAction::ShowPlate,
        MenuAction::Export,
        MenuAction::SaveDatabase,
        MenuAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::SelectFile => "📂 Excelファイルを選択",
            MenuAction::Process => "🚀 プレートデータを処理",
            MenuAction::ShowTable => "📊 整形済みテーブルを表示",
            MenuAction::ShowPlate => "🔬 結果プレートを表示",
            MenuAction::Export => "📄 CSV/Excelに出力",
            MenuAction::SaveDatabase => "💾 データベースに保存",
            MenuAction::Quit => "終了",
        }
    }
}

pub fn run_interactive(config: &Config, assembler: &PlateAssembler) -> Result<()> {
    println!("🔬 plate-pioneer - 96ウェルプレート処理\n");

    let mut session = Session::new();
    if let Some(input) = &config.file_paths.input_file {
        session.select_file(input.clone());
        println!("入力ファイル: {}\n", input.display());
    }

    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();

    loop {
        let selection = Select::new()
            .with_prompt("操作を選択")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| PioneerError::Prompt(e.to_string()))?;

        let action = MenuAction::ALL[selection];
        if action == MenuAction::Quit {
            break;
        }

        if let Err(e) = handle_action(action, &mut session, config, assembler) {
            tracing::debug!(?action, error = ?e, "action failed");
            println!("✖ {}\n", e);
        }
    }

    Ok(())
}

fn handle_action(
    action: MenuAction,
    session: &mut Session,
    config: &Config,
    assembler: &PlateAssembler,
) -> Result<()> {
    match action {
        MenuAction::SelectFile => {
            let default = session
                .source()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let path: String = Input::new()
                .with_prompt("Excelファイル (.xlsx)")
                .with_initial_text(default)
                .interact_text()
                .map_err(|e| PioneerError::Prompt(e.to_string()))?;
            let path = PathBuf::from(path.trim());
            if !path.exists() {
                return Err(PioneerError::FileNotFound(path.display().to_string()));
            }
            session.select_file(path);
            println!("✔ ファイルを選択しました（前回の結果はクリア）\n");
        }
        MenuAction::Process => {
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("データを処理中...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let result = session.process(&config.sheet_names, assembler);
            spinner.finish_and_clear();

            let plate = result?;
            println!("✔ 処理完了: {}行 x {}列\n", plate.tidy.len(), plate.tidy.columns().len());
        }
        MenuAction::ShowTable => {
            let plate = session.processed().ok_or(PioneerError::NothingProcessed)?;
            println!("{}", preview::render_table(&plate.tidy, PREVIEW_ROWS));
        }
        MenuAction::ShowPlate => {
            let plate = session.processed().ok_or(PioneerError::NothingProcessed)?;
            println!("Result_Value\n{}", preview::render_plate(&plate.results));
            println!("{}", preview::render_heatmap(&plate.results));
        }
        MenuAction::Export => {
            let plate = session.processed().ok_or(PioneerError::NothingProcessed)?;
            let default = config
                .file_paths
                .output_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("{}.csv", export::DEFAULT_STEM));
            let path: String = Input::new()
                .with_prompt("出力ファイル (.csv / .xlsx)")
                .with_initial_text(default)
                .interact_text()
                .map_err(|e| PioneerError::Prompt(e.to_string()))?;
            let path = PathBuf::from(path.trim());
            let format = export::format_for_path(&path);
            for written in export::export_table(&plate.tidy, &format, &path)? {
                println!("✔ 出力: {}", written.display());
            }
            println!();
        }
        MenuAction::SaveDatabase => {
            let mut store = ResultStore::open(&config.database.path)?;
            let count = session.save(&mut store, &config.database.table)?;
            println!(
                "✔ {}行を保存しました: {} (テーブル: {})\n",
                count,
                config.database.path.display(),
                config.database.table
            );
        }
        MenuAction::Quit => {}
    }
    Ok(())
}
