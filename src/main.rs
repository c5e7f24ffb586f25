use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use plate_pioneer::{cli, config, export, interactive, logging, pipeline, preview, store};
use plate_pioneer_common::{CollisionPolicy, PlateAssembler, EXPERIMENTER_KEY};
use cli::{Cli, Commands};
use config::Config;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let mut config = Config::load(cli.config.as_deref()).context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Process { input, output, format, plate, reject_collisions, require_experimenter, save_db } => {
            println!("🔬 plate-pioneer - プレート処理\n");

            if let Some(input) = input {
                config.file_paths.input_file = Some(input);
            }
            if let Some(output) = output {
                config.file_paths.output_file = Some(output);
            }

            let policy = if reject_collisions { CollisionPolicy::Reject } else { CollisionPolicy::Overwrite };
            let assembler = PlateAssembler::new(plate.shape()).with_collision_policy(policy);

            // 1. 読み込み・変換
            println!("[1/3] {} を処理中... ({}ウェル)", config.input_file()?.display(), plate);
            let spinner = ProgressBar::new_spinner();
            spinner.enable_steady_tick(Duration::from_millis(100));
            let result = pipeline::run(&config, &assembler, &format, require_experimenter);
            spinner.finish_and_clear();
            let (processed, written) = result?;

            match processed.metadata.experimenter() {
                Some(name) => println!("✔ 実験者: {}", name),
                None => println!("⚠ メタデータに {} がありません", EXPERIMENTER_KEY),
            }
            println!(
                "✔ {}行 x {}列に変換\n",
                processed.tidy.len(),
                processed.tidy.columns().len()
            );

            // 2. 出力
            println!("[2/3] 出力");
            for path in &written {
                println!("✔ 出力: {}", path.display());
            }
            println!();

            // 3. DB保存
            if save_db {
                println!("[3/3] データベースに保存中...");
                let mut store = store::ResultStore::open(&config.database.path)?;
                let count = store.append(&config.database.table, &processed.tidy)?;
                println!(
                    "✔ {}行を保存: {} (テーブル: {})",
                    count,
                    config.database.path.display(),
                    config.database.table
                );
            } else {
                println!("[3/3] データベース保存はスキップ (--save-db で有効)");
            }

            println!("\n✅ 完了");
        }

        Commands::Show { input, rows, plate, json } => {
            if let Some(input) = input {
                config.file_paths.input_file = Some(input);
            }
            let assembler = PlateAssembler::new(plate.shape());
            let processed = pipeline::process_workbook(config.input_file()?, &config.sheet_names, &assembler)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&processed.tidy)?);
            } else {
                println!("Result_Value\n{}", preview::render_plate(&processed.results));
                println!("{}", preview::render_heatmap(&processed.results));
                println!("{}", preview::render_table(&processed.tidy, rows));
            }
        }

        Commands::Interactive { plate } => {
            let assembler = PlateAssembler::new(plate.shape());
            interactive::run_interactive(&config, &assembler)?;
        }

        Commands::Config { show, init } => {
            let show = show || init.is_none();
            if let Some(path) = init {
                if path.exists() {
                    anyhow::bail!("既に存在します: {}", path.display());
                }
                let mut template = Config::default();
                template.file_paths.input_file = Some("data/test_plate.xlsx".into());
                template.file_paths.output_file = Some(format!("data/{}.csv", export::DEFAULT_STEM).into());
                template.save(&path)?;
                println!("✔ 設定ファイルを作成しました: {}", path.display());
            }

            if show {
                println!("設定:");
                println!("{}", serde_yaml::to_string(&config)?);
            }
        }
    }

    Ok(())
}
