use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info};

use screenshot_resizer::config::{ExtensionMatch, OutputNaming, ResizeConfig};
use screenshot_resizer::util::formatter::str_formatter::format_bytes;
use screenshot_resizer::{logger, validate_input_dir, BatchResult, BatchRunner, Cli};

fn main() {
    if let Err(e) = run() {
        eprintln!("エラー: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // コマンドライン引数の解析
    let cli = Cli::parse();

    // ログ設定
    logger::init_logger(cli.log_level, cli.log_file.as_deref())?;

    // 入力パスの検証（存在しない・フォルダでない場合は処理前に終了）
    validate_input_dir(&cli.input_dir)?;

    let config = ResizeConfig {
        naming: if cli.fix_extension {
            OutputNaming::MatchFormat
        } else {
            OutputNaming::Preserve
        },
        extension_match: if cli.strict_extensions {
            ExtensionMatch::Strict
        } else {
            ExtensionMatch::CaseInsensitive
        },
        show_progress: !cli.no_progress,
        ..ResizeConfig::default()
    };

    display_resize_config(&cli, &config);

    info!("処理開始時刻: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let result = BatchRunner::new(config.clone())
        .run(&cli.input_dir)
        .with_context(|| "リサイズ処理中にエラーが発生しました")?;

    display_resize_results(&config.output_dir, &result);

    info!("処理終了時刻: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    Ok(())
}

fn display_resize_config(cli: &Cli, config: &ResizeConfig) {
    info!("==================================================");
    info!("スクリーンショットリサイズ v{}", env!("CARGO_PKG_VERSION"));
    info!("==================================================");
    info!("実行時設定:");
    info!(" - 入力フォルダ: {}", cli.input_dir.display());
    info!(" - 出力フォルダ: {}", config.output_dir.display());
    info!(" - 目標サイズ: {}", config.target_size);
    info!(" - JPEG品質: {}/100", config.jpeg_quality);
    info!(
        " - 拡張子の付け替え: {}",
        if cli.fix_extension { "する" } else { "しない" }
    );
    info!(" - ログレベル: {}", cli.log_level);
    info!("--------------------------------------------------");
}

fn display_resize_results(output_dir: &Path, result: &BatchResult) {
    info!("========================================");
    info!("リサイズ処理 完了");
    info!("----------------------------------------");
    info!("{}", result.summary());

    for failure in result.failures() {
        if let Err(e) = &failure.result {
            error!(" - {}", e);
        }
    }

    if result.succeeded > 0 {
        info!("出力サイズ合計: {}", format_bytes(result.bytes_written));
        let output_dir = output_dir
            .canonicalize()
            .unwrap_or_else(|_| output_dir.to_path_buf());
        info!("出力フォルダ: {}", output_dir.display());
    }
}
