use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use fern::colors::{Color, ColoredLevelConfig};
use indicatif::ProgressBar;
use log::LevelFilter;
use regex::Regex;

use crate::cli::LogLevel;

// 表示中のプログレスバー（ログ出力時に一時的に退避させる）
static PROGRESS_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// ログ出力と重ならないように管理するプログレスバーを登録・解除する
pub fn set_progress_bar(progress_bar: Option<ProgressBar>) {
    if let Ok(mut current) = PROGRESS_BAR.lock() {
        *current = progress_bar;
    }
}

// プログレスバーがあれば退避させてから標準出力に書く
fn print_line(line: &str) {
    match PROGRESS_BAR.lock() {
        Ok(current) => match current.as_ref() {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        },
        Err(_) => println!("{}", line),
    }
}

/// ロガーを初期化する
pub fn init_logger(log_level: LogLevel, log_file: Option<&Path>) -> Result<()> {
    // ログレベルの設定
    let level_filter = match log_level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    };

    // カラー設定
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    // ファイルパス（拡張子付き）
    let path_pattern = Regex::new(
        r#"((^|[\s\(\["'])([A-Za-z]:)?[/\\]?([^<>:"\|?*\s]|[^\x00-\x7F])+\.(?i:png|jpe?g|log))"#,
    )?;

    // 画像サイズ（1284x2778）、件数（3/10）、単位付きの数値
    let number_pattern = Regex::new(
        r"(\b\d+x\d+\b)|(\d+/\d+)|(\b\d+(\.\d+)?(\s?(KB|MB|GB|bytes)|%|秒|分|枚)?)",
    )?;

    // コンソール出力（色付き）
    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = Local::now()
                .format("[%Y-%m-%d %H:%M:%S]")
                .to_string()
                .blue()
                .bold();

            // モジュール名を黄色で表示
            let module = record.target();
            let target_parts: Vec<&str> = module.split("::").collect();
            let target = if target_parts.len() > 1 {
                format!(
                    "[{}::{}]",
                    target_parts[0].yellow(),
                    target_parts[1..].join("::").yellow().bold()
                )
            } else {
                format!("[{}]", module.yellow())
            };

            let level = colors.color(record.level());

            // パスを緑色に
            let colored_message = message.to_string();
            let colored_message = path_pattern.replace_all(&colored_message, |caps: &regex::Captures| {
                caps[0].green().to_string()
            });

            // 数値を紫色に
            let colored_message = number_pattern.replace_all(&colored_message, |caps: &regex::Captures| {
                caps[0].purple().bold().to_string()
            });

            out.finish(format_args!(
                "{} {} [{}] {}",
                timestamp, target, level, colored_message
            ))
        })
        .chain(fern::Output::call(|record| print_line(&record.args().to_string())));

    let mut dispatch = fern::Dispatch::new().level(level_filter).chain(console);

    // ファイル出力（色なし）
    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .with_context(|| format!("ログファイルを開けませんでした: {}", path.display()))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} [{}] [{}] {}",
                        Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                        record.target(),
                        record.level(),
                        message
                    ))
                })
                .chain(file),
        );
    }

    dispatch.apply()?;

    Ok(())
}
