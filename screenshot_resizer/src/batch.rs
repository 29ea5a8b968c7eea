use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use walkdir::WalkDir;

use crate::config::{ExtensionMatch, ResizeConfig, TargetSize};
use crate::error::{InputPathError, TransformError};
use crate::logger;
use crate::transformer::{ImageTransformer, TransformReport};
use crate::util::formatter::str_formatter::format_bytes;
use crate::util::time::time_util::estimate_remaining_time;

/// 1ファイル分の処理結果
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub result: Result<TransformReport, TransformError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// 一括処理の集計（attempted = succeeded + failed）
#[derive(Debug, Default)]
pub struct BatchResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_written: u64,
    pub elapsed: Duration,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    fn record(&mut self, outcome: FileOutcome) {
        self.attempted += 1;
        match &outcome.result {
            Ok(report) => {
                self.succeeded += 1;
                self.bytes_written += report.bytes_written;
            }
            Err(_) => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// 失敗したファイルのみ
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn summary(&self) -> String {
        format!(
            "処理 {} ファイル: 成功 {}, 失敗 {} (出力 {}, {:.2}秒)",
            self.attempted,
            self.succeeded,
            self.failed,
            format_bytes(self.bytes_written),
            self.elapsed.as_secs_f64()
        )
    }
}

/// フォルダ内の画像を1枚ずつ順番にリサイズする
pub struct BatchRunner {
    config: ResizeConfig,
    transformer: ImageTransformer,
}

impl BatchRunner {
    pub fn new(config: ResizeConfig) -> Self {
        let transformer = ImageTransformer::from_config(&config);
        Self {
            config,
            transformer,
        }
    }

    /// `input_dir` 直下の画像を `config.output_dir` に書き出す。
    ///
    /// 入力フォルダの存在確認は呼び出し側の責任。個々のファイルの失敗は
    /// `BatchResult` に記録するだけで処理は続行する。出力フォルダを作れない場合のみエラーを返す。
    pub fn run(&self, input_dir: &Path) -> Result<BatchResult> {
        let start_time = Instant::now();
        let output_dir = &self.config.output_dir;

        fs::create_dir_all(output_dir).with_context(|| {
            format!(
                "出力フォルダの作成に失敗しました: {}",
                output_dir.display()
            )
        })?;

        let files = collect_image_files(input_dir, self.config.extension_match);
        if files.is_empty() {
            warn!("入力フォルダに画像がありません: {}", input_dir.display());
            return Ok(BatchResult::default());
        }

        let total_files = files.len();
        info!("合計 {} 枚の画像を処理します", total_files);
        info!("出力フォルダ: {}", output_dir.display());

        let progress_bar = self.progress_bar(total_files);
        let mut result = BatchResult::default();
        let mut written = HashSet::new();

        for (i, source) in files.into_iter().enumerate() {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            info!(
                "[{}/{}] {}",
                i + 1,
                total_files,
                file_name.to_string_lossy()
            );

            let destination = output_dir.join(file_name);
            let outcome = match self.transformer.transform(&source, &destination) {
                Ok(report) => {
                    if !written.insert(report.output_path.clone()) {
                        warn!(
                            "同じ出力ファイルを上書きしました: {}",
                            report.output_path.display()
                        );
                    }
                    FileOutcome {
                        source,
                        destination,
                        result: Ok(report),
                    }
                }
                Err(e) => {
                    error!("  {}", e);
                    FileOutcome {
                        source,
                        destination,
                        result: Err(e),
                    }
                }
            };
            result.record(outcome);

            progress_bar.inc(1);
            progress_bar.set_message(format!(
                "残り約{:.0}分",
                estimate_remaining_time(
                    result.attempted,
                    total_files,
                    start_time.elapsed().as_secs_f64()
                )
            ));
        }

        progress_bar.finish_with_message(format!(
            "処理完了：成功 {}, 失敗 {}",
            result.succeeded, result.failed
        ));
        logger::set_progress_bar(None);

        result.elapsed = start_time.elapsed();
        Ok(result)
    }

    fn progress_bar(&self, total_files: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");

        let progress_bar = ProgressBar::new(total_files as u64);
        progress_bar.set_style(style);
        progress_bar.set_message("処理中...");
        logger::set_progress_bar(Some(progress_bar.clone()));
        progress_bar
    }
}

/// 入力フォルダが存在し、ディレクトリであることを確認する
pub fn validate_input_dir(path: &Path) -> Result<(), InputPathError> {
    if !path.exists() {
        return Err(InputPathError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(InputPathError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// フォルダ直下（再帰しない）の画像ファイルをファイル名順に列挙する
pub fn collect_image_files(dir: &Path, extension_match: ExtensionMatch) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| extension_match.is_image(p))
        .collect()
}

/// 出力先を省略したときのフォルダ名（入力フォルダ内に作る）
pub const DEFAULT_BATCH_OUTPUT_DIR: &str = "resized";

/// 既定設定で `input_dir` の画像を `target_size` にリサイズする。
/// `output_dir` が無ければ `<input_dir>/resized` に保存する。
pub fn resize_directory(
    input_dir: &Path,
    output_dir: Option<&Path>,
    target_size: TargetSize,
) -> Result<BatchResult> {
    let output_dir = match output_dir {
        Some(path) => path.to_path_buf(),
        None => input_dir.join(DEFAULT_BATCH_OUTPUT_DIR),
    };
    BatchRunner::new(ResizeConfig::new(output_dir, target_size)).run(input_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn target() -> TargetSize {
        TargetSize::new(16, 24).unwrap()
    }

    #[test]
    fn collects_only_top_level_images() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.PNG"), b"x").unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("c.Jpeg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.png"), b"x").unwrap();

        let names: Vec<_> = collect_image_files(dir.path(), ExtensionMatch::CaseInsensitive)
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.Jpeg"]);

        let strict = collect_image_files(dir.path(), ExtensionMatch::Strict);
        assert_eq!(strict.len(), 2);
    }

    #[test]
    fn validate_input_dir_rejects_missing_and_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.png");
        fs::write(&file, b"x").unwrap();

        assert!(validate_input_dir(dir.path()).is_ok());
        assert_eq!(
            validate_input_dir(&dir.path().join("missing")),
            Err(InputPathError::NotFound(dir.path().join("missing")))
        );
        assert_eq!(
            validate_input_dir(&file),
            Err(InputPathError::NotADirectory(file))
        );
    }

    #[test]
    fn empty_input_completes_without_outputs() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let out_dir = output.path().join("out");

        let result = resize_directory(input.path(), Some(&out_dir), target()).unwrap();

        assert_eq!(result.attempted, 0);
        assert_eq!(result.failed, 0);
        assert!(out_dir.is_dir());
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[test]
    fn corrupt_file_does_not_abort_batch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 4]))
            .save(input.path().join("a.png"))
            .unwrap();
        fs::write(input.path().join("b.png"), b"garbage").unwrap();
        RgbImage::from_pixel(10, 10, Rgb([5, 6, 7]))
            .save(input.path().join("c.jpg"))
            .unwrap();

        let result = resize_directory(input.path(), Some(output.path()), target()).unwrap();

        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.attempted, result.succeeded + result.failed);

        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, input.path().join("b.png"));
        assert!(failures[0].result.as_ref().unwrap_err().is_decode());

        assert!(output.path().join("a.png").exists());
        assert!(!output.path().join("b.png").exists());
        assert!(output.path().join("c.jpg").exists());
        assert!(result.summary().contains("失敗 1"));
    }
}
