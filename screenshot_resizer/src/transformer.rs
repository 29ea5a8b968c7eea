use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, ImageOutputFormat};
use log::{debug, info, warn};

use crate::config::{OutputNaming, ResizeConfig, TargetSize, DEFAULT_JPEG_QUALITY};
use crate::error::TransformError;

/// 出力画像の形式
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// 透過あり（可逆）
    Png,
    /// 透過なし（非可逆）
    Jpeg,
}

impl OutputFormat {
    /// カラータイプから保存形式を決める（アルファチャンネルがあればPNG）
    pub fn for_color(color: ColorType) -> Self {
        if color.has_alpha() {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg
        }
    }

    /// 付け替え時に使う拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// この形式として扱ってよい拡張子か（大文字・小文字は区別しない）
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        match self {
            OutputFormat::Png => ext == "png",
            OutputFormat::Jpeg => ext == "jpg" || ext == "jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// 変換1件の結果
#[derive(Debug, Clone)]
pub struct TransformReport {
    pub original_size: (u32, u32),
    pub output_size: (u32, u32),
    pub format: OutputFormat,
    pub output_path: PathBuf,
    pub bytes_written: u64,
}

/// 1枚の画像を指定サイズへリサイズして保存する
#[derive(Clone, Debug)]
pub struct ImageTransformer {
    target_size: TargetSize,
    jpeg_quality: u8,
    naming: OutputNaming,
}

impl ImageTransformer {
    pub fn new(target_size: TargetSize) -> Self {
        Self {
            target_size,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            naming: OutputNaming::Preserve,
        }
    }

    pub fn from_config(config: &ResizeConfig) -> Self {
        Self {
            target_size: config.target_size,
            jpeg_quality: config.jpeg_quality,
            naming: config.naming,
        }
    }

    pub fn with_naming(mut self, naming: OutputNaming) -> Self {
        self.naming = naming;
        self
    }

    /// `source` を読み込み、縦横比を無視して目標サイズに引き伸ばし、`destination` に書き出す。
    ///
    /// 透過ありならPNG、なしならJPEG（品質 `jpeg_quality`）で保存する。
    /// `OutputNaming::MatchFormat` の場合、実際の保存先は拡張子が付け替えられることがある。
    pub fn transform(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<TransformReport, TransformError> {
        debug!("デコード中: {}", source.display());
        let img = decode(source)?;
        let original_size = (img.width(), img.height());

        info!(
            "  {}x{} -> {}",
            original_size.0, original_size.1, self.target_size
        );

        debug!("リサンプリング中: {}", source.display());
        let resized = img.resize_exact(
            self.target_size.width(),
            self.target_size.height(),
            FilterType::Lanczos3,
        );
        drop(img);

        let format = OutputFormat::for_color(resized.color());
        let output_path = self.output_path_for(destination, format);

        debug!("エンコード中 ({}): {}", format, output_path.display());
        self.encode(&resized, format, &output_path)?;

        let bytes_written = written_size(&output_path);

        Ok(TransformReport {
            original_size,
            output_size: (resized.width(), resized.height()),
            format,
            output_path,
            bytes_written,
        })
    }

    /// 命名規則に従って実際の保存先を決める
    pub fn output_path_for(&self, destination: &Path, format: OutputFormat) -> PathBuf {
        match self.naming {
            OutputNaming::Preserve => destination.to_path_buf(),
            OutputNaming::MatchFormat => {
                let matches = destination
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| format.matches_extension(e))
                    .unwrap_or(false);
                if matches {
                    destination.to_path_buf()
                } else {
                    destination.with_extension(format.extension())
                }
            }
        }
    }

    fn encode(
        &self,
        img: &DynamicImage,
        format: OutputFormat,
        output_path: &Path,
    ) -> Result<(), TransformError> {
        let output_file =
            fs::File::create(output_path).map_err(|e| TransformError::encode(output_path, e))?;
        let mut writer = BufWriter::new(output_file);

        match format {
            OutputFormat::Png => img
                .write_to(&mut writer, ImageOutputFormat::Png)
                .map_err(|e| TransformError::encode(output_path, e))?,
            OutputFormat::Jpeg => {
                let mut encoder = JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality);
                // グレースケールはそのまま、それ以外は8bit RGBに揃える
                let result = if img.color().has_color() {
                    let rgb = img.to_rgb8();
                    encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                } else {
                    let luma = img.to_luma8();
                    encoder.encode(luma.as_raw(), luma.width(), luma.height(), ColorType::L8)
                };
                result.map_err(|e| TransformError::encode(output_path, e))?;
            }
        }

        writer
            .flush()
            .map_err(|e| TransformError::encode(output_path, e))
    }
}

/// 書き込み後のファイルサイズ（取得できなければ警告して0）
fn written_size(path: &Path) -> u64 {
    match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            warn!(
                "出力ファイルのサイズを取得できません: {}: {}",
                path.display(),
                e
            );
            0
        }
    }
}

/// ファイル内容から形式を推測してデコードする（拡張子は見ない）
fn decode(source: &Path) -> Result<DynamicImage, TransformError> {
    ImageReader::open(source)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| TransformError::decode(source, e))?
        .decode()
        .map_err(|e| TransformError::decode(source, e))
}

/// 既定の品質・命名規則で1枚をリサイズする
pub fn resize_image(
    source: &Path,
    destination: &Path,
    target_size: TargetSize,
) -> Result<TransformReport, TransformError> {
    ImageTransformer::new(target_size).transform(source, destination)
}

/// 単一ファイルをリサイズする。`output` が無ければ入力と同じフォルダに `<stem>_resized.<ext>` で保存する。
pub fn resize_screenshot(
    input: &Path,
    output: Option<&Path>,
    config: &ResizeConfig,
) -> Result<TransformReport, TransformError> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_resized_path(input),
    };

    let report = ImageTransformer::from_config(config).transform(input, &output)?;
    info!(
        "{}で保存しました: {}",
        report.format,
        report.output_path.display()
    );
    Ok(report)
}

/// `dir/name.ext` → `dir/name_resized.ext`
pub fn default_resized_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}_resized.{}", stem, ext.to_string_lossy()),
        None => format!("{}_resized", stem),
    };
    input.with_file_name(file_name)
}
