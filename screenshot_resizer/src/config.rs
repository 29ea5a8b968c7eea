use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// App Store提出用のスクリーンショットサイズ（6.5インチ）
pub const DEFAULT_TARGET_SIZE: TargetSize = TargetSize {
    width: 1284,
    height: 2778,
};

/// JPEG保存時の品質
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// 出力フォルダ名（カレントディレクトリ基準）
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// 大文字・小文字を区別する場合の拡張子リスト
const STRICT_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "PNG", "JPG", "JPEG"];

/// リサイズ後の画像サイズ（ピクセル）
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetSize {
    width: u32,
    height: u32,
}

impl TargetSize {
    /// 幅・高さともに1以上であることを検証して作成する
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 出力ファイル名の決め方
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputNaming {
    /// 入力ファイル名をそのまま使う（拡張子と中身の形式が食い違うことがある）
    #[default]
    Preserve,
    /// 保存形式と拡張子が食い違う場合は拡張子を付け替える
    MatchFormat,
}

/// 対象ファイルの拡張子判定方法
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExtensionMatch {
    /// 大文字・小文字を区別しない（`.Png` も対象）
    #[default]
    CaseInsensitive,
    /// 全小文字・全大文字のみ対象
    Strict,
}

impl ExtensionMatch {
    /// パスが処理対象の画像拡張子を持つかどうか
    pub fn is_image(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };

        match self {
            ExtensionMatch::CaseInsensitive => {
                matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg")
            }
            ExtensionMatch::Strict => STRICT_EXTENSIONS.contains(&ext),
        }
    }
}

/// 一括リサイズの設定
#[derive(Clone, Debug)]
pub struct ResizeConfig {
    pub target_size: TargetSize,
    pub jpeg_quality: u8,
    pub output_dir: PathBuf,
    pub naming: OutputNaming,
    pub extension_match: ExtensionMatch,
    pub show_progress: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            naming: OutputNaming::default(),
            extension_match: ExtensionMatch::default(),
            show_progress: false,
        }
    }
}

impl ResizeConfig {
    /// 出力先とサイズだけを指定した設定を作成する
    pub fn new(output_dir: impl Into<PathBuf>, target_size: TargetSize) -> Self {
        Self {
            target_size,
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}
