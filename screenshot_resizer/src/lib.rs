//! スクリーンショット一括リサイズユーティリティのライブラリクレート
//!
//! 指定されたフォルダ直下のPNG/JPEG画像を固定サイズに引き伸ばし、
//! 透過の有無に応じてPNGまたはJPEGで出力フォルダに保存します。

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod transformer;
pub mod util;

pub use batch::{resize_directory, validate_input_dir, BatchResult, BatchRunner, FileOutcome};
pub use cli::Cli;
pub use config::{ExtensionMatch, OutputNaming, ResizeConfig, TargetSize};
pub use error::{ConfigError, InputPathError, TransformError};
pub use transformer::{
    resize_image, resize_screenshot, ImageTransformer, OutputFormat, TransformReport,
};
