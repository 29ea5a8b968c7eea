use std::path::PathBuf;

use thiserror::Error;

/// 1ファイルの変換エラー
#[derive(Error, Debug)]
pub enum TransformError {
    /// 入力ファイルを開けない、または画像として解析できない
    #[error("画像の読み込みに失敗しました: {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 出力ファイルを作成・書き込みできない
    #[error("画像の保存に失敗しました: {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl TransformError {
    pub(crate) fn decode(path: impl Into<PathBuf>, source: impl Into<image::ImageError>) -> Self {
        Self::Decode {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn encode(path: impl Into<PathBuf>, source: impl Into<image::ImageError>) -> Self {
        Self::Encode {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }
}

/// 入力フォルダの事前チェックエラー（処理開始前に中止する）
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputPathError {
    #[error("入力フォルダが存在しません: {}", .0.display())]
    NotFound(PathBuf),

    #[error("入力パスがフォルダではありません: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// 設定値エラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("サイズは1ピクセル以上である必要があります: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}
