use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// コマンドライン引数の解析のためのデータ構造
#[derive(Parser, Debug)]
#[command(author, version, about = "スクリーンショットをApp Store提出用サイズに一括リサイズするユーティリティ", long_about = None)]
pub struct Cli {
    /// 入力フォルダのパス
    #[arg(help = "リサイズする画像（PNG/JPEG）が格納されているフォルダのパスを指定します。")]
    pub input_dir: PathBuf,

    /// ログレベル（error=エラーのみ, warn=警告, info=情報, debug=デバッグ, trace=詳細デバッグ）
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info, help = "ログレベルを指定します。error=エラーのみ, warn=警告, info=情報, debug=デバッグ, trace=詳細デバッグ（デフォルトはinfo）")]
    pub log_level: LogLevel,

    /// 保存形式と拡張子が一致しない場合に拡張子を付け替える
    #[arg(
        long,
        default_value_t = false,
        help = "透過ありのJPEGなど、保存形式と拡張子が食い違う場合に拡張子を付け替えます（.png / .jpg）。"
    )]
    pub fix_extension: bool,

    /// 拡張子の大文字・小文字を厳密に判定する
    #[arg(
        long,
        default_value_t = false,
        help = "全小文字・全大文字の拡張子のみを対象にします（.Png などは対象外）。"
    )]
    pub strict_extensions: bool,

    /// ログファイルのパス
    #[arg(long, help = "ログをファイルにも出力します。")]
    pub log_file: Option<PathBuf>,

    /// プログレスバーを表示しない
    #[arg(long, default_value_t = false, help = "プログレスバーを表示しません。")]
    pub no_progress: bool,
}

/// ログレベルの列挙型
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_positional_argument() {
        let cli = Cli::try_parse_from(["screenshot_resizer", "shots"]).unwrap();
        assert_eq!(cli.input_dir, PathBuf::from("shots"));
        assert_eq!(cli.log_level, LogLevel::Info);
        assert!(!cli.fix_extension);
        assert!(!cli.strict_extensions);
        assert!(!cli.no_progress);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn input_dir_is_required() {
        assert!(Cli::try_parse_from(["screenshot_resizer"]).is_err());
    }

    #[test]
    fn options() {
        let cli = Cli::try_parse_from([
            "screenshot_resizer",
            "shots",
            "-l",
            "debug",
            "--fix-extension",
            "--strict-extensions",
            "--no-progress",
            "--log-file",
            "resize.log",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(cli.fix_extension);
        assert!(cli.strict_extensions);
        assert!(cli.no_progress);
        assert_eq!(cli.log_file, Some(PathBuf::from("resize.log")));
    }
}
