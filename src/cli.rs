use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "ポートフォリオのプロジェクトカルーセル用コンテンツ管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// コンテンツJSONを検証
    Check {
        /// JSONファイルまたはフォルダ（省略時は設定のcontent_path）
        path: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// カルーセルの配置とモーダルの内容を表示
    Preview {
        /// JSONファイル（省略時は設定のcontent_path）
        path: Option<PathBuf>,

        /// 中央に置くプロジェクトの番号（0始まり）
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// モバイル幅で配置を計算
        #[arg(long)]
        mobile: bool,
    },

    /// Prismicからprojectsスライスを取得して正規化JSONを保存
    Fetch {
        /// Prismicリポジトリ名（省略時は設定/環境変数）
        #[arg(long)]
        repo: Option<String>,

        /// ドキュメントの型
        #[arg(short, long)]
        document_type: Option<String>,

        /// 出力JSONファイル（デフォルト: 標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// Prismicリポジトリ名を設定
        #[arg(long)]
        set_repo: Option<String>,

        /// 既定のコンテンツファイルを設定
        #[arg(long)]
        set_content: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
