use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("Prismicリポジトリ名が設定されていません。`portfolio config --set-repo NAME` で設定してください")]
    MissingRepo,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("コンテンツが見つかりません: {0}")]
    NoContentFound(String),

    #[error("コンテンツの読み込みに失敗: {0}")]
    Content(#[from] portfolio_common::Error),

    #[error("プロジェクトが1件もありません: {0}")]
    EmptyProjectList(String),

    #[error("CMS取得エラー: {0}")]
    Fetch(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PortfolioError {
    fn from(err: reqwest::Error) -> Self {
        PortfolioError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
