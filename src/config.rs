use crate::error::{PortfolioError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const REPO_ENV: &str = "PRISMIC_REPO";
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Prismicリポジトリ名（https://{repo}.cdn.prismic.io）
    pub prismic_repo: Option<String>,
    pub access_token: Option<String>,
    /// projectsスライスを含むドキュメントの型
    pub document_type: String,
    /// 既定のコンテンツファイル
    pub content_path: Option<PathBuf>,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config.with_defaults())
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PortfolioError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("portfolio").join("config.json"))
    }

    pub fn default_config() -> Self {
        Self {
            prismic_repo: None,
            access_token: None,
            document_type: "homepage".into(),
            content_path: None,
            timeout_seconds: 30,
        }
    }

    /// 古い設定ファイルで欠けている値を補う
    fn with_defaults(mut self) -> Self {
        let defaults = Self::default_config();
        if self.document_type.trim().is_empty() {
            self.document_type = defaults.document_type;
        }
        if self.timeout_seconds == 0 {
            self.timeout_seconds = defaults.timeout_seconds;
        }
        self
    }

    pub fn get_repo(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(repo) = std::env::var(REPO_ENV) {
            if !repo.trim().is_empty() {
                return Ok(repo);
            }
        }

        self.prismic_repo.clone().ok_or(PortfolioError::MissingRepo)
    }

    pub fn get_access_token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.access_token.clone())
    }

    pub fn set_repo(&mut self, repo: String) -> Result<()> {
        self.prismic_repo = Some(repo);
        self.save()
    }

    pub fn set_content_path(&mut self, path: PathBuf) -> Result<()> {
        self.content_path = Some(path);
        self.save()
    }
}
