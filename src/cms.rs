//! Prismic REST API (v2) からの取得
//!
//! 1. `/api/v2` でマスターrefを得る
//! 2. `/api/v2/documents/search` で対象型のドキュメントを取得
//! 3. 最初の projects スライスを正規化する

use crate::error::{PortfolioError, Result};
use portfolio_common::content::section_from_value;
use portfolio_common::ProjectsSection;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

impl ApiInfo {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .or_else(|| self.refs.iter().find(|r| r.id == "master"))
            .map(|r| r.reference.as_str())
    }
}

pub fn api_endpoint(repo: &str) -> String {
    format!("https://{}.cdn.prismic.io/api/v2", repo.trim())
}

/// `[[at(document.type,"homepage")]]`
pub fn type_predicate(document_type: &str) -> String {
    format!("[[at(document.type,\"{}\")]]", document_type)
}

pub struct PrismicClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    verbose: bool,
}

impl PrismicClient {
    pub fn new(repo: &str, access_token: Option<String>, timeout_seconds: u64, verbose: bool) -> Result<Self> {
        if repo.trim().is_empty() {
            return Err(PortfolioError::MissingRepo);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            endpoint: api_endpoint(repo),
            access_token,
            verbose,
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let mut query = query.to_vec();
        if let Some(token) = &self.access_token {
            query.push(("access_token", token.clone()));
        }

        if self.verbose {
            eprintln!("  GET {}", url);
        }
        let response = self.client.get(url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PortfolioError::Fetch(format!("{}: {}", status, text)));
        }
        Ok(response.json().await?)
    }

    pub async fn master_ref(&self) -> Result<String> {
        let value = self.get_json(&self.endpoint, &[]).await?;
        let info: ApiInfo = serde_json::from_value(value)?;
        info.master_ref()
            .map(str::to_string)
            .ok_or_else(|| PortfolioError::Fetch("マスターrefがありません".into()))
    }

    pub async fn fetch_section(&self, document_type: &str) -> Result<ProjectsSection> {
        let reference = self.master_ref().await?;
        let url = format!("{}/documents/search", self.endpoint);
        let value = self
            .get_json(
                &url,
                &[
                    ("ref", reference),
                    ("q", type_predicate(document_type)),
                ],
            )
            .await?;
        Ok(section_from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_ref_selection() {
        let info: ApiInfo = serde_json::from_str(
            r#"{"refs": [
                {"id": "preview", "ref": "P1", "label": "Preview"},
                {"id": "master", "ref": "M1", "label": "Master", "isMasterRef": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(info.master_ref(), Some("M1"));

        let fallback: ApiInfo = serde_json::from_str(r#"{"refs": [{"id": "master", "ref": "M2"}]}"#).unwrap();
        assert_eq!(fallback.master_ref(), Some("M2"));

        let empty: ApiInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.master_ref(), None);
    }

    #[test]
    fn test_endpoint_and_predicate() {
        assert_eq!(api_endpoint(" my-site "), "https://my-site.cdn.prismic.io/api/v2");
        assert_eq!(type_predicate("homepage"), r#"[[at(document.type,"homepage")]]"#);
    }

    #[test]
    fn test_client_requires_repo() {
        assert!(matches!(
            PrismicClient::new("  ", None, 5, false),
            Err(PortfolioError::MissingRepo)
        ));
    }
}
