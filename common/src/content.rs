//! コンテンツJSONの読み込み
//!
//! 受け付ける形式:
//! - 正規化済みの `ProjectRecord` 配列
//! - 正規化済みの `ProjectsSection` オブジェクト（`fetch` の出力）
//! - Prismic のスライス / ドキュメント / `documents/search` レスポンス

use crate::error::{Error, Result};
use crate::prismic::{Document, SearchResponse, Slice, DEFAULT_SECTION_ID};
use crate::types::{ProjectRecord, RichText};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// プロジェクト欄1つ分（見出し + レコード列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectsSection {
    pub heading: Option<String>,
    pub description: Option<RichText>,
    pub section_id: String,
    pub projects: Vec<ProjectRecord>,
}

impl Default for ProjectsSection {
    fn default() -> Self {
        Self {
            heading: None,
            description: None,
            section_id: DEFAULT_SECTION_ID.to_string(),
            projects: Vec::new(),
        }
    }
}

impl ProjectsSection {
    pub fn from_projects(projects: Vec<ProjectRecord>) -> Self {
        Self {
            projects,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// JSON文字列から読み込み
pub fn parse_section(json: &str) -> Result<ProjectsSection> {
    let value: Value = serde_json::from_str(json)?;
    section_from_value(value)
}

/// レコード列だけ欲しい場合
pub fn parse_projects(json: &str) -> Result<Vec<ProjectRecord>> {
    parse_section(json).map(|section| section.projects)
}

pub fn section_from_value(value: Value) -> Result<ProjectsSection> {
    match &value {
        Value::Array(_) => {
            let projects: Vec<ProjectRecord> = serde_json::from_value(value)?;
            Ok(ProjectsSection::from_projects(projects))
        }
        Value::Object(map) if map.contains_key("results") => {
            let response: SearchResponse = serde_json::from_value(value)?;
            response
                .results
                .iter()
                .find_map(Document::projects_slice)
                .map(Slice::into_section)
                .ok_or_else(missing_slice)
        }
        Value::Object(map) if map.contains_key("slice_type") => {
            let slice: Slice = serde_json::from_value(value)?;
            if !slice.is_projects() {
                return Err(missing_slice());
            }
            Ok(slice.into_section())
        }
        Value::Object(map) if map.contains_key("data") => {
            let document: Document = serde_json::from_value(value)?;
            document
                .projects_slice()
                .map(Slice::into_section)
                .ok_or_else(missing_slice)
        }
        Value::Object(map) if map.contains_key("projects") => {
            Ok(serde_json::from_value(value)?)
        }
        _ => Err(Error::Content("未対応のコンテンツ形式です".to_string())),
    }
}

fn missing_slice() -> Error {
    Error::Content("projectsスライスが見つかりません".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalized_array() {
        let projects = parse_projects(r#"[{"name": "A"}, {"name": "B", "techStack": "Go"}]"#).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].tech_stack_items(), vec!["Go"]);
    }

    #[test]
    fn test_parse_empty_array_is_ok() {
        let section = parse_section("[]").unwrap();
        assert!(section.is_empty());
        assert_eq!(section.section_id, "projects");
    }

    #[test]
    fn test_parse_normalized_section() {
        let section = parse_section(
            r#"{"heading": "Work", "sectionId": "work", "projects": [{"name": "A"}]}"#,
        )
        .unwrap();
        assert_eq!(section.heading.as_deref(), Some("Work"));
        assert_eq!(section.section_id, "work");
        assert_eq!(section.projects.len(), 1);
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"page": 1, "results": [
            {"id": "a", "type": "homepage", "data": {"slices": [
                {"slice_type": "projects", "primary": {"projects": [{"project_name": "From CMS"}]}}
            ]}}
        ]}"#;
        let projects = parse_projects(json).unwrap();
        assert_eq!(projects[0].name, "From CMS");
    }

    #[test]
    fn test_document_without_projects() {
        let json = r#"{"id": "a", "type": "homepage", "data": {"slices": []}}"#;
        let err = parse_section(json).unwrap_err();
        assert!(matches!(err, Error::Content(_)));
    }

    #[test]
    fn test_other_slice_rejected() {
        let err = parse_section(r#"{"slice_type": "hero", "primary": {}}"#).unwrap_err();
        assert!(format!("{}", err).contains("projects"));
    }

    #[test]
    fn test_unsupported_shape() {
        assert!(matches!(parse_section("42"), Err(Error::Content(_))));
        assert!(matches!(parse_section("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_section_roundtrip_keeps_camel_case() {
        let section = ProjectsSection::from_projects(vec![ProjectRecord {
            name: "A".into(),
            ..Default::default()
        }]);
        let json = serde_json::to_string(&section).unwrap();
        assert!(json.contains("\"sectionId\":\"projects\""));
        assert_eq!(parse_section(&json).unwrap(), section);
    }
}
