//! Prismic の "projects" スライスの読み込み
//!
//! CMSのフィールド名（snake_case）をそのまま受け取り、
//! [`ProjectRecord`] へ変換する。空の画像フィールド（`{}`）や
//! `link_type: "Any"` の空リンクはここで落とす。

use crate::links::ProjectLink;
use crate::types::{ImageRef, ProjectRecord, RichText, TextBlock};
use serde::Deserialize;

pub const PROJECTS_SLICE_TYPE: &str = "projects";
pub const DEFAULT_SECTION_ID: &str = "projects";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrismicImage {
    pub url: Option<String>,
    pub alt: Option<String>,
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrismicLink {
    pub link_type: Option<String>,
    pub url: Option<String>,
}

/// スライス内のプロジェクト1件
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    pub project_name: Option<String>,
    pub project_description: Option<Vec<TextBlock>>,
    pub project_expanded_description: Option<Vec<TextBlock>>,
    pub project_image: Option<PrismicImage>,
    pub tech_stack: Option<Vec<TextBlock>>,
    pub project_link: Option<Vec<PrismicLink>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectsPrimary {
    pub heading: Option<String>,
    // CMS側のフィールド名は綴り違いのまま公開されている
    #[serde(alias = "decsription")]
    pub description: Option<Vec<TextBlock>>,
    pub section_id: Option<String>,
    pub projects: Option<Vec<ProjectItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Slice {
    pub slice_type: String,
    pub variation: Option<String>,
    pub primary: ProjectsPrimary,
    /// 旧形式の繰り返しフィールド
    pub items: Vec<ProjectItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentData {
    pub slices: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub data: DocumentData,
}

/// `documents/search` のレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub results: Vec<Document>,
}

fn rich_text(blocks: Option<Vec<TextBlock>>) -> Option<RichText> {
    blocks
        .map(|blocks| RichText { blocks })
        .filter(|text| text.is_filled())
}

impl PrismicImage {
    /// 未設定の画像フィールドは `{}` で届く
    pub fn into_image(self) -> Option<ImageRef> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        let dimensions = self.dimensions.unwrap_or_default();
        Some(ImageRef {
            url,
            alt: self.alt.filter(|a| !a.trim().is_empty()),
            width: dimensions.width,
            height: dimensions.height,
        })
    }
}

impl PrismicLink {
    /// 中身のあるリンクだけ
    pub fn into_link(self) -> Option<ProjectLink> {
        if self.link_type.as_deref() == Some("Any") {
            return None;
        }
        self.url
            .filter(|u| !u.trim().is_empty())
            .map(ProjectLink::new)
    }
}

impl From<ProjectItem> for ProjectRecord {
    fn from(item: ProjectItem) -> Self {
        ProjectRecord {
            name: item.project_name.unwrap_or_default().trim().to_string(),
            short_description: rich_text(item.project_description),
            long_description: rich_text(item.project_expanded_description),
            image: item.project_image.and_then(PrismicImage::into_image),
            tech_stack: rich_text(item.tech_stack).map(|t| t.as_text()),
            links: item
                .project_link
                .unwrap_or_default()
                .into_iter()
                .filter_map(PrismicLink::into_link)
                .collect(),
        }
    }
}

impl Slice {
    pub fn is_projects(&self) -> bool {
        self.slice_type == PROJECTS_SLICE_TYPE
    }

    /// セクションID（先頭の '#' は除去）
    pub fn section_id(&self) -> String {
        self.primary
            .section_id
            .as_deref()
            .map(|id| id.trim_start_matches('#').trim())
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_SECTION_ID)
            .to_string()
    }

    pub fn into_section(self) -> crate::content::ProjectsSection {
        let section_id = self.section_id();
        let items = match self.primary.projects {
            Some(projects) => projects,
            None => self.items,
        };
        crate::content::ProjectsSection {
            heading: self.primary.heading.filter(|h| !h.trim().is_empty()),
            description: rich_text(self.primary.description),
            section_id,
            projects: items.into_iter().map(ProjectRecord::from).collect(),
        }
    }
}

impl Document {
    /// 最初の projects スライス。形の崩れたスライスは読み飛ばす
    pub fn projects_slice(&self) -> Option<Slice> {
        self.data
            .slices
            .iter()
            .filter_map(|value| serde_json::from_value::<Slice>(value.clone()).ok())
            .find(|slice| slice.is_projects())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkKind;

    const ITEM_JSON: &str = r#"{
        "project_name": "  Ray Tracer ",
        "project_description": [{"type": "paragraph", "text": "Renders spheres", "spans": []}],
        "project_expanded_description": [],
        "project_image": {"url": "https://images.prismic.io/rt.png", "alt": "", "dimensions": {"width": 800, "height": 600}},
        "tech_stack": [{"type": "paragraph", "text": "Rust, WGPU", "spans": []}],
        "project_link": [
            {"link_type": "Web", "url": "https://github.com/me/rt"},
            {"link_type": "Any"},
            {"link_type": "Web", "url": "https://rt.example.dev"}
        ]
    }"#;

    #[test]
    fn test_item_to_record() {
        let item: ProjectItem = serde_json::from_str(ITEM_JSON).unwrap();
        let record = ProjectRecord::from(item);

        assert_eq!(record.name, "Ray Tracer");
        assert_eq!(record.summary().unwrap().as_text(), "Renders spheres");
        assert!(record.long_description.is_none());
        let image = record.image().unwrap();
        assert_eq!(image.width, Some(800));
        assert!(image.alt.is_none());
        assert_eq!(record.tech_stack.as_deref(), Some("Rust, WGPU"));
        assert_eq!(record.links.len(), 2);
        assert_eq!(record.links[0].kind, LinkKind::Github);
        assert_eq!(record.website_url(), Some("https://rt.example.dev"));
    }

    #[test]
    fn test_empty_fields_dropped() {
        let item: ProjectItem = serde_json::from_str(
            r#"{"project_name": null, "project_image": {}, "tech_stack": null, "project_link": null}"#,
        )
        .unwrap();
        let record = ProjectRecord::from(item);
        assert_eq!(record.display_name(), "project");
        assert!(record.image.is_none());
        assert!(record.tech_stack.is_none());
        assert!(record.links.is_empty());
    }

    #[test]
    fn test_slice_section_id_and_items() {
        let slice: Slice = serde_json::from_str(
            r###"{
                "slice_type": "projects",
                "primary": {"heading": "Projects", "section_id": "##work", "decsription": [{"type": "paragraph", "text": "Things I built"}]},
                "items": [{"project_name": "Legacy"}]
            }"###,
        )
        .unwrap();
        assert!(slice.is_projects());
        let section = slice.into_section();
        assert_eq!(section.section_id, "work");
        assert_eq!(section.heading.as_deref(), Some("Projects"));
        assert_eq!(section.description.unwrap().as_text(), "Things I built");
        assert_eq!(section.projects[0].name, "Legacy");
    }

    #[test]
    fn test_default_section_id() {
        let slice = Slice {
            slice_type: "projects".into(),
            ..Default::default()
        };
        assert_eq!(slice.section_id(), "projects");
    }

    #[test]
    fn test_document_finds_projects_slice() {
        let doc: Document = serde_json::from_str(
            r#"{"id": "X1", "type": "homepage", "data": {"slices": [
                {"slice_type": "hero", "primary": {"heading": "Hi"}},
                {"slice_type": "projects", "primary": {"projects": [{"project_name": "A"}, {"project_name": "B"}]}}
            ]}}"#,
        )
        .unwrap();
        let slice = doc.projects_slice().unwrap();
        assert_eq!(slice.into_section().projects.len(), 2);
    }
}
